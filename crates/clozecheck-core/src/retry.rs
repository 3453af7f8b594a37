//! Budgets for rejection-sampling loops.
//!
//! Production loops retry without limit; tests run the same loops with a cap
//! so that a loop that can never terminate fails instead of hanging.

use crate::error::ClozeError;

/// Upper bound on the attempts of a rejection-sampling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    limit: Option<usize>,
    used: usize,
}

impl RetryBudget {
    pub fn unbounded() -> Self {
        Self {
            limit: None,
            used: 0,
        }
    }

    pub fn at_most(attempts: usize) -> Self {
        Self {
            limit: Some(attempts),
            used: 0,
        }
    }

    /// Record one attempt of `what`, failing once the budget is spent.
    pub fn spend(&mut self, what: &'static str) -> Result<(), ClozeError> {
        self.used += 1;
        match self.limit {
            Some(limit) if self.used > limit => Err(ClozeError::RetryLimit {
                what,
                attempts: limit,
            }),
            _ => Ok(()),
        }
    }

    /// Attempts recorded so far.
    pub fn used(&self) -> usize {
        self.used
    }

    /// A fresh budget with the same limit.
    pub fn renewed(&self) -> Self {
        Self {
            limit: self.limit,
            used: 0,
        }
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_budget_fails_after_limit() {
        let mut budget = RetryBudget::at_most(2);
        assert!(budget.spend("x").is_ok());
        assert!(budget.spend("x").is_ok());
        assert!(matches!(
            budget.spend("x"),
            Err(ClozeError::RetryLimit { attempts: 2, .. })
        ));
        assert_eq!(budget.renewed().used(), 0);
    }

    #[test]
    fn unbounded_budget_never_fails() {
        let mut budget = RetryBudget::unbounded();
        for _ in 0..10_000 {
            budget.spend("x").unwrap();
        }
        assert_eq!(budget.used(), 10_000);
    }
}
