//! A cloze question: its scoring configuration plus the gaps derived from
//! it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::config::Settings;
use crate::coverage::{CoverageMode, CoverageTracker};
use crate::error::ClozeError;
use crate::gap::Gap;
use crate::model::{ClozeItem, Locale, ScoringConfig};

/// A cloze question under test.
///
/// The gaps always mirror `scoring`: they are rebuilt from scratch whenever
/// the configuration is replaced.
#[derive(Debug, Clone)]
pub struct ClozeQuestion {
    id: String,
    title: String,
    scoring: ScoringConfig,
    gaps: Vec<Gap>,
}

impl ClozeQuestion {
    pub fn new(id: impl Into<String>, title: impl Into<String>, scoring: ScoringConfig) -> Self {
        let gaps = Gap::build_all(&scoring);
        Self {
            id: id.into(),
            title: title.into(),
            scoring,
            gaps,
        }
    }

    pub fn from_item(item: &ClozeItem) -> Self {
        Self::new(item.id.clone(), item.title.clone(), item.scoring.clone())
    }

    pub fn to_item(&self) -> ClozeItem {
        ClozeItem {
            id: self.id.clone(),
            title: self.title.clone(),
            scoring: self.scoring.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    pub fn gap(&self, index: usize) -> Option<&Gap> {
        self.gaps.get(index)
    }

    /// Install a new configuration, rebuilding every gap. Returns the
    /// previous configuration.
    pub fn replace_scoring(&mut self, scoring: ScoringConfig) -> ScoringConfig {
        self.gaps = Gap::build_all(&scoring);
        std::mem::replace(&mut self.scoring, scoring)
    }

    /// Sum of the gaps' maximum scores.
    pub fn maximum_score(&self) -> Decimal {
        self.gaps.iter().map(Gap::maximum_score).sum()
    }

    /// Map export column names to gap indices.
    pub fn export_names(&self, locale: Locale) -> BTreeMap<String, usize> {
        self.gaps
            .iter()
            .map(|gap| (gap.export_name(locale), gap.index()))
            .collect()
    }

    pub fn initialize_coverage(&self, tracker: &mut dyn CoverageTracker, settings: &Settings) {
        for gap in &self.gaps {
            gap.initialize_coverage(&self.id, tracker, settings);
        }
    }

    /// Record coverage for answers keyed by export name, as found in a
    /// results export.
    pub fn add_export_coverage(
        &self,
        tracker: &mut dyn CoverageTracker,
        answers: &BTreeMap<String, String>,
        locale: Locale,
        settings: &Settings,
    ) -> Result<(), ClozeError> {
        let names = self.export_names(locale);
        for (name, value) in answers {
            let gap = names
                .get(name)
                .and_then(|&index| self.gaps.get(index))
                .ok_or_else(|| ClozeError::interaction(format!("unknown gap in export: '{name}'")))?;
            gap.add_coverage(&self.id, CoverageMode::Export, tracker, value, settings);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::CoverageLedger;
    use crate::model::Comparator;
    use crate::test_utils::*;

    #[test]
    fn gaps_follow_configuration() {
        let mut question = ClozeQuestion::new("q1", "Capitals", mixed_config());
        assert_eq!(question.gaps().len(), 3);
        assert_eq!(question.maximum_score(), dec("5"));

        let old = question.replace_scoring(paris_config(Comparator::IgnoreCase));
        assert_eq!(old, mixed_config());
        assert_eq!(question.gaps().len(), 1);
        assert_eq!(question.maximum_score(), dec("4"));
        assert_eq!(question.gap(0).map(|g| g.get_score("PARIS")), Some(dec("4")));
    }

    #[test]
    fn empty_question_scores_nothing() {
        let config = ScoringConfig {
            identical_scoring: true,
            comparator: Comparator::CaseSensitive,
            gaps: Vec::new(),
        };
        let question = ClozeQuestion::new("empty", "", config);
        assert!(question.maximum_score().is_zero());
    }

    #[test]
    fn export_coverage_by_name() {
        let question = ClozeQuestion::new("q1", "Capitals", mixed_config());
        let settings = Settings::default();
        let mut ledger = CoverageLedger::new();
        question.initialize_coverage(&mut ledger, &settings);

        let answers: BTreeMap<String, String> = [
            ("Lücke 1".to_string(), "berlin".to_string()),
            ("Lücke 2".to_string(), "red".to_string()),
        ]
        .into_iter()
        .collect();
        question
            .add_export_coverage(&mut ledger, &answers, Locale::De, &settings)
            .unwrap();
        assert_eq!(ledger.covered_count(), 2);

        let err = question
            .add_export_coverage(&mut ledger, &answers, Locale::En, &settings)
            .unwrap_err();
        assert!(matches!(err, ClozeError::Interaction(_)));
    }

    #[test]
    fn item_roundtrip() {
        let question = ClozeQuestion::new("q7", "Numbers", numeric_config());
        let item = question.to_item();
        assert_eq!(ClozeQuestion::from_item(&item).scoring(), question.scoring());
        assert_eq!(item.id, "q7");
    }
}
