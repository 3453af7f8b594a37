//! Core source/sink adapters over a form driver.

use clozecheck_core::traits::{ScoringSink, ScoringSource};
use clozecheck_core::{ClozeError, ScoringConfig};

use crate::driver::FormDriver;
use crate::{sink, source};

/// Binds an editor form to the core configuration traits.
pub struct FormBinding<D> {
    driver: D,
    /// Number of configurations written so far.
    writes: usize,
}

impl<D: FormDriver> FormBinding<D> {
    pub fn new(driver: D) -> Self {
        Self { driver, writes: 0 }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn into_driver(self) -> D {
        self.driver
    }
}

impl<D: FormDriver> ScoringSource for FormBinding<D> {
    fn read_scoring(&mut self) -> Result<ScoringConfig, ClozeError> {
        source::read_scoring(&self.driver)
    }
}

impl<D: FormDriver> ScoringSink for FormBinding<D> {
    fn write_scoring(&mut self, scoring: &ScoringConfig) -> Result<(), ClozeError> {
        sink::write_scoring(&mut self.driver, scoring)?;
        self.writes += 1;
        Ok(())
    }
}
