use crate::error::{FeaturizerError, OverflowGuard, Result};

/// Incremental Euclidean norm of a stream of values.
#[derive(Debug, Clone, Default)]
pub struct L2NormUpdater {
    squared_sum: f64,
    updated: bool,
}

impl L2NormUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: f64) -> Result<()> {
        let squared = value * value;
        let next = self.squared_sum + squared;
        if next == self.squared_sum && squared != 0.0 {
            return Err(FeaturizerError::overflow(OverflowGuard::L2NormSwamped));
        }
        if !next.is_finite() {
            return Err(FeaturizerError::overflow(OverflowGuard::L2NormNotFinite));
        }
        self.squared_sum = next;
        self.updated = true;
        Ok(())
    }

    pub fn commit(&self) -> Result<f64> {
        if !self.updated {
            return Err(FeaturizerError::NoElements);
        }
        Ok(self.squared_sum.sqrt())
    }
}
