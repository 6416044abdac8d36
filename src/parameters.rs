use serde::{Deserialize, Serialize};

use crate::error::{FeaturizerError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Upper bound of items each estimator consumes before it completes.
    pub max_training_items: usize,

    /// Number of items handed to `fit` at once by the training driver.
    pub batch_size: usize,

    pub interpolate_median: bool,

    pub with_mean: bool,

    pub with_std: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            max_training_items: usize::MAX,
            batch_size: 1024,
            interpolate_median: true,
            with_mean: true,
            with_std: true,
        }
    }
}

impl Parameters {
    pub fn validate(&self) -> Result<()> {
        if self.max_training_items == 0 {
            return Err(FeaturizerError::InvalidArgument(
                "max_training_items must be > 0".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(FeaturizerError::InvalidArgument(
                "batch_size must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
