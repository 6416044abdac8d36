use std::marker::PhantomData;

use crate::archive::{ArchiveVersion, Persist};
use crate::error::{FeaturizerError, Result};
use crate::traits::Value;
use crate::transformer::Transformer;

/// Centers and scales values: `(x - mean) / deviation`. Null inputs map to `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScalerTransformer<T> {
    mean: f64,
    deviation: f64,
    _input: PhantomData<fn(&T)>,
}

impl<T: Value> StandardScalerTransformer<T> {
    /// A zero deviation is replaced by 1 so constant columns only get centered.
    pub fn new(mean: f64, deviation: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(FeaturizerError::InvalidParameters(format!(
                "mean must be finite, got {}",
                mean
            )));
        }
        if !deviation.is_finite() || deviation < 0.0 {
            return Err(FeaturizerError::InvalidParameters(format!(
                "deviation must be finite and >= 0, got {}",
                deviation
            )));
        }
        let deviation = if deviation == 0.0 { 1.0 } else { deviation };
        Ok(Self {
            mean,
            deviation,
            _input: PhantomData,
        })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn deviation(&self) -> f64 {
        self.deviation
    }
}

impl<T: Value> Transformer for StandardScalerTransformer<T> {
    type Input = T;
    type Output = f64;

    fn execute(&self, input: &T) -> f64 {
        match input.non_null().and_then(Value::to_f64) {
            Some(value) => (value - self.mean) / self.deviation,
            None => f64::NAN,
        }
    }
}

impl<T: Value> Persist for StandardScalerTransformer<T> {
    const VERSION: ArchiveVersion = ArchiveVersion::new(1, 0);

    type Payload = (f64, f64);

    fn to_payload(&self) -> (f64, f64) {
        (self.mean, self.deviation)
    }

    fn from_payload((mean, deviation): (f64, f64)) -> Result<Self> {
        Self::new(mean, deviation)
    }
}
