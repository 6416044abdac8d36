use std::marker::PhantomData;

use crate::archive::{ArchiveVersion, Persist};
use crate::error::{FeaturizerError, Result};
use crate::traits::Value;
use crate::transformer::Transformer;

/// Maps `[min, max]` onto `[0, 1]`. A column with a single distinct value maps to 0.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScalerTransformer<T> {
    min: f64,
    max: f64,
    _input: PhantomData<fn(&T)>,
}

impl<T: Value> MinMaxScalerTransformer<T> {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(FeaturizerError::InvalidParameters(
                "min and max must be finite".to_string(),
            ));
        }
        if min > max {
            return Err(FeaturizerError::InvalidParameters(format!(
                "min ({}) is > max ({})",
                min, max
            )));
        }
        Ok(Self {
            min,
            max,
            _input: PhantomData,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl<T: Value> Transformer for MinMaxScalerTransformer<T> {
    type Input = T;
    type Output = f64;

    fn execute(&self, input: &T) -> f64 {
        let value = match input.non_null().and_then(Value::to_f64) {
            Some(value) => value,
            None => return f64::NAN,
        };
        let span = self.span();
        if span == 0.0 {
            0.0
        } else {
            (value - self.min) / span
        }
    }
}

impl<T: Value> Persist for MinMaxScalerTransformer<T> {
    const VERSION: ArchiveVersion = ArchiveVersion::new(1, 0);

    type Payload = (f64, f64);

    fn to_payload(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    fn from_payload((min, max): (f64, f64)) -> Result<Self> {
        Self::new(min, max)
    }
}
