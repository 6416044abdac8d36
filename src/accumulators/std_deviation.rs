use std::marker::PhantomData;

use crate::accumulators::norm::L2NormUpdater;
use crate::accumulators::stats::STATISTICS_NAME;
use crate::annotations::{AnnotationMap, StandardDeviation, StandardStats};
use crate::error::{FeaturizerError, OverflowGuard, Result};
use crate::estimator::Accumulator;
use crate::traits::{Numeric, Value};

pub const STANDARD_DEVIATION_NAME: &str = "StandardDeviationEstimator";

/// Population standard deviation around a mean that is either supplied up front
/// or read from the column's `StandardStats` annotation when training begins.
pub struct StandardDeviationAccumulator<T> {
    mean: Option<f64>,
    norm: L2NormUpdater,
    count: u64,
    _input: PhantomData<fn(&T)>,
}

impl<T> StandardDeviationAccumulator<T>
where
    T: Value,
    T::NonNull: Numeric,
{
    pub fn new() -> Self {
        Self {
            mean: None,
            norm: L2NormUpdater::new(),
            count: 0,
            _input: PhantomData,
        }
    }

    pub fn with_mean(mean: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(FeaturizerError::InvalidArgument(format!(
                "mean must be finite, got {}",
                mean
            )));
        }
        Ok(Self {
            mean: Some(mean),
            ..Self::new()
        })
    }

    pub fn mean(&self) -> Option<f64> {
        self.mean
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl<T> Default for StandardDeviationAccumulator<T>
where
    T: Value,
    T::NonNull: Numeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Accumulator for StandardDeviationAccumulator<T>
where
    T: Value,
    T::NonNull: Numeric,
{
    type Input = T;
    type Output = StandardDeviation;

    const NAME: &'static str = STANDARD_DEVIATION_NAME;

    fn begin(&mut self, annotations: &AnnotationMap) -> Result<bool> {
        if self.mean.is_none() {
            let stats = annotations.require::<StandardStats>(STATISTICS_NAME)?;
            self.mean = Some(stats.average());
        }
        Ok(true)
    }

    fn update(&mut self, item: &T) -> Result<()> {
        let value = match item.non_null() {
            Some(value) => Value::to_f64(value),
            None => return Ok(()),
        };
        let (value, mean) = match (value, self.mean) {
            (Some(value), Some(mean)) => (value, mean),
            (None, _) => return Err(FeaturizerError::Internal("numeric value has no f64 view")),
            (_, None) => return Err(FeaturizerError::Internal("mean is not available")),
        };
        if self.count == u64::MAX {
            return Err(FeaturizerError::overflow(OverflowGuard::CountExhausted));
        }
        self.norm.update(value - mean)?;
        self.count += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<StandardDeviation> {
        if self.count == 0 {
            return StandardDeviation::new(0.0, 0);
        }
        let deviation = self.norm.commit()? / (self.count as f64).sqrt();
        StandardDeviation::new(deviation, self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_count_rejects_update() {
        let mut deviation = StandardDeviationAccumulator::<f64>::with_mean(1.0).unwrap();
        deviation.count = u64::MAX;

        assert_eq!(
            deviation.update(&3.0),
            Err(FeaturizerError::overflow(OverflowGuard::CountExhausted))
        );
        assert_eq!(deviation.count(), u64::MAX);
        assert_eq!(deviation.norm.commit(), Err(FeaturizerError::NoElements));
    }
}
