use num_traits::Zero;

use crate::annotations::{BasicStats, StandardStats};
use crate::error::{FeaturizerError, OverflowGuard, Result};
use crate::estimator::{Accumulator, IntoTransformer};
use crate::traits::{Numeric, Scalar, Value};
use crate::transformer::MinMaxScalerTransformer;

pub const STATISTICS_NAME: &str = "StatisticalMetricsEstimator";

/// Running minimum, maximum and count over non-null values.
#[derive(Debug, Clone)]
pub struct BasicStatsUpdater<T> {
    min: Option<T>,
    max: Option<T>,
    count: u64,
}

impl<T> Default for BasicStatsUpdater<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            count: 0,
        }
    }
}

impl<T: Value + PartialOrd> BasicStatsUpdater<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: &T) -> Result<()> {
        if self.count == u64::MAX {
            return Err(FeaturizerError::overflow(OverflowGuard::CountExhausted));
        }
        if self.min.as_ref().map_or(true, |min| value < min) {
            self.min = Some(value.clone());
        }
        if self.max.as_ref().map_or(true, |max| value > max) {
            self.max = Some(value.clone());
        }
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min(&self) -> Option<&T> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&T> {
        self.max.as_ref()
    }

    pub fn commit(&self) -> Result<BasicStats> {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => BasicStats::new(min.to_scalar(), max.to_scalar(), self.count),
            _ => BasicStats::new(Scalar::Null, Scalar::Null, 0),
        }
    }
}

/// Basic stats plus a widened, overflow-checked sum.
#[derive(Debug, Clone)]
pub struct StandardStatsUpdater<T: Numeric> {
    basic: BasicStatsUpdater<T>,
    sum: T::Sum,
}

impl<T: Numeric> Default for StandardStatsUpdater<T> {
    fn default() -> Self {
        Self {
            basic: BasicStatsUpdater::default(),
            sum: <T::Sum as Zero>::zero(),
        }
    }
}

impl<T: Numeric> StandardStatsUpdater<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: T) -> Result<()> {
        let sum = T::add_to_sum(self.sum, value)?;
        self.basic.update(&value)?;
        self.sum = sum;
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.basic.count()
    }

    pub fn commit(&self) -> Result<StandardStats> {
        let (min, max) = match (self.basic.min(), self.basic.max()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => {
                let zero = T::zero().to_scalar();
                return StandardStats::new(T::sum_to_scalar(<T::Sum as Zero>::zero()), 0.0, zero.clone(), zero, 0);
            }
        };

        let average = T::sum_to_f64(self.sum) / self.basic.count() as f64;
        if !average.is_finite() {
            return Err(FeaturizerError::overflow(OverflowGuard::AverageNarrowing));
        }
        // the mean of equal floats may round just outside of [min, max]
        let average = match (Value::to_f64(&min), Value::to_f64(&max)) {
            (Some(lower), Some(upper)) => average.max(lower).min(upper),
            _ => average,
        };

        StandardStats::new(
            T::sum_to_scalar(self.sum),
            average,
            min.to_scalar(),
            max.to_scalar(),
            self.basic.count(),
        )
    }
}

/// Min/max/count of any column type, skipping nulls.
///
/// Without any non-null value the committed min and max are `Null` rather than
/// zero, since a zero is not defined for every column type (strings, bools).
/// `StandardStatsAccumulator` is numeric-only and commits zeros instead.
pub struct BasicStatsAccumulator<T: Value> {
    updater: BasicStatsUpdater<T::NonNull>,
}

impl<T: Value> BasicStatsAccumulator<T> {
    pub fn new() -> Self {
        Self {
            updater: BasicStatsUpdater::new(),
        }
    }
}

impl<T: Value> Default for BasicStatsAccumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Value> Accumulator for BasicStatsAccumulator<T> {
    type Input = T;
    type Output = BasicStats;

    const NAME: &'static str = STATISTICS_NAME;

    fn update(&mut self, item: &T) -> Result<()> {
        match item.non_null() {
            Some(value) => self.updater.update(value),
            None => Ok(()),
        }
    }

    fn commit(&mut self) -> Result<BasicStats> {
        self.updater.commit()
    }
}

/// Min/max/count/sum/average of a numeric column, skipping nulls.
pub struct StandardStatsAccumulator<T>
where
    T: Value,
    T::NonNull: Numeric,
{
    updater: StandardStatsUpdater<T::NonNull>,
}

impl<T> StandardStatsAccumulator<T>
where
    T: Value,
    T::NonNull: Numeric,
{
    pub fn new() -> Self {
        Self {
            updater: StandardStatsUpdater::new(),
        }
    }

    pub fn count(&self) -> u64 {
        self.updater.count()
    }
}

impl<T> Default for StandardStatsAccumulator<T>
where
    T: Value,
    T::NonNull: Numeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Accumulator for StandardStatsAccumulator<T>
where
    T: Value,
    T::NonNull: Numeric,
{
    type Input = T;
    type Output = StandardStats;

    const NAME: &'static str = STATISTICS_NAME;

    fn update(&mut self, item: &T) -> Result<()> {
        match item.non_null() {
            Some(value) => self.updater.update(*value),
            None => Ok(()),
        }
    }

    fn commit(&mut self) -> Result<StandardStats> {
        self.updater.commit()
    }
}

impl<T> IntoTransformer for StandardStatsAccumulator<T>
where
    T: Value,
    T::NonNull: Numeric,
{
    type Transformer = MinMaxScalerTransformer<T>;

    fn create_transformer(stats: &StandardStats) -> Result<MinMaxScalerTransformer<T>> {
        match (stats.min().as_f64(), stats.max().as_f64()) {
            (Some(min), Some(max)) => MinMaxScalerTransformer::new(min, max),
            _ => Err(FeaturizerError::InvalidAnnotation(
                "min and max must be numeric".to_string(),
            )),
        }
    }
}
