use crate::accumulators::{
    StandardDeviationAccumulator, StandardStatsAccumulator, STANDARD_DEVIATION_NAME,
    STATISTICS_NAME,
};
use crate::annotations::{ColumnAnnotations, StandardDeviation, StandardStats};
use crate::error::Result;
use crate::estimator::{Estimator, FitResult, TrainingOnlyEstimator, TrainingState};
use crate::parameters::Parameters;
use crate::pipeline::Pipeline;
use crate::traits::{Numeric, Value};
use crate::transformer::StandardScalerTransformer;

/// Learns mean and standard deviation of a numeric column in two passes:
/// `StandardStats` first, then the deviation around the learned average.
pub struct StandardScalerEstimator<T>
where
    T: Value,
    T::NonNull: Numeric,
{
    pipeline: Pipeline<T>,
    with_mean: bool,
    with_std: bool,
}

impl<T> StandardScalerEstimator<T>
where
    T: Value,
    T::NonNull: Numeric,
{
    pub fn new(annotations: ColumnAnnotations, column: usize) -> Result<Self> {
        Self::from_parameters(annotations, column, &Parameters::default())
    }

    pub fn from_parameters(annotations: ColumnAnnotations, column: usize, parameters: &Parameters) -> Result<Self> {
        let stats = TrainingOnlyEstimator::new(annotations.clone(), column, StandardStatsAccumulator::<T>::new())?
            .with_max_items(parameters.max_training_items)?;
        let deviation = TrainingOnlyEstimator::new(annotations.clone(), column, StandardDeviationAccumulator::<T>::new())?
            .with_max_items(parameters.max_training_items)?
            .with_requires_training(parameters.with_std);

        let pipeline = Pipeline::new("StandardScaler", annotations, column)?
            .with_stage(stats)
            .with_stage(deviation);

        Ok(Self {
            pipeline,
            with_mean: parameters.with_mean,
            with_std: parameters.with_std,
        })
    }

    pub fn pipeline(&self) -> &Pipeline<T> {
        &self.pipeline
    }

    pub fn state(&self) -> TrainingState {
        self.pipeline.state()
    }

    pub fn create_transformer(&mut self) -> Result<StandardScalerTransformer<T>> {
        let (with_mean, with_std) = (self.with_mean, self.with_std);
        self.pipeline.create_transformer(|annotations| {
            let mean = if with_mean {
                annotations.require::<StandardStats>(STATISTICS_NAME)?.average()
            } else {
                0.0
            };
            let deviation = if with_std {
                annotations
                    .require::<StandardDeviation>(STANDARD_DEVIATION_NAME)?
                    .deviation()
            } else {
                1.0
            };
            StandardScalerTransformer::new(mean, deviation)
        })
    }
}

impl<T> Estimator<T> for StandardScalerEstimator<T>
where
    T: Value,
    T::NonNull: Numeric,
{
    fn name(&self) -> &str {
        self.pipeline.name()
    }

    fn state(&self) -> TrainingState {
        self.pipeline.state()
    }

    fn begin_training(&mut self) -> Result<()> {
        self.pipeline.begin_training()
    }

    fn fit(&mut self, items: &[T]) -> Result<FitResult> {
        self.pipeline.fit(items)
    }

    fn on_data_completed(&mut self) -> Result<FitResult> {
        self.pipeline.on_data_completed()
    }

    fn complete_training(&mut self) -> Result<()> {
        self.pipeline.complete_training()
    }
}
