#[cfg(test)]
mod tests;

use log::*;
use ndarray::ArrayView1;

use crate::annotations::{AnnotationData, AnnotationMap, ColumnAnnotations};
use crate::error::{FeaturizerError, Result};
use crate::traits::Value;
use crate::transformer::Transformer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingState {
    NotStarted,
    Training,
    Finished,
}

/// Outcome of feeding one batch to an estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitResult {
    Continue,
    Complete,
    /// The caller must replay its data from the beginning.
    ResetAndContinue,
}

/// The numeric routine driven by a [`TrainingOnlyEstimator`].
pub trait Accumulator: Send {
    type Input: Value;
    type Output: AnnotationData;

    /// Name under which the committed annotation is stored.
    const NAME: &'static str;

    /// Called once when training begins. Returning `false` skips training.
    fn begin(&mut self, annotations: &AnnotationMap) -> Result<bool> {
        let _ = annotations;
        Ok(true)
    }

    fn update(&mut self, item: &Self::Input) -> Result<()>;

    fn update_batch(&mut self, items: &[Self::Input]) -> Result<()> {
        items.iter().try_for_each(|item| self.update(item))
    }

    fn commit(&mut self) -> Result<Self::Output>;
}

/// Accumulators whose committed annotation is enough to build a transformer.
pub trait IntoTransformer: Accumulator {
    type Transformer: Transformer;

    fn create_transformer(annotation: &Self::Output) -> Result<Self::Transformer>;
}

/// Lifecycle shared by single estimators and pipelines so that one driver
/// loop can train either.
pub trait Estimator<T>: Send {
    fn name(&self) -> &str;

    fn state(&self) -> TrainingState;

    fn begin_training(&mut self) -> Result<()>;

    fn fit(&mut self, items: &[T]) -> Result<FitResult>;

    fn on_data_completed(&mut self) -> Result<FitResult>;

    fn complete_training(&mut self) -> Result<()>;
}

pub(crate) fn invalid_state(operation: &'static str, state: TrainingState) -> FeaturizerError {
    FeaturizerError::InvalidState { operation, state }
}

/// Wraps an [`Accumulator`] with a bounded, idempotent training lifecycle
/// for one column of a [`ColumnAnnotations`] set.
pub struct TrainingOnlyEstimator<A: Accumulator> {
    annotations: ColumnAnnotations,
    column: usize,
    accumulator: A,
    requires_training: bool,
    remaining: usize,
    has_annotation: bool,
    state: TrainingState,
    poisoned: bool,
    transformer_created: bool,
}

impl<A: Accumulator> TrainingOnlyEstimator<A> {
    pub fn new(annotations: ColumnAnnotations, column: usize, accumulator: A) -> Result<Self> {
        annotations.check_column(column)?;
        Ok(Self {
            annotations,
            column,
            accumulator,
            requires_training: true,
            remaining: usize::MAX,
            has_annotation: false,
            state: TrainingState::NotStarted,
            poisoned: false,
            transformer_created: false,
        })
    }

    pub fn with_max_items(mut self, max_items: usize) -> Result<Self> {
        if max_items == 0 {
            return Err(FeaturizerError::InvalidArgument(
                "the maximum number of training items must be > 0".to_string(),
            ));
        }
        self.remaining = max_items;
        Ok(self)
    }

    pub fn with_requires_training(mut self, requires_training: bool) -> Self {
        self.requires_training = requires_training;
        self
    }

    pub fn name(&self) -> &'static str {
        A::NAME
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn remaining_items(&self) -> usize {
        self.remaining
    }

    /// Whether an annotation already existed when training began.
    pub fn has_annotation(&self) -> bool {
        self.has_annotation
    }

    /// Whether an accumulator error left this instance unusable.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn accumulator(&self) -> &A {
        &self.accumulator
    }

    pub fn annotations(&self) -> &ColumnAnnotations {
        &self.annotations
    }

    /// Whether the store holds an annotation of this estimator's kind for its column.
    pub fn annotation_exists(&self) -> Result<bool> {
        self.annotations.contains::<A::Output>(self.column, A::NAME)
    }

    pub fn annotation(&self) -> Result<A::Output> {
        self.annotations
            .get::<A::Output>(self.column, A::NAME)?
            .ok_or_else(|| FeaturizerError::AnnotationNotFound {
                column: self.column,
                name: A::NAME.to_string(),
            })
    }

    pub fn begin_training(&mut self) -> Result<()> {
        if self.state != TrainingState::NotStarted {
            return Err(invalid_state("begin_training", self.state));
        }

        if !self.requires_training {
            debug!("{} on column {} does not require training", A::NAME, self.column);
            self.state = TrainingState::Finished;
            return Ok(());
        }

        self.has_annotation = self.annotation_exists()?;
        if self.has_annotation {
            debug!("{} on column {} is already annotated", A::NAME, self.column);
            self.state = TrainingState::Finished;
            return Ok(());
        }

        let accumulator = &mut self.accumulator;
        let needs_data = self
            .annotations
            .with_column(self.column, |map| accumulator.begin(map))??;
        self.state = if needs_data {
            TrainingState::Training
        } else {
            TrainingState::Finished
        };
        debug!("{} on column {} is {:?}", A::NAME, self.column, self.state);
        Ok(())
    }

    /// Feeds up to the remaining item limit. An accumulator error poisons the
    /// instance: the partial batch is never committed.
    pub fn fit(&mut self, items: &[A::Input]) -> Result<FitResult> {
        if self.poisoned {
            return Err(FeaturizerError::Poisoned { operation: "fit" });
        }
        match self.state {
            TrainingState::Training => (),
            TrainingState::Finished => return Err(FeaturizerError::AlreadyFinished),
            state => return Err(invalid_state("fit", state)),
        }

        let n_items = self.remaining.min(items.len());
        if n_items > 0 {
            if let Err(error) = self.accumulator.update_batch(&items[..n_items]) {
                self.poisoned = true;
                warn!("{} on column {} failed during fit: {}", A::NAME, self.column, error);
                return Err(error);
            }
            self.remaining -= n_items;
            trace!("{} consumed {} items, {} remaining", A::NAME, n_items, self.remaining);
        }

        if self.remaining == 0 {
            Ok(FitResult::Complete)
        } else {
            Ok(FitResult::Continue)
        }
    }

    pub fn fit_view(&mut self, items: ArrayView1<A::Input>) -> Result<FitResult> {
        match items.as_slice() {
            Some(items) => self.fit(items),
            None => self.fit(&items.to_vec()),
        }
    }

    /// Signals that the data source is exhausted.
    pub fn on_data_completed(&mut self) -> Result<FitResult> {
        if self.poisoned {
            return Err(FeaturizerError::Poisoned {
                operation: "on_data_completed",
            });
        }
        match self.state {
            TrainingState::NotStarted => Err(invalid_state("on_data_completed", self.state)),
            _ => Ok(FitResult::Complete),
        }
    }

    /// Commits the accumulator into the annotation store. A no-op once finished.
    pub fn complete_training(&mut self) -> Result<()> {
        if self.poisoned {
            return Err(FeaturizerError::Poisoned {
                operation: "complete_training",
            });
        }
        match self.state {
            TrainingState::NotStarted => return Err(invalid_state("complete_training", self.state)),
            TrainingState::Finished => return Ok(()),
            TrainingState::Training => (),
        }

        let annotation = match self.accumulator.commit() {
            Ok(output) => output.into_annotation(),
            Err(error) => {
                self.poisoned = true;
                return Err(error);
            }
        };
        let inserted = self
            .annotations
            .insert_if_absent(self.column, A::NAME, annotation)?;
        if !inserted {
            warn!(
                "Discarding {} result for column {}: an annotation was committed concurrently",
                A::NAME,
                self.column
            );
        }
        self.state = TrainingState::Finished;
        debug!("{} on column {} finished", A::NAME, self.column);
        Ok(())
    }
}

impl<A: IntoTransformer> TrainingOnlyEstimator<A> {
    pub fn create_transformer(&mut self) -> Result<A::Transformer> {
        if self.state != TrainingState::Finished {
            return Err(invalid_state("create_transformer", self.state));
        }
        if self.transformer_created {
            return Err(FeaturizerError::TransformerAlreadyCreated);
        }
        let transformer = A::create_transformer(&self.annotation()?)?;
        self.transformer_created = true;
        Ok(transformer)
    }
}

impl<A: Accumulator> Estimator<A::Input> for TrainingOnlyEstimator<A> {
    fn name(&self) -> &str {
        A::NAME
    }

    fn state(&self) -> TrainingState {
        self.state
    }

    fn begin_training(&mut self) -> Result<()> {
        TrainingOnlyEstimator::begin_training(self)
    }

    fn fit(&mut self, items: &[A::Input]) -> Result<FitResult> {
        TrainingOnlyEstimator::fit(self, items)
    }

    fn on_data_completed(&mut self) -> Result<FitResult> {
        TrainingOnlyEstimator::on_data_completed(self)
    }

    fn complete_training(&mut self) -> Result<()> {
        TrainingOnlyEstimator::complete_training(self)
    }
}
