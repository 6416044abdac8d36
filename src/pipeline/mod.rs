mod standard_scaler;

pub use standard_scaler::StandardScalerEstimator;

use log::*;

use crate::annotations::{AnnotationMap, ColumnAnnotations};
use crate::error::{FeaturizerError, Result};
use crate::estimator::{invalid_state, Estimator, FitResult, TrainingState};
use crate::utils::logging::StageLogger;

/// An ordered chain of estimators over one column of a shared annotation set.
/// Stage `i + 1` begins only after stage `i` committed its annotation, so it can
/// read it while beginning.
pub struct Pipeline<T> {
    name: String,
    annotations: ColumnAnnotations,
    column: usize,
    stages: Vec<Box<dyn Estimator<T>>>,
    current: usize,
    state: TrainingState,
    transformer_created: bool,
}

impl<T> Pipeline<T> {
    pub fn new(name: impl Into<String>, annotations: ColumnAnnotations, column: usize) -> Result<Self> {
        annotations.check_column(column)?;
        Ok(Self {
            name: name.into(),
            annotations,
            column,
            stages: Vec::new(),
            current: 0,
            state: TrainingState::NotStarted,
            transformer_created: false,
        })
    }

    pub fn with_stage<E: Estimator<T> + 'static>(mut self, stage: E) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn push_stage(&mut self, stage: Box<dyn Estimator<T>>) -> Result<()> {
        if self.state != TrainingState::NotStarted {
            return Err(invalid_state("push_stage", self.state));
        }
        self.stages.push(stage);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn annotations(&self) -> &ColumnAnnotations {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Name of the stage that currently consumes data.
    pub fn current_stage(&self) -> Option<&str> {
        match self.state {
            TrainingState::Training => self.stages.get(self.current).map(|stage| stage.name()),
            _ => None,
        }
    }

    fn begin_stage(&mut self) -> Result<()> {
        let (step, of, column) = (self.current + 1, self.stages.len(), self.column);
        let stage = &mut self.stages[self.current];
        StageLogger::new(step, of, stage.name(), column).started();
        stage.begin_training()
    }

    fn complete_stage(&mut self) -> Result<()> {
        let (step, of, column) = (self.current + 1, self.stages.len(), self.column);
        let stage = &mut self.stages[self.current];
        stage.complete_training()?;
        StageLogger::new(step, of, stage.name(), column).finished();
        Ok(())
    }

    /// Completes the current stage and begins the following ones until one of
    /// them needs data.
    fn advance(&mut self) -> Result<FitResult> {
        loop {
            self.complete_stage()?;
            self.current += 1;
            if self.current == self.stages.len() {
                self.state = TrainingState::Finished;
                debug!("All stages of {} finished for column {}", self.name, self.column);
                return Ok(FitResult::Complete);
            }
            self.begin_stage()?;
            if self.stages[self.current].state() == TrainingState::Training {
                return Ok(FitResult::ResetAndContinue);
            }
        }
    }

    fn check_training(&self, operation: &'static str) -> Result<()> {
        match self.state {
            TrainingState::Training => Ok(()),
            TrainingState::Finished => Err(FeaturizerError::AlreadyFinished),
            state => Err(invalid_state(operation, state)),
        }
    }

    pub fn begin_training(&mut self) -> Result<()> {
        if self.state != TrainingState::NotStarted {
            return Err(invalid_state("begin_training", self.state));
        }
        if self.stages.is_empty() {
            return Err(FeaturizerError::InvalidArgument(format!(
                "pipeline {} has no stages",
                self.name
            )));
        }
        self.state = TrainingState::Training;
        self.current = 0;
        self.begin_stage()?;
        if self.stages[0].state() != TrainingState::Training {
            self.advance()?;
        }
        Ok(())
    }

    pub fn fit(&mut self, items: &[T]) -> Result<FitResult> {
        self.check_training("fit")?;
        if self.current == self.stages.len() {
            return Ok(FitResult::Complete);
        }
        match self.stages[self.current].fit(items)? {
            FitResult::Complete => self.advance(),
            other => Ok(other),
        }
    }

    pub fn on_data_completed(&mut self) -> Result<FitResult> {
        if self.state == TrainingState::NotStarted {
            return Err(invalid_state("on_data_completed", self.state));
        }
        if self.state == TrainingState::Finished || self.current == self.stages.len() {
            return Ok(FitResult::Complete);
        }
        match self.stages[self.current].on_data_completed()? {
            FitResult::Complete => self.advance(),
            other => Ok(other),
        }
    }

    /// Completes every remaining stage in order. A no-op once finished.
    pub fn complete_training(&mut self) -> Result<()> {
        match self.state {
            TrainingState::NotStarted => return Err(invalid_state("complete_training", self.state)),
            TrainingState::Finished => return Ok(()),
            TrainingState::Training => (),
        }
        while self.current < self.stages.len() {
            self.advance()?;
        }
        self.state = TrainingState::Finished;
        Ok(())
    }

    /// Builds a transformer from the column's annotations once every stage finished.
    /// Can be called only once.
    pub fn create_transformer<R, F>(&mut self, build: F) -> Result<R>
    where
        F: FnOnce(&AnnotationMap) -> Result<R>,
    {
        if self.state != TrainingState::Finished {
            return Err(invalid_state("create_transformer", self.state));
        }
        if self.transformer_created {
            return Err(FeaturizerError::TransformerAlreadyCreated);
        }
        let transformer = self.annotations.with_column(self.column, build)??;
        self.transformer_created = true;
        Ok(transformer)
    }
}

impl<T> Estimator<T> for Pipeline<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> TrainingState {
        self.state
    }

    fn begin_training(&mut self) -> Result<()> {
        Pipeline::begin_training(self)
    }

    fn fit(&mut self, items: &[T]) -> Result<FitResult> {
        Pipeline::fit(self, items)
    }

    fn on_data_completed(&mut self) -> Result<FitResult> {
        Pipeline::on_data_completed(self)
    }

    fn complete_training(&mut self) -> Result<()> {
        Pipeline::complete_training(self)
    }
}
