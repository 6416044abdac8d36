use crate::accumulators::{
    BasicStatsAccumulator, MedianAccumulator, StandardDeviationAccumulator, StandardStatsAccumulator,
    STATISTICS_NAME,
};
use crate::annotations::{AnnotationData, AnnotationMap, BasicStats, ColumnAnnotations, StandardStats};
use crate::error::{ErrorKind, FeaturizerError, OverflowGuard, Result};
use crate::estimator::{Accumulator, FitResult, TrainingOnlyEstimator, TrainingState};
use crate::traits::Scalar;
use crate::transformer::Transformer;
use ndarray::aview1;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Counts how often it is driven; commits basic stats over the values seen.
struct Counting {
    begins: Arc<AtomicUsize>,
    updates: Arc<AtomicUsize>,
    wants_data: bool,
    values: Vec<i32>,
}

impl Counting {
    fn new(begins: &Arc<AtomicUsize>, updates: &Arc<AtomicUsize>) -> Self {
        Self {
            begins: begins.clone(),
            updates: updates.clone(),
            wants_data: true,
            values: vec![],
        }
    }
}

impl Accumulator for Counting {
    type Input = i32;
    type Output = BasicStats;

    const NAME: &'static str = "Counting";

    fn begin(&mut self, _annotations: &AnnotationMap) -> Result<bool> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(self.wants_data)
    }

    fn update(&mut self, item: &i32) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.values.push(*item);
        Ok(())
    }

    fn commit(&mut self) -> Result<BasicStats> {
        let min = self.values.iter().min().map_or(Scalar::Null, |v| Scalar::Int(*v as i64));
        let max = self.values.iter().max().map_or(Scalar::Null, |v| Scalar::Int(*v as i64));
        BasicStats::new(min, max, self.values.len() as u64)
    }
}

fn counters() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)))
}

#[test]
fn lifecycle() {
    init_logging();
    let annotations = ColumnAnnotations::new(1).unwrap();
    let mut estimator = TrainingOnlyEstimator::new(annotations, 0, StandardStatsAccumulator::<i32>::new()).unwrap();
    assert_eq!(estimator.state(), TrainingState::NotStarted);
    assert_eq!(estimator.name(), STATISTICS_NAME);

    estimator.begin_training().unwrap();
    assert_eq!(estimator.state(), TrainingState::Training);
    assert_eq!(estimator.fit(&[1, 3, 5]), Ok(FitResult::Continue));
    assert_eq!(estimator.fit(&[7, 9]), Ok(FitResult::Continue));
    assert_eq!(estimator.on_data_completed(), Ok(FitResult::Complete));
    estimator.complete_training().unwrap();
    assert_eq!(estimator.state(), TrainingState::Finished);

    let stats = estimator.annotation().unwrap();
    assert_eq!(stats.average(), 5.0);
    assert_eq!(stats.count(), 5);
}

#[test]
fn rejects_out_of_range_column() {
    let annotations = ColumnAnnotations::new(2).unwrap();
    let result = TrainingOnlyEstimator::new(annotations, 2, MedianAccumulator::<u8>::new(true));
    assert_eq!(
        result.err(),
        Some(FeaturizerError::InvalidColumn { column: 2, columns: 2 })
    );
}

#[test]
fn rejects_zero_item_limit() {
    let annotations = ColumnAnnotations::new(1).unwrap();
    let result = TrainingOnlyEstimator::new(annotations, 0, MedianAccumulator::<u8>::new(true))
        .unwrap()
        .with_max_items(0);
    assert_eq!(result.err().map(|e| e.kind()), Some(ErrorKind::Argument));
}

#[test]
fn state_errors() {
    let annotations = ColumnAnnotations::new(1).unwrap();
    let mut estimator = TrainingOnlyEstimator::new(annotations, 0, BasicStatsAccumulator::<bool>::new()).unwrap();

    assert_eq!(
        estimator.fit(&[true]),
        Err(FeaturizerError::InvalidState {
            operation: "fit",
            state: TrainingState::NotStarted
        })
    );
    assert_eq!(estimator.complete_training().map_err(|e| e.kind()), Err(ErrorKind::State));
    assert_eq!(estimator.on_data_completed().map_err(|e| e.kind()), Err(ErrorKind::State));

    estimator.begin_training().unwrap();
    assert_eq!(estimator.begin_training().map_err(|e| e.kind()), Err(ErrorKind::State));
    estimator.fit(&[true, false]).unwrap();
    estimator.complete_training().unwrap();

    assert_eq!(estimator.fit(&[true]), Err(FeaturizerError::AlreadyFinished));
    assert_eq!(estimator.complete_training(), Ok(()));

    let stats = estimator.annotation().unwrap();
    assert_eq!((stats.min(), stats.max()), (&Scalar::Bool(false), &Scalar::Bool(true)));
}

#[test]
fn item_limit_bounds_consumed_items() {
    let (begins, updates) = counters();
    let annotations = ColumnAnnotations::new(1).unwrap();
    let mut estimator = TrainingOnlyEstimator::new(annotations, 0, Counting::new(&begins, &updates))
        .unwrap()
        .with_max_items(5)
        .unwrap();
    estimator.begin_training().unwrap();

    assert_eq!(estimator.fit(&[1, 2, 3]), Ok(FitResult::Continue));
    assert_eq!(estimator.remaining_items(), 2);
    assert_eq!(estimator.fit(&[4, 5, 6, 7]), Ok(FitResult::Complete));
    assert_eq!(estimator.remaining_items(), 0);
    assert_eq!(estimator.fit(&[8]), Ok(FitResult::Complete));
    assert_eq!(updates.load(Ordering::SeqCst), 5);

    estimator.complete_training().unwrap();
    assert_eq!(estimator.annotation().map(|stats| stats.count()), Ok(5));
}

#[test]
fn empty_batch_reports_status() {
    let (begins, updates) = counters();
    let annotations = ColumnAnnotations::new(1).unwrap();
    let mut estimator = TrainingOnlyEstimator::new(annotations, 0, Counting::new(&begins, &updates))
        .unwrap()
        .with_max_items(1)
        .unwrap();
    estimator.begin_training().unwrap();
    assert_eq!(estimator.fit(&[]), Ok(FitResult::Continue));
    assert_eq!(estimator.fit(&[3]), Ok(FitResult::Complete));
    assert_eq!(estimator.fit(&[]), Ok(FitResult::Complete));
}

#[test]
fn second_instance_skips_training() {
    let (begins, updates) = counters();
    let annotations = ColumnAnnotations::new(1).unwrap();

    let mut first = TrainingOnlyEstimator::new(annotations.clone(), 0, Counting::new(&begins, &updates)).unwrap();
    first.begin_training().unwrap();
    first.fit(&[4, 2]).unwrap();
    first.complete_training().unwrap();
    assert_eq!(begins.load(Ordering::SeqCst), 1);
    assert_eq!(updates.load(Ordering::SeqCst), 2);

    let mut second = TrainingOnlyEstimator::new(annotations.clone(), 0, Counting::new(&begins, &updates)).unwrap();
    assert_eq!(second.annotation_exists(), Ok(true));
    second.begin_training().unwrap();
    assert_eq!(second.state(), TrainingState::Finished);
    assert!(second.has_annotation());
    assert_eq!(second.fit(&[100]), Err(FeaturizerError::AlreadyFinished));
    second.complete_training().unwrap();

    assert_eq!(begins.load(Ordering::SeqCst), 1);
    assert_eq!(updates.load(Ordering::SeqCst), 2);
    annotations
        .with_column(0, |map| assert_eq!(map.annotations("Counting").len(), 1))
        .unwrap();
    assert_eq!(second.annotation().map(|stats| stats.count()), Ok(2));
}

#[test]
fn concurrent_commit_is_discarded() {
    let (begins, updates) = counters();
    let annotations = ColumnAnnotations::new(1).unwrap();
    let mut first = TrainingOnlyEstimator::new(annotations.clone(), 0, Counting::new(&begins, &updates)).unwrap();
    let mut second = TrainingOnlyEstimator::new(annotations.clone(), 0, Counting::new(&begins, &updates)).unwrap();
    first.begin_training().unwrap();
    second.begin_training().unwrap();

    first.fit(&[1]).unwrap();
    second.fit(&[1, 2, 3]).unwrap();
    first.complete_training().unwrap();
    second.complete_training().unwrap();

    assert_eq!(second.state(), TrainingState::Finished);
    assert_eq!(second.annotation().map(|stats| stats.count()), Ok(1));
}

#[test]
fn begin_hook_can_skip_training() {
    let (begins, updates) = counters();
    let mut accumulator = Counting::new(&begins, &updates);
    accumulator.wants_data = false;
    let annotations = ColumnAnnotations::new(1).unwrap();
    let mut estimator = TrainingOnlyEstimator::new(annotations, 0, accumulator).unwrap();
    estimator.begin_training().unwrap();
    assert_eq!(estimator.state(), TrainingState::Finished);
    assert_eq!(estimator.annotation_exists(), Ok(false));
}

#[test]
fn training_not_required() {
    let (begins, updates) = counters();
    let annotations = ColumnAnnotations::new(1).unwrap();
    let mut estimator = TrainingOnlyEstimator::new(annotations, 0, Counting::new(&begins, &updates))
        .unwrap()
        .with_requires_training(false);
    estimator.begin_training().unwrap();
    assert_eq!(estimator.state(), TrainingState::Finished);
    assert_eq!(begins.load(Ordering::SeqCst), 0);
    assert_eq!(
        estimator.annotation().err(),
        Some(FeaturizerError::AnnotationNotFound {
            column: 0,
            name: "Counting".to_string()
        })
    );
}

#[test]
fn begin_hook_failure_is_reported() {
    let annotations = ColumnAnnotations::new(1).unwrap();
    let mut estimator =
        TrainingOnlyEstimator::new(annotations, 0, StandardDeviationAccumulator::<f64>::new()).unwrap();
    assert_eq!(
        estimator.begin_training().map_err(|e| e.kind()),
        Err(ErrorKind::Lookup)
    );
    assert_eq!(estimator.state(), TrainingState::NotStarted);
}

#[test]
fn reads_other_estimators_annotation() {
    let annotations = ColumnAnnotations::new(1).unwrap();
    let stats = StandardStats::new(Scalar::Int(25), 5.0, Scalar::Int(1), Scalar::Int(9), 5).unwrap();
    annotations
        .insert(0, STATISTICS_NAME, stats.into_annotation())
        .unwrap();

    let mut estimator =
        TrainingOnlyEstimator::new(annotations, 0, StandardDeviationAccumulator::<i64>::new()).unwrap();
    estimator.begin_training().unwrap();
    estimator.fit_view(aview1(&[1, 3, 5, 7, 9])).unwrap();
    estimator.complete_training().unwrap();

    let sd = estimator.annotation().unwrap();
    assert!((sd.deviation() - 2.828).abs() < 1e-3);
}

#[test]
fn failed_commit_leaves_no_annotation() {
    let annotations = ColumnAnnotations::new(1).unwrap();
    let mut estimator = TrainingOnlyEstimator::new(annotations, 0, MedianAccumulator::<f64>::new(true)).unwrap();
    estimator.begin_training().unwrap();
    estimator.fit(&[f64::NAN]).unwrap();
    assert_eq!(estimator.complete_training(), Err(FeaturizerError::NoElements));
    assert_eq!(estimator.annotation_exists(), Ok(false));
    assert_eq!(
        estimator.complete_training(),
        Err(FeaturizerError::Poisoned {
            operation: "complete_training"
        })
    );
    assert_eq!(estimator.annotation_exists(), Ok(false));
}

#[test]
fn failed_fit_poisons_estimator() {
    init_logging();
    let annotations = ColumnAnnotations::new(1).unwrap();
    let mut estimator = TrainingOnlyEstimator::new(annotations, 0, StandardStatsAccumulator::<i64>::new())
        .unwrap()
        .with_max_items(3)
        .unwrap();
    estimator.begin_training().unwrap();

    assert_eq!(
        estimator.fit(&[1, 2, i64::MAX]),
        Err(FeaturizerError::overflow(OverflowGuard::IntegerSumOverflow))
    );
    assert!(estimator.is_poisoned());
    assert_eq!(estimator.state(), TrainingState::Training);

    assert_eq!(
        estimator.fit(&[4, 5, 6]),
        Err(FeaturizerError::Poisoned { operation: "fit" })
    );
    assert_eq!(
        estimator.on_data_completed().map_err(|e| e.kind()),
        Err(ErrorKind::State)
    );
    assert_eq!(
        estimator.complete_training().map_err(|e| e.kind()),
        Err(ErrorKind::State)
    );
    assert_eq!(estimator.annotation_exists(), Ok(false));
}

#[test]
fn creates_min_max_transformer_once() {
    let annotations = ColumnAnnotations::new(1).unwrap();
    let mut estimator = TrainingOnlyEstimator::new(annotations, 0, StandardStatsAccumulator::<f32>::new()).unwrap();
    assert_eq!(
        estimator.create_transformer().err().map(|e| e.kind()),
        Some(ErrorKind::State)
    );

    estimator.begin_training().unwrap();
    estimator.fit(&[2.0, 4.0, f32::NAN, 10.0]).unwrap();
    estimator.complete_training().unwrap();

    let scaler = estimator.create_transformer().unwrap();
    assert_eq!(scaler.execute(&6.0), 0.5);
    assert!(scaler.execute(&f32::NAN).is_nan());
    assert_eq!(
        estimator.create_transformer().err(),
        Some(FeaturizerError::TransformerAlreadyCreated)
    );
}
