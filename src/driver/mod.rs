//! Feeds a column to an estimator until it stops asking for data.
//!
//! Contract: batches are passed in order; `ResetAndContinue` restarts the pass
//! from the first item; a pass that ends without `Complete` is reported through
//! `on_data_completed`. Whatever stopped the loop, `complete_training` is called
//! afterwards exactly once by the driver, relying on it being a no-op for
//! estimators that already finished.


use log::*;
use ndarray::ArrayView1;

use crate::error::{FeaturizerError, Result};
use crate::estimator::{Estimator, FitResult, TrainingState};
use crate::traits::Value;

pub fn train<T>(estimator: &mut dyn Estimator<T>, data: &[T], batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(FeaturizerError::InvalidArgument(
            "batch size must be > 0".to_string(),
        ));
    }

    estimator.begin_training()?;

    let mut passes = 0usize;
    'passes: while estimator.state() == TrainingState::Training {
        passes += 1;
        trace!("{}: pass {} over {} items", estimator.name(), passes, data.len());

        for batch in data.chunks(batch_size) {
            match estimator.fit(batch)? {
                FitResult::Continue => (),
                FitResult::Complete => break 'passes,
                FitResult::ResetAndContinue => continue 'passes,
            }
        }

        match estimator.on_data_completed()? {
            FitResult::ResetAndContinue => continue,
            _ => break,
        }
    }

    estimator.complete_training()?;
    debug!("{} finished after {} passes", estimator.name(), passes);
    Ok(())
}

pub fn train_view<T: Value>(
    estimator: &mut dyn Estimator<T>,
    data: ArrayView1<T>,
    batch_size: usize,
) -> Result<()> {
    match data.as_slice() {
        Some(data) => train(estimator, data, batch_size),
        None => train(estimator, &data.to_vec(), batch_size),
    }
}
