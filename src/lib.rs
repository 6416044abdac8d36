use ndarray::{ArrayView2, Axis};

pub use crate::error::{ErrorKind, FeaturizerError, OverflowGuard, Result};
pub use crate::parameters::Parameters;

use crate::annotations::ColumnAnnotations;
use crate::driver::train_view;
use crate::pipeline::StandardScalerEstimator;
use crate::transformer::StandardScalerTransformer;

pub mod accumulators;
pub mod annotations;
pub mod archive;
pub mod data_reader;
pub mod driver;
pub mod error;
pub mod estimator;
mod parameters;
pub mod pipeline;
#[cfg(test)]
mod tests;
pub mod traits;
pub mod transformer;
mod utils;

/// Trains one standard scaler per column of `data`, all sharing one annotation set.
pub fn fit_standard_scalers(
    params: &Parameters,
    data: ArrayView2<f64>,
) -> Result<Vec<StandardScalerTransformer<f64>>> {
    params.validate()?;
    let annotations = ColumnAnnotations::new(data.ncols())?;

    data.axis_iter(Axis(1))
        .enumerate()
        .map(|(column, values)| {
            let mut scaler = StandardScalerEstimator::<f64>::from_parameters(annotations.clone(), column, params)?;
            train_view(&mut scaler, values, params.batch_size)?;
            scaler.create_transformer()
        })
        .collect()
}
