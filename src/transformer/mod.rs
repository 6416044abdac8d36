mod min_max_scaler;
mod standard_scaler;

pub use min_max_scaler::MinMaxScalerTransformer;
pub use standard_scaler::StandardScalerTransformer;

use ndarray::{Array1, ArrayView1};

use crate::traits::Value;

/// The inference half of a transform. Parameters are fixed at construction, so a
/// transformer can be shared across threads.
pub trait Transformer: Send + Sync {
    type Input: Value;
    type Output: Clone;

    fn execute(&self, input: &Self::Input) -> Self::Output;

    fn execute_view(&self, inputs: ArrayView1<Self::Input>) -> Array1<Self::Output> {
        inputs.map(|input| self.execute(input))
    }
}
