use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::annotations::Median;
use crate::error::{FeaturizerError, Result};
use crate::estimator::Accumulator;
use crate::parameters::Parameters;
use crate::traits::{Scalar, Value};
use crate::utils::TotalOrder;

pub const MEDIAN_NAME: &str = "MedianEstimator";

/// Running median over two heaps: `smaller` (max-heap) holds the lower half,
/// `larger` (min-heap) the upper half. `smaller` is never shorter than
/// `larger` and never more than one element longer.
pub struct MedianAccumulator<T: Value> {
    interpolate: bool,
    smaller: BinaryHeap<TotalOrder<T::NonNull>>,
    larger: BinaryHeap<Reverse<TotalOrder<T::NonNull>>>,
}

impl<T: Value> MedianAccumulator<T> {
    pub fn new(interpolate: bool) -> Self {
        Self {
            interpolate,
            smaller: BinaryHeap::new(),
            larger: BinaryHeap::new(),
        }
    }

    pub fn from_parameters(parameters: &Parameters) -> Self {
        Self::new(parameters.interpolate_median)
    }

    pub fn len(&self) -> usize {
        self.smaller.len() + self.larger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_balanced(&self) -> bool {
        let (smaller, larger) = (self.smaller.len(), self.larger.len());
        smaller == larger || smaller == larger + 1
    }

    pub fn push(&mut self, value: T::NonNull) {
        let goes_low = match self.smaller.peek() {
            Some(top) => value <= top.0,
            None => true,
        };
        if goes_low {
            self.smaller.push(TotalOrder(value));
        } else {
            self.larger.push(Reverse(TotalOrder(value)));
        }
        self.rebalance();
    }

    /// Moves at most one element between the heaps to restore the size invariant
    /// after a single push.
    pub fn rebalance(&mut self) {
        if self.smaller.len() >= self.larger.len() + 2 {
            if let Some(top) = self.smaller.pop() {
                self.larger.push(Reverse(top));
            }
        } else if self.larger.len() > self.smaller.len() {
            if let Some(Reverse(top)) = self.larger.pop() {
                self.smaller.push(top);
            }
        }
    }

    fn interpolated(&self) -> Result<Scalar> {
        if !self.interpolate {
            return Err(FeaturizerError::Internal(
                "interpolation requested while it is disabled",
            ));
        }
        let lower = self.smaller.peek().and_then(|top| top.0.to_f64());
        let upper = self.larger.peek().and_then(|top| (top.0).0.to_f64());
        match (lower, upper) {
            (Some(lower), Some(upper)) => Ok(Scalar::Float((lower + upper) / 2.0)),
            _ => Err(FeaturizerError::InvalidArgument(
                "interpolating a median requires numeric values".to_string(),
            )),
        }
    }

    fn median(&self) -> Result<Scalar> {
        let top = self.smaller.peek().ok_or(FeaturizerError::NoElements)?;
        if !self.interpolate || self.len() % 2 == 1 {
            Ok(top.0.to_scalar())
        } else {
            self.interpolated()
        }
    }
}

impl<T: Value> Accumulator for MedianAccumulator<T> {
    type Input = T;
    type Output = Median;

    const NAME: &'static str = MEDIAN_NAME;

    fn update(&mut self, item: &T) -> Result<()> {
        if let Some(value) = item.non_null() {
            self.push(value.clone());
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<Median> {
        let median = self.median();
        self.smaller.clear();
        self.larger.clear();
        Median::new(median?)
    }
}
