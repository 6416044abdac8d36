use std::cmp::Ordering;

/// Orders partially ordered values so they can be kept in a `BinaryHeap`.
/// Incomparable pairs (only `NaN`, which accumulators never store) compare equal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TotalOrder<A>(pub A);

impl<A: PartialOrd> PartialEq for TotalOrder<A> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<A: PartialOrd> Eq for TotalOrder<A> {}

impl<A: PartialOrd> PartialOrd for TotalOrder<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: PartialOrd> Ord for TotalOrder<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::total_order::TotalOrder;
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    #[test]
    fn max_heap_of_floats() {
        let mut heap: BinaryHeap<TotalOrder<f64>> = vec![0.5, -2.0, 3.25, 1.0]
            .into_iter()
            .map(TotalOrder)
            .collect();
        assert_eq!(heap.pop().map(|x| x.0), Some(3.25));
        assert_eq!(heap.pop().map(|x| x.0), Some(1.0));
    }

    #[test]
    fn min_heap_of_floats() {
        let mut heap: BinaryHeap<Reverse<TotalOrder<f32>>> = vec![0.5, -2.0, 3.25]
            .into_iter()
            .map(|x| Reverse(TotalOrder(x)))
            .collect();
        assert_eq!(heap.pop().map(|x| (x.0).0), Some(-2.0));
    }
}
