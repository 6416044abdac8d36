mod median;
mod norm;
mod stats;
mod std_deviation;

pub use median::{MedianAccumulator, MEDIAN_NAME};
pub use norm::L2NormUpdater;
pub use stats::{
    BasicStatsAccumulator, BasicStatsUpdater, StandardStatsAccumulator, StandardStatsUpdater,
    STATISTICS_NAME,
};
pub use std_deviation::{StandardDeviationAccumulator, STANDARD_DEVIATION_NAME};
