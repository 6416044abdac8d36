pub(crate) mod logging;
mod total_order;

pub(crate) use total_order::TotalOrder;
