mod metrics;
pub mod views;

pub use metrics::{aggregate, DashboardMetrics, DateWindow, GroupBy};
