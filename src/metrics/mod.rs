// Metrics module
// Public interface for logging and tracking route metrics

mod logger;
mod types;

pub use logger::{MetricsLogger, RouteSummary};
pub use types::RouteMetric;
