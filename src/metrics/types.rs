// Metrics data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::router::ResponseSource;

/// One routed message, with the query hashed for privacy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteMetric {
    pub timestamp: DateTime<Utc>,
    pub query_hash: String,
    pub source: ResponseSource,
    pub support_classified: bool,
    pub fallback_used: bool,
    /// Both backends failed; the response was the synthetic guidance text.
    pub degraded: bool,
    pub confidence: Option<f64>,
    pub response_time_ms: u64,
}

impl RouteMetric {
    pub fn new(
        query_hash: String,
        source: ResponseSource,
        support_classified: bool,
        fallback_used: bool,
        degraded: bool,
        confidence: Option<f64>,
        response_time_ms: u64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            query_hash,
            source,
            support_classified,
            fallback_used,
            degraded,
            confidence,
            response_time_ms,
        }
    }
}
