// Router module
// Public interface for the hybrid routing policy

mod hybrid;
mod support;
mod types;

pub use hybrid::{HybridRouter, NO_BACKEND_GUIDANCE};
pub use support::{KeywordClassifier, SupportClassifier};
pub use types::{ChatRequest, HealthSnapshot, ModelType, ResponseSource, RoutedResponse};
