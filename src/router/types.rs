// Normalized request/response types for the hybrid chat router
//
// These abstract over the two backends' heterogeneous wire shapes so
// callers work with one result format regardless of which backend answered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which model the dataset service should answer with.
///
/// Forwarded verbatim to the dataset backend; the generative backend
/// ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    #[default]
    Basic,
    Enhanced,
}

impl ModelType {
    pub fn as_str(&self) -> &str {
        match self {
            ModelType::Basic => "basic",
            ModelType::Enhanced => "enhanced",
        }
    }
}

/// A chat message to route, plus the caller's routing preference.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The user's message. Forwarded as-is; callers trim/validate first.
    pub message: String,

    /// Opaque conversation token. A fresh one is generated per call when
    /// absent; the router neither stores nor validates it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Prefer the dataset backend for support-classified messages.
    pub use_dataset: bool,

    /// Passed through to the dataset backend only.
    pub model_type: ModelType,
}

impl ChatRequest {
    /// Create a request with the default routing preference (hybrid).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
            use_dataset: true,
            model_type: ModelType::Basic,
        }
    }

    /// Continue an existing conversation.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set the routing preference.
    pub fn with_use_dataset(mut self, use_dataset: bool) -> Self {
        self.use_dataset = use_dataset;
        self
    }

    /// Select the dataset model variant.
    pub fn with_model_type(mut self, model_type: ModelType) -> Self {
        self.model_type = model_type;
        self
    }

    /// The effective session token: the caller's, or a fresh opaque UUID.
    pub fn session_or_new(&self) -> String {
        self.session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}

/// Which backend produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Dataset,
    Generative,
}

impl ResponseSource {
    pub fn as_str(&self) -> &str {
        match self {
            ResponseSource::Dataset => "dataset",
            ResponseSource::Generative => "generative",
        }
    }
}

/// The normalized result handed back to callers.
///
/// `confidence` is only ever present on dataset responses; the constructors
/// enforce that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedResponse {
    pub response: String,
    pub source: ResponseSource,

    /// Echoes the request's session token, or the generated one.
    pub session_id: String,

    /// Elapsed wall-clock seconds measured by the router itself, never a
    /// backend-reported number.
    pub response_time: f64,

    pub timestamp: DateTime<Utc>,

    /// Retrieval similarity score supplied by the dataset backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl RoutedResponse {
    /// A response answered by the dataset backend.
    pub fn dataset(
        response: impl Into<String>,
        session_id: impl Into<String>,
        response_time: f64,
        confidence: Option<f64>,
    ) -> Self {
        Self {
            response: response.into(),
            source: ResponseSource::Dataset,
            session_id: session_id.into(),
            response_time,
            timestamp: Utc::now(),
            confidence,
        }
    }

    /// A response answered by the generative backend. Carries no confidence.
    pub fn generative(
        response: impl Into<String>,
        session_id: impl Into<String>,
        response_time: f64,
    ) -> Self {
        Self {
            response: response.into(),
            source: ResponseSource::Generative,
            session_id: session_id.into(),
            response_time,
            timestamp: Utc::now(),
            confidence: None,
        }
    }
}

/// Availability of the two backends as observed by `health_check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub dataset_available: bool,
    pub generative_available: bool,

    /// Both backends up at once.
    pub hybrid_mode: bool,
}

impl HealthSnapshot {
    pub fn new(dataset_available: bool, generative_available: bool) -> Self {
        Self {
            dataset_available,
            generative_available,
            hybrid_mode: dataset_available && generative_available,
        }
    }
}
