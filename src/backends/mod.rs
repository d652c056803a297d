// Backend client abstractions
//
// The router only sees these two traits plus one failure type; the concrete
// HTTP clients live in the submodules. Constructing the router with fakes
// behind these traits is how the routing policy is tested without network
// access.

use async_trait::async_trait;
use thiserror::Error;

use crate::router::ChatRequest;

pub mod dataset;
pub mod generative;

// Re-export commonly used types
pub use dataset::{
    ChatHistory, DatasetHttpClient, DatasetInfo, HistoryEntry, ModelCatalog, ModelComparison,
    ModelStatus, TrainOutcome,
};
pub use generative::GenerativeRelayClient;

/// Any way a backend call can fail, collapsed into one type.
///
/// The router treats every variant the same — fall through to the other
/// backend. The split exists for logging and for client-level tests: an
/// in-band `status: "error"` envelope delivered with HTTP 200 must be
/// indistinguishable from a socket reset as far as routing is concerned.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection failure, DNS failure, or request timeout.
    #[error("failed to reach backend: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx HTTP status.
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered but reported an application-level error
    /// (e.g. the relay's in-band `status: "error"` envelope).
    #[error("backend reported an error: {0}")]
    Api(String),

    /// The body could not be decoded into the expected shape.
    #[error("could not decode backend response: {0}")]
    Decode(String),
}

/// A successful dataset `/chat` reply, stripped of its wire envelope.
#[derive(Debug, Clone)]
pub struct DatasetReply {
    pub response: String,
    pub session_id: String,
    /// Retrieval similarity score, when the service supplies one.
    pub confidence: Option<f64>,
}

/// A successful generative relay reply, stripped of its envelope.
#[derive(Debug, Clone)]
pub struct GenerativeReply {
    pub response: String,
    pub session_id: String,
}

/// Capability interface for the dataset (retrieval-based) chat service.
#[async_trait]
pub trait DatasetClient: Send + Sync {
    /// Send one chat message and get the service's answer.
    async fn send(&self, request: &ChatRequest) -> Result<DatasetReply, BackendError>;

    /// Probe the service. Never errors; any probe failure reads as `false`.
    async fn health(&self) -> bool;
}

/// Capability interface for the generative (hosted LLM) chat service.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Send one chat message and get the model's answer.
    async fn send(&self, request: &ChatRequest) -> Result<GenerativeReply, BackendError>;

    /// Probe the relay. Never errors; any probe failure reads as `false`.
    async fn health(&self) -> bool;
}
