// Dataset chat service client.
//
// Talks to the retrieval-based support bot's REST API. The service reports
// application failures with an in-band `status` field (sometimes alongside a
// non-2xx code, sometimes with HTTP 200), so every reply is checked twice:
// HTTP status first, envelope status second.
//
// API contract (all routes under a configurable base URL, e.g.
// http://localhost:5000/api):
//
//   POST /chat
//     Body: { message, session_id?, model_type }
//     Response: { status, response, session_id, model_type, response_time,
//                 confidence?, timestamp }
//
//   GET /health
//     Response: { status, timestamp, models, version }
//
//   GET /model-status, GET /models, POST /compare,
//   GET /chat/history/{session_id}?limit=N, DELETE /chat/clear/{session_id},
//   POST /train, GET /dataset/info — management surface, not on the
//   router's path.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{BackendError, DatasetClient, DatasetReply};
use crate::router::{ChatRequest, ModelType};

/// Client for the dataset chat service.
pub struct DatasetHttpClient {
    base_url: String,
    http: Client,
}

impl DatasetHttpClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Model load state and training history for both models.
    pub async fn model_status(&self) -> Result<ModelStatus, BackendError> {
        let url = format!("{}/model-status", self.base_url);
        let resp = self.http.get(&url).send().await?;
        decode_json(resp).await
    }

    /// Catalog of the basic/enhanced model variants.
    pub async fn models(&self) -> Result<ModelCatalog, BackendError> {
        let url = format!("{}/models", self.base_url);
        let resp = self.http.get(&url).send().await?;
        let catalog: ModelCatalog = decode_json(resp).await?;
        check_envelope_status(&catalog.status, &None)?;
        Ok(catalog)
    }

    /// Ask both models the same question and get side-by-side answers.
    pub async fn compare(&self, message: &str) -> Result<ModelComparison, BackendError> {
        let url = format!("{}/compare", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&CompareBody { message })
            .send()
            .await?;
        let comparison: ModelComparison = decode_json(resp).await?;
        check_envelope_status(&comparison.status, &None)?;
        Ok(comparison)
    }

    /// Conversation history for a session, newest `limit` entries.
    pub async fn history(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<ChatHistory, BackendError> {
        let mut url = format!("{}/chat/history/{}", self.base_url, session_id);
        if let Some(limit) = limit {
            url.push_str(&format!("?limit={}", limit));
        }
        let resp = self.http.get(&url).send().await?;
        decode_json(resp).await
    }

    /// Drop a session's stored history.
    pub async fn clear_history(&self, session_id: &str) -> Result<(), BackendError> {
        let url = format!("{}/chat/clear/{}", self.base_url, session_id);
        let resp = self.http.delete(&url).send().await?;
        let envelope: StatusEnvelope = decode_json(resp).await?;
        check_envelope_status(&envelope.status, &envelope.message)?;
        Ok(())
    }

    /// Kick off training for one model variant. Slow; the service rate-limits
    /// this endpoint aggressively.
    pub async fn train(&self, model_type: ModelType) -> Result<TrainOutcome, BackendError> {
        let url = format!("{}/train", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&TrainBody { model_type })
            .send()
            .await?;
        let outcome: TrainOutcome = decode_json(resp).await?;
        check_envelope_status(&outcome.status, &outcome.message)?;
        Ok(outcome)
    }

    /// Availability and sample rows of the processed training dataset.
    pub async fn dataset_info(&self) -> Result<DatasetInfo, BackendError> {
        let url = format!("{}/dataset/info", self.base_url);
        let resp = self.http.get(&url).send().await?;
        let info: DatasetInfo = decode_json(resp).await?;
        check_envelope_status(&info.status, &info.message)?;
        Ok(info)
    }
}

#[async_trait]
impl DatasetClient for DatasetHttpClient {
    async fn send(&self, request: &ChatRequest) -> Result<DatasetReply, BackendError> {
        let url = format!("{}/chat", self.base_url);
        let body = ChatBody {
            message: &request.message,
            session_id: request.session_id.as_deref(),
            model_type: request.model_type,
        };

        let resp = self.http.post(&url).json(&body).send().await?;
        let envelope: ChatEnvelope = decode_json(resp).await?;
        check_envelope_status(&envelope.status, &envelope.message)?;

        let response = envelope
            .response
            .ok_or_else(|| BackendError::Decode("chat reply missing response text".to_string()))?;

        Ok(DatasetReply {
            response,
            session_id: envelope
                .session_id
                .or_else(|| request.session_id.clone())
                .unwrap_or_default(),
            confidence: envelope.confidence,
        })
    }

    async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).send().await {
            Ok(resp) => {
                resp.status().is_success()
                    && resp.json::<serde_json::Value>().await.is_ok()
            }
            Err(err) => {
                tracing::debug!("Dataset health probe failed: {}", err);
                false
            }
        }
    }
}

/// Map a response to `T`, surfacing non-2xx statuses and undecodable bodies
/// as their own error variants.
async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, BackendError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(BackendError::Status {
            status: status.as_u16(),
            body,
        });
    }
    resp.json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// The service reports failures in-band: `status != "success"` is a failure
/// regardless of the HTTP code.
fn check_envelope_status(status: &str, message: &Option<String>) -> Result<(), BackendError> {
    if status == "success" {
        return Ok(());
    }
    Err(BackendError::Api(
        message
            .clone()
            .unwrap_or_else(|| format!("dataset service reported status {:?}", status)),
    ))
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
    model_type: ModelType,
}

#[derive(Debug, Deserialize)]
struct ChatEnvelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct CompareBody<'a> {
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct TrainBody {
    model_type: ModelType,
}

/// Response from GET /model-status.
#[derive(Debug, Deserialize)]
pub struct ModelStatus {
    pub models: ModelStates,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct ModelStates {
    pub basic: ModelState,
    pub enhanced: ModelState,
}

#[derive(Debug, Deserialize)]
pub struct ModelState {
    pub loaded: bool,
    #[serde(default)]
    pub info: serde_json::Value,
    #[serde(default)]
    pub training_history: serde_json::Value,
}

/// Response from GET /models.
#[derive(Debug, Deserialize)]
pub struct ModelCatalog {
    pub status: String,
    pub models: ModelDescriptions,
}

#[derive(Debug, Deserialize)]
pub struct ModelDescriptions {
    pub basic: ModelDescription,
    pub enhanced: ModelDescription,
}

#[derive(Debug, Deserialize)]
pub struct ModelDescription {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub loaded: bool,
}

/// Response from POST /compare.
#[derive(Debug, Deserialize)]
pub struct ModelComparison {
    pub status: String,
    pub message: String,
    pub responses: ComparedAnswers,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct ComparedAnswers {
    pub basic: ComparedAnswer,
    pub enhanced: ComparedAnswer,
}

#[derive(Debug, Deserialize)]
pub struct ComparedAnswer {
    pub response: String,
    pub response_time: f64,
    pub available: bool,
}

/// Response from GET /chat/history/{session_id}.
#[derive(Debug, Deserialize)]
pub struct ChatHistory {
    pub status: String,
    pub session_id: String,
    pub created_at: String,
    pub model_type: ModelType,
    pub messages: Vec<HistoryEntry>,
    pub total_messages: usize,
}

#[derive(Debug, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub user_message: String,
    pub bot_response: String,
    pub model_type: ModelType,
    pub response_time: f64,
}

/// Response from POST /train.
#[derive(Debug, Deserialize)]
pub struct TrainOutcome {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    pub model_type: ModelType,
    #[serde(default)]
    pub results: serde_json::Value,
    pub timestamp: String,
}

/// Response from GET /dataset/info.
#[derive(Debug, Deserialize)]
pub struct DatasetInfo {
    pub status: String,
    pub dataset_available: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub info: serde_json::Value,
    #[serde(default)]
    pub samples: serde_json::Value,
    pub timestamp: String,
}
