// Generative relay client.
//
// The hosted LLM is reached through a same-origin relay that holds the API
// credential server-side. The relay is a single POST endpoint speaking an
// action envelope, and it reports application failures in-band with HTTP
// 200 — `status: "error"` in the body, never an error status code. That
// contract is preserved exactly here and collapsed into `BackendError::Api`
// so the router sees one failure type.
//
// API contract (one endpoint, e.g. http://localhost:8888/.netlify/functions/chat):
//
//   POST /
//     Body: { action: "send", message, session_id }
//     Response: { status: "success", response, session_id, response_time,
//                 timestamp }
//            or { status: "error", message }  (with HTTP 200)
//
//   action: "translate" — { action, message, target_language } → analogous
//   envelope carrying the translated text.
//
//   action: "health" — direct probe, same envelope.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BackendError, GenerativeClient, GenerativeReply};
use crate::router::ChatRequest;

/// Client for the generative chat relay.
pub struct GenerativeRelayClient {
    endpoint: String,
    http: Client,
}

impl GenerativeRelayClient {
    pub fn new(endpoint: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    /// Translate text via the relay. Not on the router's path.
    pub async fn translate(
        &self,
        message: &str,
        target_language: &str,
    ) -> Result<String, BackendError> {
        let body = ActionBody {
            action: "translate",
            message: Some(message),
            session_id: None,
            target_language: Some(target_language),
        };
        let envelope = self.post(&body).await?;
        envelope
            .response
            .ok_or_else(|| BackendError::Decode("translate reply missing text".to_string()))
    }

    /// Send one action envelope and decode the reply, mapping the in-band
    /// `status: "error"` to a failure.
    async fn post(&self, body: &ActionBody<'_>) -> Result<RelayEnvelope, BackendError> {
        let resp = self.http.post(&self.endpoint).json(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: RelayEnvelope = resp
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        if envelope.status == "error" {
            return Err(BackendError::Api(
                envelope
                    .message
                    .unwrap_or_else(|| "relay reported an error".to_string()),
            ));
        }

        Ok(envelope)
    }
}

#[async_trait]
impl GenerativeClient for GenerativeRelayClient {
    async fn send(&self, request: &ChatRequest) -> Result<GenerativeReply, BackendError> {
        let body = ActionBody {
            action: "send",
            message: Some(&request.message),
            session_id: request.session_id.as_deref(),
            target_language: None,
        };
        let envelope = self.post(&body).await?;

        let response = envelope
            .response
            .ok_or_else(|| BackendError::Decode("send reply missing response text".to_string()))?;

        Ok(GenerativeReply {
            response,
            session_id: envelope
                .session_id
                .or_else(|| request.session_id.clone())
                .unwrap_or_default(),
        })
    }

    async fn health(&self) -> bool {
        let body = ActionBody {
            action: "health",
            message: None,
            session_id: None,
            target_language: None,
        };
        match self.post(&body).await {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!("Generative health probe failed: {}", err);
                false
            }
        }
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct ActionBody<'a> {
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_language: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RelayEnvelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
}
