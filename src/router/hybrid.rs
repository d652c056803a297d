// Hybrid routing logic
//
// Picks one backend per message, applies one level of fallback, and
// normalizes whichever answered into a `RoutedResponse`. Support-style
// queries go to the dataset backend (trained on a support corpus, cheaper,
// more relevant); everything else defaults to the generative backend. The
// fallback is symmetric: whichever backend was tried first, the other is
// attempted once before giving up, and "giving up" still produces a
// successful response carrying remediation guidance — the chat UI always
// has something to display.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use super::support::{KeywordClassifier, SupportClassifier};
use super::types::{ChatRequest, HealthSnapshot, RoutedResponse};
use crate::backends::{
    BackendError, DatasetClient, DatasetHttpClient, GenerativeClient, GenerativeRelayClient,
};
use crate::config::Settings;
use crate::metrics::{MetricsLogger, RouteMetric};

/// Degraded-mode response text returned when both backends are unreachable.
pub const NO_BACKEND_GUIDANCE: &str = "I'm unable to reach my response services right now. \
    Please verify the generative API credential configuration (the relay's API key) \
    and that the dataset service is running, then try again.";

/// Which backend to attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Dataset,
    Generative,
}

impl Backend {
    fn as_str(&self) -> &str {
        match self {
            Backend::Dataset => "Dataset",
            Backend::Generative => "Generative",
        }
    }
}

/// The hybrid response router.
///
/// Holds no state beyond its collaborators; concurrent `route` and
/// `health_check` calls need no coordination.
pub struct HybridRouter {
    dataset: Arc<dyn DatasetClient>,
    generative: Arc<dyn GenerativeClient>,
    classifier: Box<dyn SupportClassifier>,
    metrics: Option<MetricsLogger>,
}

impl HybridRouter {
    pub fn new(dataset: Arc<dyn DatasetClient>, generative: Arc<dyn GenerativeClient>) -> Self {
        Self {
            dataset,
            generative,
            classifier: Box::new(KeywordClassifier),
            metrics: None,
        }
    }

    /// Swap the keyword heuristic for another classifier.
    pub fn with_classifier(mut self, classifier: Box<dyn SupportClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Record a metric line per routed message. Best-effort: a logging
    /// failure never affects the response.
    pub fn with_metrics(mut self, metrics: MetricsLogger) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Wire the two HTTP clients and the metrics logger from configuration.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let dataset = DatasetHttpClient::new(
            settings.dataset.base_url.clone(),
            settings.dataset.timeout_seconds,
        )?;
        let generative = GenerativeRelayClient::new(
            settings.relay.base_url.clone(),
            settings.relay.timeout_seconds,
        )?;
        let metrics = MetricsLogger::new(settings.metrics_dir.clone())?;
        Ok(Self::new(Arc::new(dataset), Arc::new(generative)).with_metrics(metrics))
    }

    /// Route one chat message: at most two backend calls, each backend
    /// attempted at most once. Backend unavailability never produces an
    /// `Err` — at worst the result is the synthetic guidance response.
    pub async fn route(&self, mut request: ChatRequest) -> Result<RoutedResponse> {
        let started = Instant::now();
        let session_id = request.session_or_new();
        request.session_id = Some(session_id.clone());

        let is_support = self.classifier.is_support_query(&request.message);
        let dataset_first = request.use_dataset && is_support;
        tracing::debug!(
            "Routing message (support={}, dataset_first={})",
            is_support,
            dataset_first
        );

        let (primary, fallback) = if dataset_first {
            (Backend::Dataset, Backend::Generative)
        } else {
            (Backend::Generative, Backend::Dataset)
        };

        let mut fallback_used = false;
        let mut degraded = false;

        let response = match self.attempt(primary, &request, &session_id, started).await {
            Ok(response) => response,
            Err(err) => {
                fallback_used = true;
                tracing::warn!(
                    "{} backend unavailable, trying {}: {}",
                    primary.as_str(),
                    fallback.as_str(),
                    err
                );
                match self.attempt(fallback, &request, &session_id, started).await {
                    Ok(response) => response,
                    Err(err) => {
                        degraded = true;
                        tracing::warn!("Both backends unavailable: {}", err);
                        RoutedResponse::generative(
                            NO_BACKEND_GUIDANCE,
                            session_id,
                            started.elapsed().as_secs_f64(),
                        )
                    }
                }
            }
        };

        self.record(&request, is_support, fallback_used, degraded, &response);
        Ok(response)
    }

    /// Probe both backends concurrently. The probes are independent: one
    /// failing slow or hard does not alter the other's reported status.
    pub async fn health_check(&self) -> HealthSnapshot {
        let (dataset_available, generative_available) =
            tokio::join!(self.dataset.health(), self.generative.health());
        HealthSnapshot::new(dataset_available, generative_available)
    }

    /// One backend call, normalized into a `RoutedResponse` on success. The
    /// elapsed time is taken from the router's clock, not the backend.
    async fn attempt(
        &self,
        backend: Backend,
        request: &ChatRequest,
        session_id: &str,
        started: Instant,
    ) -> Result<RoutedResponse, BackendError> {
        match backend {
            Backend::Dataset => {
                let reply = self.dataset.send(request).await?;
                Ok(RoutedResponse::dataset(
                    reply.response,
                    session_id,
                    started.elapsed().as_secs_f64(),
                    reply.confidence,
                ))
            }
            Backend::Generative => {
                let reply = self.generative.send(request).await?;
                Ok(RoutedResponse::generative(
                    reply.response,
                    session_id,
                    started.elapsed().as_secs_f64(),
                ))
            }
        }
    }

    fn record(
        &self,
        request: &ChatRequest,
        support_classified: bool,
        fallback_used: bool,
        degraded: bool,
        response: &RoutedResponse,
    ) {
        let Some(logger) = &self.metrics else {
            return;
        };
        let metric = RouteMetric::new(
            MetricsLogger::hash_query(&request.message),
            response.source,
            support_classified,
            fallback_used,
            degraded,
            response.confidence,
            (response.response_time * 1000.0) as u64,
        );
        if let Err(err) = logger.log(&metric) {
            tracing::warn!("Failed to record route metric: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guidance_text_names_the_credential() {
        assert!(NO_BACKEND_GUIDANCE.contains("credential"));
        assert!(NO_BACKEND_GUIDANCE.contains("API key"));
    }
}
