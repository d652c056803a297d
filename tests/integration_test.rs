// Integration tests for the hybrid routing policy
//
// Fake backend clients injected behind the capability traits record the
// order backends were attempted in, so every routing/fallback property can
// be checked without network access.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use helpline::backends::{
    BackendError, DatasetClient, DatasetReply, GenerativeClient, GenerativeReply,
};
use helpline::router::{ChatRequest, HybridRouter, ResponseSource, NO_BACKEND_GUIDANCE};

#[derive(Clone, Default)]
struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    fn push(&self, backend: &'static str) {
        self.0.lock().unwrap().push(backend);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

struct FakeDataset {
    log: CallLog,
    healthy: bool,
    confidence: Option<f64>,
}

#[async_trait]
impl DatasetClient for FakeDataset {
    async fn send(&self, request: &ChatRequest) -> Result<DatasetReply, BackendError> {
        self.log.push("dataset");
        if self.healthy {
            Ok(DatasetReply {
                response: "dataset answer".to_string(),
                session_id: request.session_id.clone().unwrap_or_default(),
                confidence: self.confidence,
            })
        } else {
            Err(BackendError::Api("model not trained".to_string()))
        }
    }

    async fn health(&self) -> bool {
        self.healthy
    }
}

struct FakeGenerative {
    log: CallLog,
    healthy: bool,
}

#[async_trait]
impl GenerativeClient for FakeGenerative {
    async fn send(&self, request: &ChatRequest) -> Result<GenerativeReply, BackendError> {
        self.log.push("generative");
        if self.healthy {
            Ok(GenerativeReply {
                response: "generative answer".to_string(),
                session_id: request.session_id.clone().unwrap_or_default(),
            })
        } else {
            Err(BackendError::Api("API key not configured".to_string()))
        }
    }

    async fn health(&self) -> bool {
        self.healthy
    }
}

fn router(dataset_up: bool, generative_up: bool, log: &CallLog) -> HybridRouter {
    router_with_confidence(dataset_up, generative_up, Some(0.9), log)
}

fn router_with_confidence(
    dataset_up: bool,
    generative_up: bool,
    confidence: Option<f64>,
    log: &CallLog,
) -> HybridRouter {
    HybridRouter::new(
        Arc::new(FakeDataset {
            log: log.clone(),
            healthy: dataset_up,
            confidence,
        }),
        Arc::new(FakeGenerative {
            log: log.clone(),
            healthy: generative_up,
        }),
    )
}

#[tokio::test]
async fn test_support_query_with_preference_goes_to_dataset_first() {
    let log = CallLog::default();
    let router = router(true, true, &log);

    let result = router
        .route(ChatRequest::new("I need a refund").with_use_dataset(true))
        .await
        .unwrap();

    assert_eq!(result.source, ResponseSource::Dataset);
    assert_eq!(result.response, "dataset answer");
    assert_eq!(log.calls(), vec!["dataset"]);
}

#[tokio::test]
async fn test_general_query_goes_to_generative_first() {
    let log = CallLog::default();
    let router = router(true, true, &log);

    let result = router
        .route(ChatRequest::new("tell me a joke").with_use_dataset(true))
        .await
        .unwrap();

    assert_eq!(result.source, ResponseSource::Generative);
    assert_eq!(log.calls(), vec!["generative"]);
}

#[tokio::test]
async fn test_support_query_without_preference_goes_to_generative_first() {
    let log = CallLog::default();
    let router = router(true, true, &log);

    let result = router
        .route(ChatRequest::new("help with billing").with_use_dataset(false))
        .await
        .unwrap();

    assert_eq!(result.source, ResponseSource::Generative);
    assert_eq!(log.calls(), vec!["generative"]);
}

#[tokio::test]
async fn test_dataset_failure_falls_back_to_generative() {
    let log = CallLog::default();
    let router = router(false, true, &log);

    let result = router
        .route(ChatRequest::new("help with billing").with_use_dataset(true))
        .await
        .unwrap();

    assert_eq!(result.source, ResponseSource::Generative);
    assert!(result.confidence.is_none());
    assert_eq!(log.calls(), vec!["dataset", "generative"]);
}

#[tokio::test]
async fn test_generative_failure_falls_back_to_dataset() {
    let log = CallLog::default();
    let router = router(true, false, &log);

    let result = router
        .route(ChatRequest::new("what's the capital of France?").with_use_dataset(false))
        .await
        .unwrap();

    assert_eq!(result.source, ResponseSource::Dataset);
    assert_eq!(result.response, "dataset answer");
    assert_eq!(log.calls(), vec!["generative", "dataset"]);
}

#[tokio::test]
async fn test_both_backends_down_yields_guidance_not_error() {
    let log = CallLog::default();
    let router = router(false, false, &log);

    let result = router
        .route(ChatRequest::new("I need a refund").with_use_dataset(true))
        .await
        .unwrap();

    assert_eq!(result.source, ResponseSource::Generative);
    assert_eq!(result.response, NO_BACKEND_GUIDANCE);
    assert!(result.response.contains("credential"));
    assert!(result.confidence.is_none());
    // Each backend attempted exactly once
    assert_eq!(log.calls(), vec!["dataset", "generative"]);
}

#[tokio::test]
async fn test_both_backends_down_general_path_yields_guidance() {
    let log = CallLog::default();
    let router = router(false, false, &log);

    let result = router
        .route(ChatRequest::new("tell me a joke").with_use_dataset(false))
        .await
        .unwrap();

    assert_eq!(result.source, ResponseSource::Generative);
    assert_eq!(result.response, NO_BACKEND_GUIDANCE);
    assert_eq!(log.calls(), vec!["generative", "dataset"]);
}

#[tokio::test]
async fn test_dataset_success_carries_backend_confidence() {
    let log = CallLog::default();
    let router = router_with_confidence(true, true, Some(0.87), &log);

    let result = router
        .route(ChatRequest::new("billing problem").with_use_dataset(true))
        .await
        .unwrap();

    assert_eq!(result.source, ResponseSource::Dataset);
    assert_eq!(result.confidence, Some(0.87));
}

#[tokio::test]
async fn test_dataset_success_without_confidence_stays_none() {
    let log = CallLog::default();
    let router = router_with_confidence(true, true, None, &log);

    let result = router
        .route(ChatRequest::new("billing problem").with_use_dataset(true))
        .await
        .unwrap();

    assert_eq!(result.source, ResponseSource::Dataset);
    assert!(result.confidence.is_none());
}

#[tokio::test]
async fn test_response_time_is_router_measured() {
    let log = CallLog::default();
    let router = router(true, true, &log);

    let result = router
        .route(ChatRequest::new("hello").with_use_dataset(false))
        .await
        .unwrap();

    // The fakes report no timing of their own; whatever is here came from
    // the router's clock.
    assert!(result.response_time >= 0.0);
    assert!(result.response_time < 5.0);
}

#[tokio::test]
async fn test_session_id_is_echoed() {
    let log = CallLog::default();
    let router = router(true, true, &log);

    let result = router
        .route(
            ChatRequest::new("I need a refund")
                .with_use_dataset(true)
                .with_session_id("s-42"),
        )
        .await
        .unwrap();

    assert_eq!(result.session_id, "s-42");
}

#[tokio::test]
async fn test_missing_session_id_is_generated() {
    let log = CallLog::default();
    let router = router(true, true, &log);

    let result = router
        .route(ChatRequest::new("hello").with_use_dataset(false))
        .await
        .unwrap();

    assert!(!result.session_id.is_empty());
}

#[tokio::test]
async fn test_health_check_reports_both_up() {
    let log = CallLog::default();
    let snapshot = router(true, true, &log).health_check().await;
    assert!(snapshot.dataset_available);
    assert!(snapshot.generative_available);
    assert!(snapshot.hybrid_mode);
}

#[tokio::test]
async fn test_health_check_probes_are_independent() {
    let log = CallLog::default();
    let snapshot = router(false, true, &log).health_check().await;
    assert!(!snapshot.dataset_available);
    assert!(snapshot.generative_available);
    assert!(!snapshot.hybrid_mode);

    let snapshot = router(true, false, &log).health_check().await;
    assert!(snapshot.dataset_available);
    assert!(!snapshot.generative_available);
    assert!(!snapshot.hybrid_mode);
}

#[tokio::test]
async fn test_health_check_reports_both_down() {
    let log = CallLog::default();
    let snapshot = router(false, false, &log).health_check().await;
    assert!(!snapshot.dataset_available);
    assert!(!snapshot.generative_available);
    assert!(!snapshot.hybrid_mode);
}
