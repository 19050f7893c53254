//! Handler behaviour against a counting fake completion capability, plus one
//! end-to-end run through the Azure client against a mock server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use review_reply_api::clients::AzureOpenAiClient;
use review_reply_api::config::{AzureSettings, ConfigError};
use review_reply_api::http::route;
use review_reply_api::models::completion::{CompletionRequest, MAX_OUTPUT_TOKENS, TEMPERATURE};
use review_reply_api::{AppError, CompletionCapability, ReviewResponder};
use serde_json::{json, Value};
use vercel_runtime::StatusCode;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "azure-key-0123456789";

enum Behaviour {
    Reply(&'static str),
    AuthFailure,
    Unavailable,
}

struct FakeCapability {
    behaviour: Behaviour,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl FakeCapability {
    fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionCapability for FakeCapability {
    async fn complete(&self, request: &CompletionRequest) -> review_reply_api::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match self.behaviour {
            Behaviour::Reply(text) => Ok(text.to_string()),
            Behaviour::AuthFailure => Err(AppError::Auth("401 Unauthorized: Access denied".into())),
            Behaviour::Unavailable => Err(AppError::Capability("503 Service Unavailable".into())),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn responder(fake: &Arc<FakeCapability>) -> ReviewResponder {
    ReviewResponder::new(fake.clone())
}

fn sample_body() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "userName": "Alice",
        "userTitle": "GM",
        "propertyName": "Lakeview Inn",
        "reviewText": "Great stay, loved the pool."
    }))
    .unwrap()
}

async fn post(responder: &ReviewResponder, body: &[u8]) -> (StatusCode, Value) {
    let resp = route(responder, "POST", body).await;
    let value = serde_json::from_slice(resp.body()).unwrap();
    (resp.status(), value)
}

#[tokio::test]
async fn echoes_capability_text_with_200() {
    let fake = FakeCapability::new(Behaviour::Reply("OK"));
    let (status, body) = post(&responder(&fake), &sample_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "OK"}));
    assert_eq!(fake.calls(), 1);
}

#[tokio::test]
async fn reply_is_returned_unchanged() {
    let reply = "Dear Guest, ... Warm Regards, Alice";
    let fake = FakeCapability::new(Behaviour::Reply(reply));
    let (status, body) = post(&responder(&fake), &sample_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], reply);
}

#[tokio::test]
async fn every_field_reaches_the_user_prompt() {
    let fake = FakeCapability::new(Behaviour::Reply("OK"));
    post(&responder(&fake), &sample_body()).await;

    let request = fake.last_request.lock().unwrap().clone().unwrap();
    for value in ["Alice", "GM", "Lakeview Inn", "Great stay, loved the pool."] {
        assert!(request.user_prompt.contains(value), "missing {value:?}");
    }
    assert_eq!(request.max_output_tokens, MAX_OUTPUT_TOKENS);
    assert_eq!(request.temperature, TEMPERATURE);
}

#[tokio::test]
async fn missing_fields_never_call_the_capability() {
    let fake = FakeCapability::new(Behaviour::Reply("OK"));
    let responder = responder(&fake);
    let full = json!({
        "userName": "Alice",
        "userTitle": "GM",
        "propertyName": "Lakeview Inn",
        "reviewText": "Great stay, loved the pool."
    });

    for field in ["userName", "userTitle", "propertyName", "reviewText"] {
        let mut partial = full.clone();
        partial.as_object_mut().unwrap().remove(field);
        let (status, body) = post(&responder, &serde_json::to_vec(&partial).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["missingFields"], json!([field]));

        let mut blank = full.clone();
        blank[field] = json!("  ");
        let (status, _) = post(&responder, &serde_json::to_vec(&blank).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let malformed: [&[u8]; 3] = [b"{oops", b"[]", br#"["Alice","GM","Lakeview Inn","Great stay"]"#];
    for raw in malformed {
        let (status, body) = post(&responder, raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON body");
    }

    assert_eq!(fake.calls(), 0);
}

#[tokio::test]
async fn empty_completion_is_a_capability_error() {
    for reply in ["", "   \n"] {
        let fake = FakeCapability::new(Behaviour::Reply(reply));
        let err = responder(&fake).handle(&sample_body()).await.unwrap_err();
        assert_eq!(err.kind(), "CapabilityError");

        let (status, body) = post(&responder(&fake), &sample_body()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["details"], "no response generated");
    }
}

#[tokio::test]
async fn auth_failure_is_classified() {
    let fake = FakeCapability::new(Behaviour::AuthFailure);
    let err = responder(&fake).handle(&sample_body()).await.unwrap_err();
    assert_eq!(err.kind(), "AuthError");

    let (status, body) = post(&responder(&fake), &sample_body()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Completion service rejected the configured credentials");
}

#[tokio::test]
async fn rejected_key_never_reaches_response_details() {
    let server = MockServer::start().await;
    for (body, status) in [
        (
            json!({"error": {"code": "401", "message": format!("Access denied for key {SECRET}.")}})
                .to_string(),
            401,
        ),
        (format!("{}{SECRET} is not valid", "x".repeat(190)), 403),
    ] {
        server.reset().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt-4-turbo/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let settings = AzureSettings {
            endpoint: server.uri(),
            api_key: SECRET.to_string(),
            deployment: "gpt-4-turbo".to_string(),
            api_version: "2024-02-01".to_string(),
        };
        let client = AzureOpenAiClient::new(&settings, Duration::from_secs(5)).unwrap();
        let responder = ReviewResponder::new(Arc::new(client));

        let (code, value) = post(&responder, &sample_body()).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        let details = value["details"].as_str().unwrap();
        assert!(details.contains("[REDACTED]"), "details: {details}");
        assert!(!details.contains(&SECRET[..8]), "details: {details}");
        server.verify().await;
    }
}

#[tokio::test]
async fn capability_failure_maps_to_503() {
    let fake = FakeCapability::new(Behaviour::Unavailable);
    let (status, body) = post(&responder(&fake), &sample_body()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Failed to generate response");
}

#[tokio::test]
async fn configuration_error_takes_precedence_over_validation() {
    let responder = ReviewResponder::unconfigured(ConfigError::Missing(vec![
        "AZURE_OPENAI_ENDPOINT",
        "AZURE_OPENAI_API_KEY",
    ]));

    for body in [sample_body(), b"{}".to_vec()] {
        let (status, value) = post(&responder, &body).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(value["error"], "Service is not configured");
        assert!(value["details"].as_str().unwrap().contains("AZURE_OPENAI_API_KEY"));
    }
}

#[tokio::test]
async fn identical_calls_give_identical_bodies() {
    let fake = FakeCapability::new(Behaviour::Reply("Dear Guest, thank you."));
    let responder = responder(&fake);
    let first = route(&responder, "POST", &sample_body()).await;
    let second = route(&responder, "POST", &sample_body()).await;
    assert_eq!(&first.body()[..], &second.body()[..]);
    assert_eq!(fake.calls(), 2);
}

#[tokio::test]
async fn preflight_and_other_methods() {
    let fake = FakeCapability::new(Behaviour::Reply("OK"));
    let responder = responder(&fake);

    let resp = route(&responder, "OPTIONS", b"").await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(resp.headers()["Access-Control-Allow-Methods"], "POST, OPTIONS");
    assert!(resp.body().is_empty());

    let resp = route(&responder, "GET", b"").await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers()["Allow"], "POST, OPTIONS");

    assert_eq!(fake.calls(), 0);
}
