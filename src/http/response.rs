use serde_json::{json, Value};
use vercel_runtime::{Body, Response, StatusCode};

use super::cors::CORS_HEADERS;
use crate::error::{AppError, ValidationIssue};

pub fn error_response(err: &AppError) -> (StatusCode, Value) {
    match err {
        AppError::Validation(ValidationIssue::MissingFields(fields)) => (
            StatusCode::BAD_REQUEST,
            json!({
                "error": format!("Missing required fields: {}", fields.join(", ")),
                "details": {"missingFields": fields},
            }),
        ),
        AppError::Validation(ValidationIssue::MalformedBody(msg)) => (
            StatusCode::BAD_REQUEST,
            json!({"error": "Invalid JSON body", "details": msg}),
        ),
        AppError::Configuration(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({"error": "Service is not configured", "details": e.to_string()}),
        ),
        AppError::Auth(msg) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({"error": "Completion service rejected the configured credentials", "details": msg}),
        ),
        AppError::Capability(msg) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({"error": "Failed to generate response", "details": msg}),
        ),
        AppError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Internal server error"}),
        ),
    }
}

const FALLBACK_BODY: &str = r#"{"error":"Internal server error"}"#;

pub fn json_response<T: serde::Serialize>(status: StatusCode, value: &T) -> anyhow::Result<Response<Body>> {
    raw_json_response(status, serde_json::to_string(value)?)
}

fn raw_json_response(status: StatusCode, body: String) -> anyhow::Result<Response<Body>> {
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "application/json");
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }
    Ok(builder.body(body.into())?)
}

/// Last-resort answer when a response could not be assembled. Carries the same
/// headers as every other JSON response.
pub fn fallback_response() -> Response<Body> {
    raw_json_response(StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY.to_string()).unwrap_or_else(|_| {
        let mut resp = Response::new(Body::from(FALLBACK_BODY));
        *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        resp
    })
}
