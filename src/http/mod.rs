use tracing::{error, warn};
use vercel_runtime::{Body, Response, StatusCode};

use crate::error::AppError;
use crate::services::review_reply::ReviewResponder;

pub mod cors;
pub mod response;

use response::{error_response, fallback_response, json_response};

/// Maps one inbound call to exactly one outbound response.
pub async fn route(responder: &ReviewResponder, method: &str, body: &[u8]) -> Response<Body> {
    let result = match method {
        "OPTIONS" => cors::preflight(),
        "POST" => match responder.handle(body).await {
            Ok(reply) => json_response(StatusCode::OK, &reply),
            Err(err) => {
                log_failure(&err);
                let (status, value) = error_response(&err);
                json_response(status, &value)
            }
        },
        other => {
            warn!(method = other, "method not allowed");
            method_not_allowed()
        }
    };
    result.unwrap_or_else(|e| {
        error!(error = %e, "failed to build response");
        fallback_response()
    })
}

fn method_not_allowed() -> anyhow::Result<Response<Body>> {
    let mut resp = json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &serde_json::json!({"error": "Use POST with a JSON body {userName, userTitle, propertyName, reviewText}"}),
    )?;
    resp.headers_mut().insert("Allow", "POST, OPTIONS".parse()?);
    Ok(resp)
}

fn log_failure(err: &AppError) {
    match err {
        AppError::Validation(issue) => warn!(kind = err.kind(), %issue, "rejected review request"),
        AppError::Internal(cause) => error!(kind = err.kind(), error = ?cause, "unexpected failure"),
        _ => error!(kind = err.kind(), error = %err, "reply generation failed"),
    }
}
