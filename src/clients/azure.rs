use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{log_preview, redact, CompletionCapability};
use crate::config::{AzureSettings, ConfigError};
use crate::error::{AppError, Result};
use crate::models::completion::CompletionRequest;

/// Azure OpenAI chat completions over plain HTTPS.
pub struct AzureOpenAiClient {
    http: Client,
    url: Url,
    api_key: String,
    api_version: String,
    timeout: Duration,
}

impl AzureOpenAiClient {
    pub fn new(settings: &AzureSettings, timeout: Duration) -> std::result::Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        let url = completions_url(&settings.endpoint, &settings.deployment)?;
        info!(
            deployment = %settings.deployment,
            api_key_len = settings.api_key.len(),
            "azure completion client ready"
        );
        Ok(Self {
            http,
            url,
            api_key: settings.api_key.clone(),
            api_version: settings.api_version.clone(),
            timeout,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::Capability(format!("request timed out after {:?}", self.timeout))
        } else {
            AppError::Capability(redact(&err.without_url().to_string(), &self.api_key))
        }
    }
}

#[async_trait]
impl CompletionCapability for AzureOpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        log_preview(self.name(), request);

        let response = self
            .http
            .post(self.url.clone())
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .json(&json!({
                "messages": [
                    {"role": "system", "content": request.system_prompt},
                    {"role": "user", "content": request.user_prompt},
                ],
                "max_tokens": request.max_output_tokens,
                "temperature": request.temperature,
            }))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = summarize_error(status, &redact(&text, &self.api_key));
            warn!(status = status.as_u16(), "azure completion request failed");
            return Err(classify_status(status, detail));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(body["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }

    fn name(&self) -> &str {
        "azure-openai"
    }
}

/// `{endpoint}/openai/deployments/{deployment}/chat/completions`, with the deployment
/// percent-encoded as a single path segment.
fn completions_url(endpoint: &str, deployment: &str) -> std::result::Result<Url, ConfigError> {
    let mut url = Url::parse(endpoint).map_err(|_| ConfigError::Invalid("AZURE_OPENAI_ENDPOINT"))?;
    url.path_segments_mut()
        .map_err(|_| ConfigError::Invalid("AZURE_OPENAI_ENDPOINT"))?
        .pop_if_empty()
        .extend(["openai", "deployments", deployment, "chat", "completions"]);
    Ok(url)
}

fn classify_status(status: StatusCode, detail: String) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => AppError::Capability(format!("rate limited: {detail}")),
        _ => AppError::Capability(detail),
    }
}

/// Prefers the provider's `error.message`, falling back to a bounded slice of the raw body.
fn summarize_error(status: StatusCode, text: &str) -> String {
    let message = serde_json::from_str::<Value>(text).ok().and_then(|v| {
        v["error"]["message"]
            .as_str()
            .or_else(|| v["message"].as_str())
            .map(str::to_string)
    });
    match message {
        Some(m) => format!("{status}: {m}"),
        None if text.trim().is_empty() => status.to_string(),
        None => format!("{status}: {}", text.chars().take(200).collect::<String>()),
    }
}
