use std::time::Duration;

use async_trait::async_trait;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};
use openai::Credentials;

use super::{log_preview, redact, CompletionCapability};
use crate::config::OpenAiSettings;
use crate::error::{AppError, Result};
use crate::models::completion::CompletionRequest;

/// OpenAI-compatible chat completions through the `openai` crate.
pub struct OpenAiClient {
    creds: Credentials,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(settings: &OpenAiSettings, timeout: Duration) -> Self {
        tracing::info!(
            model = %settings.model,
            api_key_len = settings.api_key.len(),
            "openai completion client ready"
        );
        Self {
            creds: Credentials::new(settings.api_key.clone(), settings.base_url.clone()),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            timeout,
        }
    }

    fn classify(&self, message: String) -> AppError {
        let detail = redact(&message, &self.api_key);
        let lowered = detail.to_ascii_lowercase();
        if lowered.contains("api key")
            || lowered.contains("invalid_api_key")
            || lowered.contains("unauthorized")
            || lowered.contains("permission")
        {
            AppError::Auth(detail)
        } else {
            AppError::Capability(detail)
        }
    }
}

#[async_trait]
impl CompletionCapability for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        log_preview(self.name(), request);
        let messages = vec![
            ChatCompletionMessage {
                role: ChatCompletionMessageRole::System,
                content: Some(request.system_prompt.clone()),
                name: None,
                function_call: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: ChatCompletionMessageRole::User,
                content: Some(request.user_prompt.clone()),
                name: None,
                function_call: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ];

        let pending = ChatCompletion::builder(&self.model, messages)
            .temperature(request.temperature)
            .max_tokens(u64::from(request.max_output_tokens))
            .credentials(self.creds.clone())
            .create();

        let completion_res = tokio::time::timeout(self.timeout, pending)
            .await
            .map_err(|_| {
                AppError::Capability(format!("request timed out after {:?}", self.timeout))
            })?;

        match completion_res {
            Ok(resp) => Ok(resp
                .choices
                .first()
                .and_then(|c| c.message.content.as_ref())
                .map(|c| c.to_string())
                .unwrap_or_default()),
            Err(e) => Err(self.classify(e.to_string())),
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}
