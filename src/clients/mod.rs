use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ConfigError, ProviderSettings, Settings};
use crate::error::Result;
use crate::models::completion::CompletionRequest;

pub mod azure;
pub mod openai;

pub use self::azure::AzureOpenAiClient;
pub use self::openai::OpenAiClient;

/// A hosted chat-completion service.
///
/// Implementations classify their own failures: `AppError::Auth` for rejected
/// credentials, `AppError::Capability` for everything else. An absent completion
/// is returned as an empty string.
#[async_trait]
pub trait CompletionCapability: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
    fn name(&self) -> &str;
}

pub fn from_settings(settings: &Settings) -> std::result::Result<Arc<dyn CompletionCapability>, ConfigError> {
    Ok(match &settings.provider {
        ProviderSettings::Azure(azure) => Arc::new(AzureOpenAiClient::new(azure, settings.timeout)?),
        ProviderSettings::OpenAi(openai) => Arc::new(OpenAiClient::new(openai, settings.timeout)),
    })
}

/// Replaces every occurrence of `secret` in `text`.
pub(crate) fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, "[REDACTED]")
}

pub(crate) fn log_preview(provider: &str, request: &CompletionRequest) {
    tracing::debug!(
        provider,
        system_len = request.system_prompt.len(),
        user_len = request.user_prompt.len(),
        system_preview = %request.system_prompt.chars().take(80).collect::<String>(),
        user_preview = %request.user_prompt.chars().take(80).collect::<String>(),
        "sending completion request"
    );
}
