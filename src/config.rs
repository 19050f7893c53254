use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_DEPLOYMENT: &str = "gpt-4-turbo";
pub const DEFAULT_API_VERSION: &str = "2024-02-01";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration problems. Only variable names are ever reported, never values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid value for {0}")]
    Invalid(&'static str),
    #[error("completion client could not be initialised: {0}")]
    Client(String),
}

#[derive(Clone)]
pub struct AzureSettings {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
}

#[derive(Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub enum ProviderSettings {
    Azure(AzureSettings),
    OpenAi(OpenAiSettings),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout = match get("COMPLETION_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid("COMPLETION_TIMEOUT_SECS"))?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let provider = match get("COMPLETION_PROVIDER").map(|p| p.to_ascii_lowercase()) {
            None => azure_settings(&get)?,
            Some(p) if p == "azure" => azure_settings(&get)?,
            Some(p) if p == "openai" => openai_settings(&get)?,
            Some(_) => return Err(ConfigError::Invalid("COMPLETION_PROVIDER")),
        };

        Ok(Self { provider, timeout })
    }
}

fn azure_settings(get: &dyn Fn(&str) -> Option<String>) -> Result<ProviderSettings, ConfigError> {
    let endpoint = get("AZURE_OPENAI_ENDPOINT");
    let api_key = get("AZURE_OPENAI_API_KEY");
    let (endpoint, api_key) = match (endpoint, api_key) {
        (Some(endpoint), Some(api_key)) => (endpoint, api_key),
        (endpoint, api_key) => {
            let mut missing = Vec::new();
            if endpoint.is_none() {
                missing.push("AZURE_OPENAI_ENDPOINT");
            }
            if api_key.is_none() {
                missing.push("AZURE_OPENAI_API_KEY");
            }
            return Err(ConfigError::Missing(missing));
        }
    };
    Ok(ProviderSettings::Azure(AzureSettings {
        endpoint,
        api_key,
        deployment: get("AZURE_OPENAI_DEPLOYMENT_NAME").unwrap_or_else(|| DEFAULT_DEPLOYMENT.into()),
        api_version: get("AZURE_OPENAI_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.into()),
    }))
}

fn openai_settings(get: &dyn Fn(&str) -> Option<String>) -> Result<ProviderSettings, ConfigError> {
    let api_key = get("OPENAI_API_KEY")
        .or_else(|| get("OPENAI_KEY"))
        .ok_or_else(|| ConfigError::Missing(vec!["OPENAI_API_KEY"]))?;
    Ok(ProviderSettings::OpenAi(OpenAiSettings {
        api_key,
        base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
        model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_DEPLOYMENT.into()),
    }))
}

impl fmt::Debug for AzureSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &format_args!("<{} chars>", self.api_key.len()))
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &format_args!("<{} chars>", self.api_key.len()))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}
