use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    clients::{self, CompletionCapability},
    config::{ConfigError, Settings},
    error::{AppError, Result},
    models::{
        completion::CompletionRequest,
        review::{ReviewRequest, ReviewResponse},
    },
    services::prompt::build_prompts,
};

/// Turns a raw request body into a drafted reply.
///
/// The capability is injected once and shared read-only across calls. A responder
/// built without one answers every request with a configuration error.
pub struct ReviewResponder {
    capability: std::result::Result<Arc<dyn CompletionCapability>, ConfigError>,
}

impl ReviewResponder {
    pub fn new(capability: Arc<dyn CompletionCapability>) -> Self {
        Self { capability: Ok(capability) }
    }

    pub fn unconfigured(err: ConfigError) -> Self {
        Self { capability: Err(err) }
    }

    pub fn from_env() -> Self {
        match Settings::from_env().and_then(|settings| clients::from_settings(&settings)) {
            Ok(capability) => Self::new(capability),
            Err(err) => {
                warn!(error = %err, "completion capability is not configured");
                Self::unconfigured(err)
            }
        }
    }

    #[instrument(skip_all, fields(body_len = body.len()))]
    pub async fn handle(&self, body: &[u8]) -> Result<ReviewResponse> {
        let capability = self.capability.as_ref().map_err(|e| AppError::Configuration(e.clone()))?;

        let review = ReviewRequest::parse(body)?;
        let request = CompletionRequest::for_prompts(build_prompts(&review));

        let text = capability.complete(&request).await?;
        if text.trim().is_empty() {
            return Err(AppError::Capability("no response generated".into()));
        }

        info!(provider = capability.name(), reply_len = text.len(), "reply generated");
        Ok(ReviewResponse { response: text })
    }
}
