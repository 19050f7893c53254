use serde::Serialize;

use crate::services::prompt::ReplyPrompts;

pub const MAX_OUTPUT_TOKENS: u32 = 500;
pub const TEMPERATURE: f32 = 0.7;

/// What gets sent to the completion capability for a single review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn for_prompts(prompts: ReplyPrompts) -> Self {
        Self {
            system_prompt: prompts.system,
            user_prompt: prompts.user,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}
