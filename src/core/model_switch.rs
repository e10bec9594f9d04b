use crate::domain::model::{ChatMessage, CompletionRequest, ProviderReply};
use crate::domain::ports::ChatProvider;
use crate::utils::error::ProviderError;
use std::sync::Arc;

pub const SYSTEM_PROMPT: &str = "You are a concise, safety-focused medical assistant. \
Keep answers short (2-4 sentences). If the topic is not about medicine or health, \
say that it is not related to medicine or health. Never give exact prescription doses. \
If the user mentions emergency symptoms, begin with \
'This may be an emergency — seek immediate medical care.'";

pub const DEFAULT_MAX_TOKENS: u32 = 400;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Calls the primary model and, only when the provider reports it as
/// unavailable, retries once on the fallback model.
pub struct ModelSwitchCaller {
    provider: Arc<dyn ChatProvider>,
    primary_model: String,
    fallback_model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ModelSwitchCaller {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        primary_model: impl Into<String>,
        fallback_model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            primary_model: primary_model.into(),
            fallback_model: fallback_model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_generation(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn request_for(&self, model: &str, user_text: &str) -> CompletionRequest {
        CompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user_text)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    pub async fn call(&self, user_text: &str) -> Result<ProviderReply, ProviderError> {
        let request = self.request_for(&self.primary_model, user_text);

        let err = match self.provider.complete(&request).await {
            Ok(text) => {
                return Ok(ProviderReply {
                    text,
                    model: self.primary_model.clone(),
                })
            }
            Err(err) => err,
        };

        tracing::warn!(
            "Primary model '{}' call failed: {}",
            self.primary_model,
            err
        );

        if !err.is_model_unavailable() || self.fallback_model == self.primary_model {
            return Err(err);
        }

        tracing::info!(
            "Primary model unavailable; switching to fallback: {}",
            self.fallback_model
        );

        let request = self.request_for(&self.fallback_model, user_text);
        match self.provider.complete(&request).await {
            Ok(text) => Ok(ProviderReply {
                text,
                model: self.fallback_model.clone(),
            }),
            Err(fallback_err) => {
                tracing::error!(
                    "Fallback model '{}' also failed: {}",
                    self.fallback_model,
                    fallback_err
                );
                Err(fallback_err)
            }
        }
    }
}
