pub mod handlers;
pub mod server;

use crate::adapters::GroqClient;
use crate::core::assistant::ChatAssistant;
use crate::core::classifier::RequestClassifier;
use crate::core::model_switch::ModelSwitchCaller;
use crate::core::{ChatProvider, ConfigProvider};
use crate::utils::error::Result;
use std::sync::Arc;

/// 依設定組出 ChatAssistant；沒有 API key 時只使用本地備援回覆
pub fn build_assistant<C: ConfigProvider + ?Sized>(config: &C) -> Result<ChatAssistant> {
    let classifier = RequestClassifier::with_extra_patterns(config.extra_red_flags())?;

    let caller = match config.api_key() {
        Some(api_key) => {
            let provider: Arc<dyn ChatProvider> =
                Arc::new(GroqClient::new(api_key, config.base_url())?);
            tracing::info!(
                "Using provider '{}' with models {} -> {}",
                provider.name(),
                config.primary_model(),
                config.fallback_model()
            );
            Some(
                ModelSwitchCaller::new(provider, config.primary_model(), config.fallback_model())
                    .with_generation(config.max_tokens(), config.temperature()),
            )
        }
        None => None,
    };

    Ok(ChatAssistant::new(
        classifier,
        caller,
        config.show_disclaimer(),
    ))
}
