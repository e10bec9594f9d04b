use crate::core::classifier::{Classification, RequestClassifier};
use crate::core::model_switch::ModelSwitchCaller;
use crate::domain::model::{ReplyMeta, ReplyResult};

pub const EMPTY_PROMPT_REPLY: &str = "Please enter a medical question or term.";

pub const EMERGENCY_REPLY: &str =
    "This may be an emergency — seek immediate medical care now. Call local emergency services.";

pub const DISCLAIMER: &str = "I am not a doctor; this is general information and not a substitute for professional medical advice.";

pub const LOCAL_FALLBACK_REPLY: &str = "I couldn't reach the remote knowledge service. \
General self-care: rest, hydrate, and use over-the-counter symptom relievers as directed. ";

/// Turns one user message into one reply. Never fails: every provider
/// problem degrades to the local fallback text.
pub struct ChatAssistant {
    classifier: RequestClassifier,
    caller: Option<ModelSwitchCaller>,
    show_disclaimer: bool,
}

impl ChatAssistant {
    pub fn new(
        classifier: RequestClassifier,
        caller: Option<ModelSwitchCaller>,
        show_disclaimer: bool,
    ) -> Self {
        if caller.is_none() {
            tracing::warn!("No model provider configured; replies will use the local fallback");
        }
        Self {
            classifier,
            caller,
            show_disclaimer,
        }
    }

    pub async fn reply(&self, message: &str) -> ReplyResult {
        let text = match self.classifier.classify(message) {
            Classification::Empty => {
                return ReplyResult {
                    reply: EMPTY_PROMPT_REPLY.to_string(),
                    emergency: false,
                    meta: None,
                }
            }
            Classification::Emergency(_) => {
                tracing::info!("Red flag detected; returning emergency guidance");
                return self.emergency_reply();
            }
            Classification::Clear(text) => text,
        };

        if let Some(caller) = &self.caller {
            match caller.call(&text).await {
                Ok(answer) => {
                    tracing::debug!("Reply produced by model {}", answer.model);
                    return ReplyResult {
                        reply: self.with_disclaimer(&answer.text),
                        emergency: false,
                        meta: Some(ReplyMeta::model(caller.provider_name(), &answer.model)),
                    };
                }
                Err(e) => {
                    tracing::error!("LLM failed; falling back to generic advice: {}", e);
                }
            }
        }

        self.local_fallback()
    }

    fn emergency_reply(&self) -> ReplyResult {
        let mut reply = EMERGENCY_REPLY.to_string();
        if self.show_disclaimer {
            reply.push(' ');
            reply.push_str(DISCLAIMER);
        }
        ReplyResult {
            reply,
            emergency: true,
            meta: None,
        }
    }

    /// 已含免責聲明就不重複加上
    fn with_disclaimer(&self, answer: &str) -> String {
        if !self.show_disclaimer
            || answer
                .to_lowercase()
                .contains(&DISCLAIMER.to_lowercase())
        {
            return answer.to_string();
        }
        format!("{}. {}", answer.trim_end_matches([' ', '.']), DISCLAIMER)
    }

    fn local_fallback(&self) -> ReplyResult {
        let mut reply = LOCAL_FALLBACK_REPLY.to_string();
        if self.show_disclaimer {
            reply.push_str(DISCLAIMER);
        }
        ReplyResult {
            reply: reply.trim_end().to_string(),
            emergency: false,
            meta: Some(ReplyMeta::local_fallback()),
        }
    }
}
