use serde::{Deserialize, Serialize};

/// POST /chat 的請求內容；`message` 為 null 或缺少時視同空字串
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyMeta {
    pub provider: String,
    pub model: Option<String>,
}

impl ReplyMeta {
    pub const LOCAL_FALLBACK: &'static str = "local-generic-fallback";

    pub fn model(provider: &str, model: &str) -> Self {
        Self {
            provider: provider.to_string(),
            model: Some(model.to_string()),
        }
    }

    pub fn local_fallback() -> Self {
        Self {
            provider: Self::LOCAL_FALLBACK.to_string(),
            model: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyResult {
    pub reply: String,
    pub emergency: bool,
    pub meta: Option<ReplyMeta>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// 送往模型供應商的一次 chat completion 請求
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub text: String,
    pub model: String,
}
