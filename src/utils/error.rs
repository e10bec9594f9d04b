use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatbotError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Invalid pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

pub type Result<T> = std::result::Result<T, ChatbotError>;

/// 模型供應商呼叫失敗的分類。重試決策只依賴這裡的變體，不看錯誤訊息文字。
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Model '{model}' is unavailable: {message}")]
    ModelUnavailable { model: String, message: String },

    #[error("Provider rejected credentials: {0}")]
    Unauthorized(String),

    #[error("Provider rate limit reached: {0}")]
    RateLimited(String),

    #[error("Provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Provider request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// 是否應改用備援模型重試
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, ProviderError::ModelUnavailable { .. })
    }
}
