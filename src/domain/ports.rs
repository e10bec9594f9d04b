use crate::domain::model::CompletionRequest;
use crate::utils::error::ProviderError;
use async_trait::async_trait;
use std::path::Path;

pub trait ConfigProvider: Send + Sync {
    /// 空白或未設定代表不使用遠端模型
    fn api_key(&self) -> Option<&str>;
    fn base_url(&self) -> &str;
    fn primary_model(&self) -> &str;
    fn fallback_model(&self) -> &str;
    fn max_tokens(&self) -> u32;
    fn temperature(&self) -> f32;
    fn show_disclaimer(&self) -> bool;
    fn extra_red_flags(&self) -> &[String];
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn static_dir(&self) -> &Path;
    fn log_level(&self) -> &str;
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the trimmed text of the first completion choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}
