pub mod assistant;
pub mod classifier;
pub mod model_switch;

pub use crate::domain::model::{
    ChatMessage, CompletionRequest, ProviderReply, ReplyMeta, ReplyResult,
};
pub use crate::domain::ports::{ChatProvider, ConfigProvider};
pub use crate::utils::error::{ProviderError, Result};
