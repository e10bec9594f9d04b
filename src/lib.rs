pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::GroqClient;
pub use crate::app::build_assistant;
pub use crate::app::server::{router, AppState};
pub use crate::config::{toml_config::TomlConfig, CliConfig};
pub use crate::core::{
    assistant::ChatAssistant, classifier::RequestClassifier, model_switch::ModelSwitchCaller,
};
pub use crate::utils::error::{ChatbotError, ProviderError, Result};
