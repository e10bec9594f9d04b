pub mod toml_config;

use crate::adapters::groq::DEFAULT_BASE_URL;
use crate::core::model_switch::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::logger;
use crate::utils::validation::{self, Validate};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_FALLBACK_MODEL: &str = "llama-3.3-8b-versatile";
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// `1`, `true`, `yes` (不分大小寫) 視為開啟，其他值一律關閉
pub fn parse_flag(value: &str) -> std::result::Result<bool, String> {
    Ok(matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    ))
}

#[derive(Debug, Clone, Parser)]
#[command(name = "medibot")]
#[command(about = "Safety-filtered medical chat endpoint backed by a remote LLM")]
pub struct CliConfig {
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    #[arg(long, env = "GROQ_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub groq_base_url: String,

    #[arg(long, env = "GROQ_MODEL", default_value = DEFAULT_MODEL)]
    pub groq_model: String,

    #[arg(long, env = "GROQ_MODEL_FALLBACK", default_value = DEFAULT_FALLBACK_MODEL)]
    pub groq_model_fallback: String,

    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    #[arg(
        long,
        env = "SHOW_DISCLAIMER",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = parse_flag
    )]
    pub show_disclaimer: bool,

    /// Additional red-flag regex (repeatable)
    #[arg(long = "red-flag", value_name = "PATTERN")]
    pub extra_red_flags: Vec<String>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    /// Path to a TOML configuration file; replaces the options above
    #[arg(short, long, env = "MEDIBOT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ConfigProvider for CliConfig {
    fn api_key(&self) -> Option<&str> {
        self.groq_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    fn base_url(&self) -> &str {
        &self.groq_base_url
    }

    fn primary_model(&self) -> &str {
        &self.groq_model
    }

    fn fallback_model(&self) -> &str {
        &self.groq_model_fallback
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn show_disclaimer(&self) -> bool {
        self.show_disclaimer
    }

    fn extra_red_flags(&self) -> &[String] {
        &self.extra_red_flags
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    fn log_level(&self) -> &str {
        &self.log_level
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self)
    }
}

/// 兩種設定來源共用的檢查
pub fn validate_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validation::validate_url("provider.base_url", config.base_url())?;
    validation::validate_non_empty_string("provider.model", config.primary_model())?;
    validation::validate_non_empty_string("provider.fallback_model", config.fallback_model())?;
    validation::validate_positive_number("provider.max_tokens", config.max_tokens() as usize, 1)?;
    validation::validate_range("provider.temperature", config.temperature(), 0.0, 2.0)?;
    validation::validate_non_empty_string("server.host", config.host())?;
    validation::validate_positive_number("server.port", config.port() as usize, 1)?;
    validation::validate_path("server.static_dir", &config.static_dir().to_string_lossy())?;
    validation::validate_one_of(
        "logging.level",
        &logger::normalize_level(config.log_level()),
        LOG_LEVELS,
    )?;
    Ok(())
}
