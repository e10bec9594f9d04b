use crate::adapters::groq::DEFAULT_BASE_URL;
use crate::config::{validate_settings, DEFAULT_FALLBACK_MODEL, DEFAULT_MODEL};
use crate::core::model_switch::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::core::ConfigProvider;
use crate::utils::error::{ChatbotError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub provider: ProviderSection,
    #[serde(default)]
    pub assistant: AssistantSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub fallback_model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSection {
    #[serde(default = "default_true")]
    pub show_disclaimer: bool,
    #[serde(default)]
    pub extra_red_flags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for AssistantSection {
    fn default() -> Self {
        Self {
            show_disclaimer: true,
            extra_red_flags: Vec::new(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ChatbotError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GROQ_API_KEY})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn log_json(&self) -> bool {
        self.logging.json
    }
}

impl ConfigProvider for TomlConfig {
    fn api_key(&self) -> Option<&str> {
        // 未被替換的 ${VAR} 代表金鑰沒有提供
        self.provider
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
    }

    fn base_url(&self) -> &str {
        self.provider.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn primary_model(&self) -> &str {
        self.provider.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    fn fallback_model(&self) -> &str {
        self.provider
            .fallback_model
            .as_deref()
            .unwrap_or(DEFAULT_FALLBACK_MODEL)
    }

    fn max_tokens(&self) -> u32 {
        self.provider.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    fn temperature(&self) -> f32 {
        self.provider.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    fn show_disclaimer(&self) -> bool {
        self.assistant.show_disclaimer
    }

    fn extra_red_flags(&self) -> &[String] {
        &self.assistant.extra_red_flags
    }

    fn host(&self) -> &str {
        &self.server.host
    }

    fn port(&self) -> u16 {
        self.server.port
    }

    fn static_dir(&self) -> &Path {
        &self.server.static_dir
    }

    fn log_level(&self) -> &str {
        &self.logging.level
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
host = "0.0.0.0"
port = 8080
static_dir = "./public"

[provider]
api_key = "gsk_inline"
model = "model-a"
fallback_model = "model-b"
max_tokens = 256
temperature = 0.4

[assistant]
show_disclaimer = false
extra_red_flags = ['\bfainted\b']

[logging]
level = "debug"
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.static_dir(), Path::new("./public"));
        assert_eq!(config.api_key(), Some("gsk_inline"));
        assert_eq!(config.primary_model(), "model-a");
        assert_eq!(config.fallback_model(), "model-b");
        assert_eq!(config.max_tokens(), 256);
        assert!(!config.show_disclaimer());
        assert_eq!(config.extra_red_flags(), &[r"\bfainted\b".to_string()]);
        assert!(config.log_json());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 8000);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.primary_model(), DEFAULT_MODEL);
        assert_eq!(config.fallback_model(), DEFAULT_FALLBACK_MODEL);
        assert_eq!(config.max_tokens(), 400);
        assert!(config.show_disclaimer());
        assert_eq!(config.api_key(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MEDIBOT_TEST_GROQ_KEY", "gsk_from_env");

        let toml_content = r#"
[provider]
api_key = "${MEDIBOT_TEST_GROQ_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("gsk_from_env"));

        std::env::remove_var("MEDIBOT_TEST_GROQ_KEY");
    }

    #[test]
    fn test_unset_env_var_leaves_provider_unconfigured() {
        let toml_content = r#"
[provider]
api_key = "${MEDIBOT_TEST_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.provider.api_key.as_deref(),
            Some("${MEDIBOT_TEST_UNSET_VARIABLE}")
        );
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[provider]
base_url = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let err = TomlConfig::from_toml_str("[server\nport = ").unwrap_err();
        assert!(matches!(err, ChatbotError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[server]
port = 3000

[provider]
model = "file-model"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.port(), 3000);
        assert_eq!(config.primary_model(), "file-model");
    }
}
