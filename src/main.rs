use anyhow::Context;
use clap::Parser;
use medibot::app::server;
use medibot::core::ConfigProvider;
use medibot::utils::{logger, validation::Validate};
use medibot::{build_assistant, AppState, CliConfig, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 指定設定檔時以檔案為準
    let toml = match &cli.config {
        Some(path) => Some(
            TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?,
        ),
        None => None,
    };
    let config: &dyn ConfigProvider = match &toml {
        Some(toml) => toml,
        None => &cli,
    };

    let log_json = cli.log_json || toml.as_ref().is_some_and(|t| t.log_json());
    if log_json {
        logger::init_json_logger(config.log_level(), cli.verbose);
    } else {
        logger::init_logger(config.log_level(), cli.verbose);
    }

    tracing::info!("Starting medibot {}", env!("CARGO_PKG_VERSION"));

    let validation = match &toml {
        Some(toml) => toml.validate(),
        None => cli.validate(),
    };
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::debug!(
        "Config: provider={}, models={} -> {}, disclaimer={}, static_dir={}",
        if config.api_key().is_some() { "groq" } else { "none" },
        config.primary_model(),
        config.fallback_model(),
        config.show_disclaimer(),
        config.static_dir().display()
    );

    let assistant = build_assistant(config).context("failed to build chat assistant")?;
    let state = AppState::new(assistant, config.static_dir());

    server::serve(config.host(), config.port(), state)
        .await
        .context("server terminated")?;

    tracing::info!("✅ Server stopped");
    Ok(())
}
