use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 接受 Python 風格的等級名稱 (WARNING、CRITICAL)，轉成 tracing 的寫法
pub fn normalize_level(level: &str) -> String {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        other => other.to_string(),
    }
}

fn default_filter(log_level: &str, verbose: bool) -> EnvFilter {
    let level = if verbose {
        "debug".to_string()
    } else {
        normalize_level(log_level)
    };
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("medibot={level},tower_http={level}")))
}

pub fn init_logger(log_level: &str, verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(log_level, verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON 格式日誌，方便容器環境的日誌收集
pub fn init_json_logger(log_level: &str, verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(log_level, verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("WARNING"), "warn");
        assert_eq!(normalize_level("critical"), "error");
        assert_eq!(normalize_level(" Info "), "info");
        assert_eq!(normalize_level("debug"), "debug");
    }
}
