//! Configuration loader for supportdesk.
//!
//! Reads `config.toml` from the data directory (`~/.supportdesk/` in
//! production) and deserializes it into [`AppConfig`]. Falls back to the
//! shipped defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use supportdesk_types::config::AppConfig;

/// Resolve the data directory: `SUPPORTDESK_DATA_DIR` env var, falling
/// back to `~/.supportdesk`.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var("SUPPORTDESK_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".supportdesk")
        }
    }
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}
