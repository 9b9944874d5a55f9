//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod logging;
pub mod plugins;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::plugins::PluginSettings;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Plugin system settings.
    #[serde(default)]
    pub plugins: PluginSettings,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `VIZHUB_`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("VIZHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        tracing::debug!(env = %env, "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from a single TOML file path.
    pub fn load_file(path: &std::path::Path) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_file_parses_plugin_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(
            file,
            r#"
[logging]
level = "debug"

[plugins]
disabled_plugins = ["slow-plugin"]

[[plugins.call_order.vizhub_get_reader]]
plugin = "builtins"
enabled = true
"#
        )
        .expect("write");

        let config = AppConfig::load_file(&path).expect("load");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.plugins.disabled_plugins, vec!["slow-plugin"]);
        let order = &config.plugins.call_order["vizhub_get_reader"];
        assert_eq!(order[0].plugin, "builtins");
        assert!(order[0].enabled);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = AppConfig::load_file(std::path::Path::new("/nonexistent/vizhub.toml"))
            .expect_err("should fail");
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
