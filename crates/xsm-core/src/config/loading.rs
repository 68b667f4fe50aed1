//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `<config_dir>/config.toml`
//! 3. **CLI arguments** - Command-line flags (highest priority)

use crate::config::types::{Config, PathsConfig, XsmConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load defaults merged with the user config file, then validate.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed or validation fails. A
/// missing config file is not an error.
pub fn load_hierarchy(config: &Config) -> Result<XsmConfig, ConfigError> {
    let mut settings = XsmConfig::default();

    match load_config_file(&config.config_file()) {
        Ok(user_config) => settings = merge_configs(settings, user_config),
        Err(ConfigError::ConfigNotFound { path }) => {
            debug!(event = "core.config.file_not_found", path = path);
        }
        Err(e) => return Err(e),
    }

    validate_config(&settings)?;
    Ok(settings)
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<XsmConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("'{}': {}", path.display(), e),
    })
}

/// Merge two configurations, with override_config taking precedence.
///
/// Optional path values only replace base values when present. Scalar
/// sections always take the override's value, since a serde default cannot
/// be told apart from an explicit one.
pub fn merge_configs(base: XsmConfig, override_config: XsmConfig) -> XsmConfig {
    XsmConfig {
        paths: PathsConfig {
            sessions_dir: override_config
                .paths
                .sessions_dir
                .or(base.paths.sessions_dir),
            backups_dir: override_config.paths.backups_dir.or(base.paths.backups_dir),
        },
        restore: override_config.restore,
        close: override_config.close,
        matching: override_config.matching,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::in_dir(dir.path().to_path_buf());

        let settings = load_hierarchy(&config).unwrap();
        assert_eq!(settings.restore.retry_passes, 15);
    }

    #[test]
    fn test_user_config_loaded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            r#"
[paths]
sessions_dir = "/srv/sessions"

[restore]
restoring_interval_ms = 500

[matching]
leading_token_classes = ["jetbrains-", "code-oss"]
"#,
        )
        .unwrap();
        let config = Config::in_dir(dir.path().to_path_buf());

        let settings = load_hierarchy(&config).unwrap();
        assert_eq!(
            settings.paths.sessions_dir,
            Some(PathBuf::from("/srv/sessions"))
        );
        assert_eq!(settings.restore.restoring_interval_ms, 500);
        assert_eq!(settings.restore.retry_passes, 15);
        assert_eq!(
            settings.matching.leading_token_classes,
            vec!["jetbrains-", "code-oss"]
        );
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "invalid toml [[[").unwrap();
        let config = Config::in_dir(dir.path().to_path_buf());

        let result = load_hierarchy(&config);
        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[restore]\nplacement_every = 0\n",
        )
        .unwrap();
        let config = Config::in_dir(dir.path().to_path_buf());

        let result = load_hierarchy(&config);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_merge_keeps_base_paths() {
        let base: XsmConfig = toml::from_str("[paths]\nbackups_dir = \"/b\"\n").unwrap();
        let over: XsmConfig = toml::from_str("[close]\ninterval_ms = 10\n").unwrap();

        let merged = merge_configs(base, over);
        assert_eq!(merged.paths.backups_dir, Some(PathBuf::from("/b")));
        assert_eq!(merged.close.interval_ms, 10);
    }
}
