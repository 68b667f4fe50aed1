//! Default values for configuration types.

use crate::config::types::{CloseConfig, Config, MatchingConfig, PathsConfig, RestoreConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "XSM_CONFIG_DIR";

const APP_DIR_NAME: &str = "xsession-manager";

pub fn default_restoring_interval_ms() -> u64 {
    2000
}

pub fn default_placement_every() -> u32 {
    3
}

pub fn default_retry_passes() -> u32 {
    15
}

pub fn default_short_retry_passes() -> u32 {
    5
}

pub fn default_retry_interval_ms() -> u64 {
    1500
}

pub fn default_move_settle_ms() -> u64 {
    250
}

pub fn default_enumeration_retry_delay_ms() -> u64 {
    250
}

pub fn default_close_interval_ms() -> u64 {
    250
}

pub fn default_leading_token_classes() -> Vec<String> {
    vec!["jetbrains-".to_string()]
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            restoring_interval_ms: default_restoring_interval_ms(),
            placement_every: default_placement_every(),
            retry_passes: default_retry_passes(),
            short_retry_passes: default_short_retry_passes(),
            retry_interval_ms: default_retry_interval_ms(),
            move_settle_ms: default_move_settle_ms(),
            enumeration_retry_delay_ms: default_enumeration_retry_delay_ms(),
        }
    }
}

impl Default for CloseConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_close_interval_ms(),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            leading_token_classes: default_leading_token_classes(),
        }
    }
}

/// `$XSM_CONFIG_DIR`, else `<XDG config>/xsession-manager`.
pub fn default_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }

    match dirs::config_dir() {
        Some(dir) => dir.join(APP_DIR_NAME),
        None => {
            eprintln!(
                "Warning: Could not find config directory. Set HOME environment variable. \
                Using fallback directory."
            );
            std::env::temp_dir().join(APP_DIR_NAME)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::in_dir(default_config_dir())
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout rooted at `config_dir`: `sessions/` and `sessions/backups/`.
    pub fn in_dir(config_dir: PathBuf) -> Self {
        let sessions_dir = config_dir.join("sessions");
        let backups_dir = sessions_dir.join("backups");
        Self {
            config_dir,
            sessions_dir,
            backups_dir,
        }
    }

    /// Apply `[paths]` overrides. A relocated sessions dir carries its
    /// backups along unless `backups_dir` is also set.
    pub fn with_paths(mut self, paths: &PathsConfig) -> Self {
        if let Some(sessions_dir) = &paths.sessions_dir {
            self.sessions_dir = sessions_dir.clone();
            self.backups_dir = sessions_dir.join("backups");
        }
        if let Some(backups_dir) = &paths.backups_dir {
            self.backups_dir = backups_dir.clone();
        }
        self
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn session_path(&self, session_name: &str) -> PathBuf {
        self.sessions_dir.join(session_name)
    }
}

impl RestoreConfig {
    pub fn restoring_interval(&self) -> Duration {
        Duration::from_millis(self.restoring_interval_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn move_settle(&self) -> Duration {
        Duration::from_millis(self.move_settle_ms)
    }

    pub fn enumeration_retry_delay(&self) -> Duration {
        Duration::from_millis(self.enumeration_retry_delay_ms)
    }
}

impl CloseConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
