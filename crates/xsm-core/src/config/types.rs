//! Configuration type definitions.
//!
//! # Example Configuration
//!
//! ```toml
//! [paths]
//! sessions_dir = "/home/me/sessions"
//!
//! [restore]
//! restoring_interval_ms = 1000
//! retry_passes = 20
//!
//! [close]
//! interval_ms = 500
//!
//! [matching]
//! leading_token_classes = ["jetbrains-", "code-oss"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime paths, derived from the environment and the `[paths]` section.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `config.toml` (default: ~/.config/xsession-manager)
    pub config_dir: PathBuf,
    /// Saved session files
    pub sessions_dir: PathBuf,
    /// Superseded session files
    pub backups_dir: PathBuf,
}

/// Settings loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct XsmConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub restore: RestoreConfig,

    #[serde(default)]
    pub close: CloseConfig,

    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Overrides for where sessions and backups live.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathsConfig {
    #[serde(default)]
    pub sessions_dir: Option<PathBuf>,

    #[serde(default)]
    pub backups_dir: Option<PathBuf>,
}

/// Pacing and retry bounds for restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreConfig {
    /// Pause after each successful launch.
    #[serde(default = "super::defaults::default_restoring_interval_ms")]
    pub restoring_interval_ms: u64,

    /// A placement pass is requested after every N launches.
    #[serde(default = "super::defaults::default_placement_every")]
    pub placement_every: u32,

    /// Trailing placement passes once all launches are done.
    #[serde(default = "super::defaults::default_retry_passes")]
    pub retry_passes: u32,

    /// Trailing passes when the heaviest saved app had a single window.
    #[serde(default = "super::defaults::default_short_retry_passes")]
    pub short_retry_passes: u32,

    #[serde(default = "super::defaults::default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Settle time after moving a window to another desktop.
    #[serde(default = "super::defaults::default_move_settle_ms")]
    pub move_settle_ms: u64,

    #[serde(default = "super::defaults::default_enumeration_retry_delay_ms")]
    pub enumeration_retry_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseConfig {
    /// Delay between two close requests.
    #[serde(default = "super::defaults::default_close_interval_ms")]
    pub interval_ms: u64,
}

/// Window disambiguation for processes owning several windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// WM_CLASS prefixes whose windows are matched by the first word of the
    /// title instead of the full title.
    #[serde(default = "super::defaults::default_leading_token_classes")]
    pub leading_token_classes: Vec<String>,
}
