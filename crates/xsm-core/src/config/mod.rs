//! # Configuration System
//!
//! TOML configuration for xsm, read from `<config_dir>/config.toml` where
//! `<config_dir>` is `$XSM_CONFIG_DIR` or `~/.config/xsession-manager`.
//!
//! ```toml
//! [restore]
//! restoring_interval_ms = 2000
//! retry_passes = 15
//!
//! [close]
//! interval_ms = 250
//! ```
//!
//! ```rust,no_run
//! use xsm_core::config::{Config, XsmConfig};
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new();
//!     let settings = XsmConfig::load_hierarchy(&config)?;
//!     let config = config.with_paths(&settings.paths);
//!     println!("{}", config.sessions_dir.display());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use defaults::CONFIG_DIR_ENV;
pub use types::{CloseConfig, Config, MatchingConfig, PathsConfig, RestoreConfig, XsmConfig};
pub use validation::validate_config;

impl XsmConfig {
    /// See [`loading::load_hierarchy`].
    pub fn load_hierarchy(config: &Config) -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy(config)
    }

    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
