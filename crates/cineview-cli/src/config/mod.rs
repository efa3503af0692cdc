//! Application configuration module.
//!
//! Manages the TOML config file holding TMDB credentials, language and
//! region, and the browser's `[ui]` tuning.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, TmdbAuth};
pub use paths::{log_path_for, resolve_config_path};
