//! `AppConfig` struct and TOML read/write.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use cineview_api::tmdb::ListParams;
use cineview_core::browser::BrowserConfig;
use cineview_core::carousel::{CarouselConfig, DEFAULT_PAGE_SIZE};
use cineview_core::overlay::{DEFAULT_CREDITS_LIMIT, OverlayConfig};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB access settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Browser tuning.
    #[serde(default)]
    pub ui: UiConfig,
}

/// TMDB access configuration.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// v3 API key. `TMDB_API_KEY` overrides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Response language.
    #[serde(default = "default_language")]
    pub language: String,
    /// Region filter for catalog lists and movie search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("language", &self.language)
            .field("region", &self.region)
            .finish()
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: default_language(),
            region: None,
        }
    }
}

fn default_language() -> String {
    String::from("en-US")
}

/// Carousel, overlay, and animation settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiConfig {
    /// Cards per carousel window.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Cast and crew entries shown in the overlay.
    #[serde(default = "default_credits_limit")]
    pub credits_limit: usize,
    /// Carousel slide duration in milliseconds.
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
    /// Force-settle a carousel animation after this many milliseconds.
    #[serde(default = "default_transition_timeout_ms")]
    pub transition_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            credits_limit: default_credits_limit(),
            animation_ms: default_animation_ms(),
            transition_timeout_ms: default_transition_timeout_ms(),
        }
    }
}

const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

const fn default_credits_limit() -> usize {
    DEFAULT_CREDITS_LIMIT
}

const fn default_animation_ms() -> u64 {
    300
}

const fn default_transition_timeout_ms() -> u64 {
    2000
}

impl UiConfig {
    /// Carousel slide duration.
    #[must_use]
    pub const fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    /// Checks that a slide finishes before the carousel's fallback timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if `animation_ms` is not below `transition_timeout_ms`.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.animation_ms < self.transition_timeout_ms,
            "[ui].animation_ms ({}) must be less than [ui].transition_timeout_ms ({})",
            self.animation_ms,
            self.transition_timeout_ms
        );
        Ok(())
    }
}

/// Resolved TMDB credentials.
#[derive(Clone, PartialEq, Eq)]
pub enum TmdbAuth {
    /// v3 API key.
    ApiKey(String),
    /// v4 read access token.
    Token(String),
}

impl fmt::Debug for TmdbAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::Token(_) => f.write_str("Token(<redacted>)"),
        }
    }
}

impl TmdbConfig {
    /// Picks credentials: env API key, then configured API key, then env token.
    ///
    /// Blank values count as unset.
    #[must_use]
    pub fn resolve_auth(
        &self,
        env_api_key: Option<String>,
        env_token: Option<String>,
    ) -> Option<TmdbAuth> {
        let non_blank = |v: &String| !v.trim().is_empty();
        env_api_key
            .filter(non_blank)
            .or_else(|| self.api_key.clone().filter(non_blank))
            .map(TmdbAuth::ApiKey)
            .or_else(|| env_token.filter(non_blank).map(TmdbAuth::Token))
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if its `[ui]` timings are inconsistent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config
            .ui
            .validate()
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        Ok(config)
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// TOML for display, with the API key masked.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.tmdb.api_key.is_some() {
            shown.tmdb.api_key = Some(String::from("<redacted>"));
        }
        toml::to_string_pretty(&shown).context("failed to serialize config to TOML")
    }

    /// Browser settings derived from this config.
    #[must_use]
    pub fn browser_config(&self) -> BrowserConfig {
        let mut list = ListParams::default().language(self.tmdb.language.clone());
        if let Some(region) = &self.tmdb.region {
            list = list.region(region.clone());
        }
        BrowserConfig {
            carousel: CarouselConfig {
                page_size: self.ui.page_size,
                transition_timeout: Duration::from_millis(self.ui.transition_timeout_ms),
            },
            overlay: OverlayConfig {
                credits_limit: self.ui.credits_limit,
                ..OverlayConfig::default()
            },
            list,
        }
    }
}
