//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! Tracking thresholds are deliberately absent: they live as constants in
//! [`crate::tracker`] and [`crate::matcher`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// CorpusConfig
// ---------------------------------------------------------------------------

/// Where the verse corpus is read from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Explicit path to a corpus JSON file.
    pub path: Option<PathBuf>,
}

impl CorpusConfig {
    /// The corpus path to load; see [`AppPaths::default_corpus`] for the
    /// fallback.
    pub fn resolve_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| AppPaths::new().default_corpus())
    }
}

// ---------------------------------------------------------------------------
// SearchConfig
// ---------------------------------------------------------------------------

/// Settings for the candidate search run on every transcribed segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of ranked candidates handed to the tracker.
    pub top_k: usize,
    /// Transcripts with fewer whitespace-separated tokens are not searched.
    pub min_query_tokens: usize,
    /// Restrict the search to the currently tracked chapter once one is known.
    ///
    /// When enabled, chapter switches can never be detected.
    pub restrict_to_current_chapter: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            min_query_tokens: 3,
            restrict_to_current_chapter: false,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Settings for the segment-processing session driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Capacity of the update channel towards the UI.
    pub channel_capacity: usize,
    /// Strip Arabic diacritics from transcripts before searching.
    pub normalize_transcripts: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 16,
            normalize_transcripts: true,
        }
    }
}

// ---------------------------------------------------------------------------
// LogConfig
// ---------------------------------------------------------------------------

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default `env_logger` filter, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use recitation_tracker::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Verse corpus location.
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Candidate search settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Session driver settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.  A missing file yields the defaults.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("config: {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        Ok(config)
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.session.channel_capacity == 0 {
            anyhow::bail!("session.channel_capacity must be at least 1");
        }
        Ok(())
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
