//! Command-line arguments for the `recitation-tracker` binary.
//!
//! Priority: CLI flags > `settings.toml` > defaults.

use std::path::PathBuf;

use clap::Parser;

use recitation_tracker::config::{AppConfig, AppPaths};

/// Follow a recitation through the verse corpus, one transcript per stdin line.
#[derive(Parser, Debug)]
#[command(name = "recitation-tracker", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Path to the verse corpus JSON.
    #[arg(long = "corpus")]
    pub corpus: Option<PathBuf>,

    /// Number of ranked candidates per segment.
    #[arg(short = 'k', long = "top-k")]
    pub top_k: Option<usize>,

    /// Only search the currently tracked chapter.
    #[arg(long = "restrict-chapter")]
    pub restrict_chapter: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Feed lines through the live admission gate: lines arriving while one
    /// is being tracked replace each other instead of queueing.
    #[arg(long = "live")]
    pub live: bool,

    /// Write the effective settings to the config file and exit.
    #[arg(long = "write-config")]
    pub write_config: bool,
}

impl CliArgs {
    /// Load the config file named by `--config`, or the platform default.
    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        match &self.config {
            Some(path) => AppConfig::load_from(path),
            None => AppConfig::load(),
        }
    }

    /// Target of `--write-config`.
    pub fn settings_file(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| AppPaths::new().settings_file)
    }

    /// Handle `--write-config`: save `config` to [`settings_file`](Self::settings_file).
    ///
    /// Refuses when the existing file could not be loaded, so a file with a
    /// typo is never replaced by defaults.
    pub fn save_settings(
        &self,
        config: &AppConfig,
        load_error: Option<&anyhow::Error>,
    ) -> anyhow::Result<PathBuf> {
        let path = self.settings_file();
        if let Some(e) = load_error {
            anyhow::bail!(
                "not overwriting {} because it could not be loaded: {e:#}",
                path.display()
            );
        }
        config.save_to(&path)?;
        Ok(path)
    }

    /// Overlay command-line flags onto `config`.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.corpus {
            config.corpus.path = Some(path.clone());
        }
        if let Some(k) = self.top_k {
            config.search.top_k = k;
        }
        if self.restrict_chapter {
            config.search.restrict_to_current_chapter = true;
        }
        if let Some(level) = &self.log_level {
            config.log.level = level.clone();
        }
    }
}
