//! Where settings and the verse corpus live on disk.
//!
//! | What            | Linux                                   |
//! |-----------------|-----------------------------------------|
//! | `settings.toml` | `~/.config/recitation-tracker/`         |
//! | `quran.json`    | `~/.local/share/recitation-tracker/`    |
//!
//! Windows and macOS use the equivalent `dirs` locations.  A `quran.json`
//! in the working directory is picked up when the data dir has none.

use std::path::{Path, PathBuf};

const APP_NAME: &str = "recitation-tracker";
const SETTINGS_FILE_NAME: &str = "settings.toml";
const CORPUS_FILE_NAME: &str = "quran.json";

/// Resolved directories and default file locations.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
    pub data_dir: PathBuf,
    /// Corpus location inside `data_dir`.
    pub corpus_file: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        Self::rooted_at(
            &app_dir(dirs::config_dir()),
            &app_dir(dirs::data_local_dir()),
        )
    }

    /// Paths under explicit directories instead of the platform ones.
    pub fn rooted_at(config_dir: &Path, data_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            settings_file: config_dir.join(SETTINGS_FILE_NAME),
            data_dir: data_dir.to_path_buf(),
            corpus_file: data_dir.join(CORPUS_FILE_NAME),
        }
    }

    /// Corpus to use when none is configured: the data-dir copy if present,
    /// otherwise `./quran.json` if present, otherwise the data-dir path
    /// (so the load error names the expected location).
    pub fn default_corpus(&self) -> PathBuf {
        if self.corpus_file.is_file() {
            return self.corpus_file.clone();
        }
        let local = PathBuf::from(CORPUS_FILE_NAME);
        if local.is_file() {
            log::debug!("using corpus from working directory");
            return local;
        }
        self.corpus_file.clone()
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_NAME)
}
