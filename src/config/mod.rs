//! Settings for the recitation tracker.
//!
//! [`AppConfig`] is read from `settings.toml` (missing file ⇒ defaults) and
//! split into one section per subsystem: corpus, search, session and log.
//! [`AppPaths`] resolves the platform directories.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, CorpusConfig, LogConfig, SearchConfig, SessionConfig};
