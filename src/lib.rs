//! Recitation tracker: follows a spoken recitation through a fixed verse
//! corpus, one transcribed segment at a time.
//!
//! ```text
//! transcript ─▶ search::search ─▶ tracker::PositionTracker::advance ─▶ Option<Position>
//! ```
//!
//! * [`corpus`]: immutable verse collection and JSON loading
//! * [`matcher`]: lexical phrase scoring
//! * [`search`]: ranked candidates for a transcript
//! * [`tracker`]: stateful position decision with chapter hysteresis
//! * [`session`]: async driver with single-slot segment admission
//! * [`text`]: transcript normalisation helpers
//! * [`config`]: TOML settings

pub mod config;
pub mod corpus;
pub mod matcher;
pub mod search;
pub mod session;
pub mod text;
pub mod tracker;
