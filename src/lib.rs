//! Electron spectroscopy analyzer: merge a folder of `<energy> <intensity>`
//! measurement files into one spectrum, integrate between two picked points
//! and subtract a linear background.
//!
//! The [`state::Session`] is the entry point for a front end.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod state;

pub use config::AnalyzerConfig;
pub use error::AnalysisError;
pub use state::Session;
