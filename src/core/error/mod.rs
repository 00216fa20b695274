//! Error types for the traffic light core.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::core::phase::Phase;

/// Errors surfaced by configuration, engine startup and timed waits.
#[derive(Debug, Error)]
pub enum LightError {
    /// The cycle thread could not be created
    #[error("failed to spawn phase cycle thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// A configuration value is out of range
    #[error("invalid value for '{field}': {reason}")]
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Configuration file could not be read
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON for `LightConfig`
    #[error("cannot parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The light was stopped and cannot be restarted
    #[error("traffic light has been stopped")]
    Stopped,

    /// No matching phase was announced before the deadline
    #[error("timed out after {waited:?} waiting for {phase}")]
    WaitTimedOut { phase: Phase, waited: Duration },
}

pub type Result<T, E = LightError> = std::result::Result<T, E>;
