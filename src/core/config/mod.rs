use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::core::error::{LightError, Result};

pub const DEFAULT_MIN_DWELL_MS: u64 = 4_000;
pub const DEFAULT_MAX_DWELL_MS: u64 = 6_000;
pub const DEFAULT_THREAD_NAME: &str = "traffic-light-cycle";

/// Tunables for a single light
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightConfig {
    /// Shortest time a phase is held, inclusive
    pub min_dwell_ms: u64,
    /// Longest time a phase is held, inclusive
    pub max_dwell_ms: u64,
    /// Fixed RNG seed; `None` seeds from the operating system
    pub seed: Option<u64>,
    /// Name given to cycle threads
    pub thread_name: String,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            min_dwell_ms: DEFAULT_MIN_DWELL_MS,
            max_dwell_ms: DEFAULT_MAX_DWELL_MS,
            seed: None,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl LightConfig {
    /// Config with a custom dwell window and everything else defaulted
    pub fn with_dwell(min: Duration, max: Duration) -> Self {
        Self {
            min_dwell_ms: u64::try_from(min.as_millis()).unwrap_or(u64::MAX),
            max_dwell_ms: u64::try_from(max.as_millis()).unwrap_or(u64::MAX),
            ..Self::default()
        }
    }

    /// Same config with a fixed RNG seed
    #[must_use]
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LightError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check the dwell window and thread name
    pub fn validate(&self) -> Result<()> {
        if self.min_dwell_ms == 0 {
            return Err(LightError::InvalidConfig {
                field: "min_dwell_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.min_dwell_ms > self.max_dwell_ms {
            return Err(LightError::InvalidConfig {
                field: "max_dwell_ms",
                reason: format!(
                    "{} is below min_dwell_ms {}",
                    self.max_dwell_ms, self.min_dwell_ms
                ),
            });
        }
        if self.thread_name.contains('\0') {
            return Err(LightError::InvalidConfig {
                field: "thread_name",
                reason: "must not contain NUL bytes".into(),
            });
        }
        Ok(())
    }
}
