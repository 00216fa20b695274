use std::time::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::config::LightConfig;
use crate::core::error::{LightError, Result};

/// Draws how long each phase is held.
///
/// Durations are uniform over the closed millisecond window
/// `[min_ms, max_ms]`.
#[derive(Debug)]
pub struct DwellSampler {
    min_ms: f64,
    max_ms: f64,
    rng: StdRng,
}

impl DwellSampler {
    /// Sampler seeded from the operating system
    pub fn new(min_ms: u64, max_ms: u64) -> Result<Self> {
        Self::with_rng(min_ms, max_ms, StdRng::from_os_rng())
    }

    /// Deterministic sampler, same seed gives the same dwell sequence
    pub fn seeded(min_ms: u64, max_ms: u64, seed: u64) -> Result<Self> {
        Self::with_rng(min_ms, max_ms, StdRng::seed_from_u64(seed))
    }

    /// Sampler for the config's dwell window and seed
    pub fn from_config(config: &LightConfig) -> Result<Self> {
        match config.seed {
            Some(seed) => Self::seeded(config.min_dwell_ms, config.max_dwell_ms, seed),
            None => Self::new(config.min_dwell_ms, config.max_dwell_ms),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn with_rng(min_ms: u64, max_ms: u64, rng: StdRng) -> Result<Self> {
        if min_ms > max_ms {
            return Err(LightError::InvalidConfig {
                field: "max_dwell_ms",
                reason: format!("{max_ms} is below min_dwell_ms {min_ms}"),
            });
        }
        Ok(Self {
            min_ms: min_ms as f64,
            max_ms: max_ms as f64,
            rng,
        })
    }

    /// Next dwell duration
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn next_dwell(&mut self) -> Duration {
        let millis = self.rng.random_range(self.min_ms..=self.max_ms);
        // whole nanoseconds keep the integer bounds exact
        Duration::from_nanos((millis * 1_000_000.0).round() as u64)
    }
}

impl Iterator for DwellSampler {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_dwell())
    }
}
