use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU8, Ordering};
use serde::{Deserialize, Serialize};

/// Display state of the light
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Phase {
    Red = 0,
    Green = 1,
}

impl Phase {
    /// The phase a transition leads to
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Red,
        }
    }

    const fn from_bits(bits: u8) -> Self {
        if bits & 1 == 0 { Self::Red } else { Self::Green }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Red => f.write_str("red"),
            Self::Green => f.write_str("green"),
        }
    }
}

/// Current phase, readable from any thread without a lock.
///
/// Loads are relaxed: the value is always a valid phase but carries no
/// ordering with respect to queued announcements.
#[derive(Debug)]
pub struct AtomicPhase(AtomicU8);

impl AtomicPhase {
    /// Cell holding `phase`
    pub const fn new(phase: Phase) -> Self {
        Self(AtomicU8::new(phase as u8))
    }

    /// Read the phase without ordering guarantees
    pub fn load(&self) -> Phase {
        Phase::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Flip the phase and return the new value
    pub fn toggle(&self) -> Phase {
        let previous = self.0.fetch_xor(1, Ordering::AcqRel);
        Phase::from_bits(previous).toggled()
    }
}

impl Default for AtomicPhase {
    fn default() -> Self {
        Self::new(Phase::Red)
    }
}
