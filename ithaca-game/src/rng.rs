//! Deterministic Lehmer generator backing every shuffle in the game.
//!
//! The generator carries an explicit [`RngOrigin`] chosen at construction:
//! a replayable generator remembers the seed it was built from and forks by
//! restarting that stream, while a stream-derived generator only knows its
//! current position and forks by consuming one value to seed a new stream.
use serde::{Deserialize, Serialize};

use crate::constants::{LEHMER_MODULUS, LEHMER_MULTIPLIER};
use crate::numbers::{ratio, unit_to_u64};

/// Where a generator's stream came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "seed", rename_all = "snake_case")]
pub enum RngOrigin {
    /// Built from a known seed; forking replays the stream from its start.
    Seeded(u64),
    /// Resumed from a bare stream position; the original seed is unknown.
    Derived,
}

/// Seeded multiplicative-congruential generator producing values in `[0, 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeterministicRng {
    origin: RngOrigin,
    state: u64,
    #[serde(default)]
    draws: u64,
}

/// Reduce an arbitrary seed into the generator's valid range `1..2^31-1`.
#[must_use]
pub const fn normalize_seed(seed: u64) -> u64 {
    let reduced = seed % LEHMER_MODULUS;
    if reduced == 0 { 1 } else { reduced }
}

impl DeterministicRng {
    /// Replayable generator for `seed`.
    #[must_use]
    pub const fn seeded(seed: u64) -> Self {
        let seed = normalize_seed(seed);
        Self {
            origin: RngOrigin::Seeded(seed),
            state: seed,
            draws: 0,
        }
    }

    /// Generator resumed from a stream position without a known origin.
    #[must_use]
    pub const fn resume(state: u64) -> Self {
        Self {
            origin: RngOrigin::Derived,
            state: normalize_seed(state),
            draws: 0,
        }
    }

    /// Rebuild a generator exactly as it was captured.
    #[must_use]
    pub const fn from_parts(origin: RngOrigin, state: u64, draws: u64) -> Self {
        Self {
            origin,
            state: normalize_seed(state),
            draws,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> RngOrigin {
        self.origin
    }

    /// Current stream position; persisting this resumes the exact sequence.
    #[must_use]
    pub const fn state(&self) -> u64 {
        self.state
    }

    /// Number of values drawn since construction.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    fn advance(&mut self) -> u64 {
        self.state = self.state * LEHMER_MULTIPLIER % LEHMER_MODULUS;
        self.draws = self.draws.saturating_add(1);
        self.state
    }

    /// Next value, uniform in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        let value = self.advance();
        ratio(value, LEHMER_MODULUS)
    }

    /// Produce an independent generator.
    ///
    /// Replayable generators restart from their origin seed. Derived
    /// generators consume one value from this stream to seed the fork, so
    /// the fork is deterministic but does not replay earlier values.
    pub fn fork(&mut self) -> Self {
        match self.origin {
            RngOrigin::Seeded(seed) => Self::seeded(seed),
            RngOrigin::Derived => {
                let sample = self.next_unit();
                Self::seeded(unit_to_u64(sample, LEHMER_MODULUS))
            }
        }
    }
}
