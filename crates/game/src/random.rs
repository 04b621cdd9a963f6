//! Deterministic seeded random numbers for path turns.
//!
//! Uses the xorshift32 algorithm so a run can be replayed from its seed.

use serde::{Deserialize, Serialize};

/// Source of uniform draws in `[0, 1)` used for path turn decisions.
pub trait TurnSource: std::fmt::Debug {
    fn next_unit(&mut self) -> f32;
}

/// Deterministic seeded random number generator using xorshift32.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Creates a new RNG with the given seed.
    /// Seed of 0 is treated as 1 to avoid a degenerate sequence.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Seed from the thread-local entropy source.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u32>())
    }

    /// Returns the raw u32 value from the RNG.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a random float in `[0, 1)`.
    pub fn next(&mut self) -> f32 {
        // 24 bits fit exactly in an f32 mantissa, so this never rounds up to 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns the current internal state.
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TurnSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.next()
    }
}

/// Always returns the same draw.
#[derive(Debug, Clone, Copy)]
pub struct FixedTurns(pub f32);

impl TurnSource for FixedTurns {
    fn next_unit(&mut self) -> f32 {
        self.0
    }
}
