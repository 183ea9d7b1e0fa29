//! External collaborator seams: dice and the narration sink.
//!
//! The core never talks to a global RNG or to stdout. Both concerns enter
//! through trait objects bundled in [`EncounterEnv`], which is what makes a
//! whole encounter reproducible from a single seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform-random source for damage rolls, probabilistic effect application,
/// and action selection.
///
/// Implementations must be deterministic under a fixed seed; the test suite
/// relies on this to replay whole encounters.
pub trait Dice {
    /// Roll a uniform integer in `[min, max]` inclusive.
    fn roll(&mut self, min: i32, max: i32) -> i32;

    /// Return true with the given probability (clamped to `[0, 1]`).
    fn chance(&mut self, probability: f64) -> bool;

    /// Pick a uniform index into a collection of `len` elements.
    ///
    /// Callers guarantee `len > 0`; a zero length yields index 0.
    fn pick(&mut self, len: usize) -> usize;
}

/// Production dice backed by a seedable PRNG.
#[derive(Debug)]
pub struct SeededDice {
    rng: StdRng,
}

impl SeededDice {
    /// Create dice reproducible from the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create dice seeded from OS entropy (non-reproducible runs).
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Dice for SeededDice {
    fn roll(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// Ordered narration sink: the sole observable output channel of a battle
/// besides final actor state.
pub trait EventSink {
    fn log_event(&mut self, text: &str);
}

impl<F: FnMut(&str)> EventSink for F {
    fn log_event(&mut self, text: &str) {
        self(text)
    }
}

/// Bundle of external collaborators threaded through every turn.
pub struct EncounterEnv<'a> {
    pub dice: &'a mut dyn Dice,
    pub sink: &'a mut dyn EventSink,
}

impl<'a> EncounterEnv<'a> {
    pub fn new(dice: &'a mut dyn Dice, sink: &'a mut dyn EventSink) -> Self {
        Self { dice, sink }
    }
}
