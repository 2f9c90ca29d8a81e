//! Deterministic random number generation for scenario scripting.
//!
//! The only randomness the trigger engine needs is the jittered threshold
//! of the randomized-delay condition, but that randomness must be
//! reproducible: the same scenario seed produces the same delays, and a
//! saved game restores the generator mid-stream.
//!
//! Uses ChaCha8 for speed with an O(1) serializable word position.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG with O(1) state capture.
#[derive(Clone, Debug)]
pub struct ScenarioRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl ScenarioRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Generate a random value in the given range.
    pub fn gen_range(&mut self, range: std::ops::Range<u32>) -> u32 {
        self.inner.gen_range(range)
    }

    /// Jitter a base tick count within `±band_percent` percent.
    ///
    /// A zero base stays zero. The band is clamped so the lower bound
    /// never goes negative; the upper bound saturates at `u32::MAX`
    /// without wrapping.
    pub fn jitter(&mut self, base: u32, band_percent: u32) -> u32 {
        if base == 0 {
            return 0;
        }
        let spread = base.saturating_mul(band_percent.min(100)) / 100;
        let low = base - spread;
        let high = base.saturating_add(spread);
        self.inner.gen_range(low..=high)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> ScenarioRngState {
        ScenarioRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &ScenarioRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for savegame snapshots.
///
/// The ChaCha8 word position makes capture O(1) regardless of how many
/// values have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRngState {
    /// Original seed.
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter).
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = ScenarioRng::new(42);
        let mut rng2 = ScenarioRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range(0..1000), rng2.gen_range(0..1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = ScenarioRng::new(1);
        let mut rng2 = ScenarioRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_range(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_range(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_jitter_band() {
        let mut rng = ScenarioRng::new(42);
        for _ in 0..200 {
            let value = rng.jitter(300, 50);
            assert!((150..=450).contains(&value), "jittered value {} out of band", value);
        }
    }

    #[test]
    fn test_jitter_zero_base() {
        let mut rng = ScenarioRng::new(42);
        assert_eq!(rng.jitter(0, 50), 0);
    }

    #[test]
    fn test_jitter_zero_band() {
        let mut rng = ScenarioRng::new(42);
        assert_eq!(rng.jitter(300, 0), 300);
    }

    #[test]
    fn test_jitter_saturated_base() {
        let mut rng = ScenarioRng::new(42);
        for _ in 0..100 {
            let value = rng.jitter(u32::MAX, 50);
            assert!(value >= u32::MAX - u32::MAX / 2);
        }
        assert_eq!(rng.jitter(u32::MAX, 0), u32::MAX);
    }

    #[test]
    fn test_state_restore() {
        let mut rng = ScenarioRng::new(42);

        for _ in 0..100 {
            rng.gen_range(0..1000);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_range(0..1000)).collect();

        let mut restored = ScenarioRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_range(0..1000)).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_state_serde() {
        let state = ScenarioRngState {
            seed: 42,
            word_pos: 12345,
        };

        let json = serde_json::to_string(&state).unwrap();
        let deserialized: ScenarioRngState = serde_json::from_str(&json).unwrap();

        assert_eq!(state, deserialized);
    }
}
