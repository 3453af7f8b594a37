//! Session-scoped random source.
//!
//! Regression sessions need exact reproducibility from a seed, random
//! sessions want broad coverage from system entropy. Both are exposed as one
//! `RngCore` so every sampler in the crate is agnostic to the mode.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The random number source of a test session.
#[derive(Debug, Clone)]
pub enum SessionRng {
    /// Deterministic stream; identical seeds yield identical sessions.
    Seeded(ChaCha8Rng),
    /// Seeded from operating system entropy.
    Entropy(StdRng),
}

impl SessionRng {
    pub fn seeded(seed: u64) -> Self {
        SessionRng::Seeded(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Stream `stream` of the generator seeded with `seed`. Stream 0 is the
    /// same sequence as [`SessionRng::seeded`].
    pub fn seeded_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        SessionRng::Seeded(rng)
    }

    pub fn from_entropy() -> Self {
        SessionRng::Entropy(StdRng::from_os_rng())
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self, SessionRng::Seeded(_))
    }
}

impl RngCore for SessionRng {
    fn next_u32(&mut self) -> u32 {
        match self {
            SessionRng::Seeded(rng) => rng.next_u32(),
            SessionRng::Entropy(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            SessionRng::Seeded(rng) => rng.next_u64(),
            SessionRng::Entropy(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        match self {
            SessionRng::Seeded(rng) => rng.fill_bytes(dst),
            SessionRng::Entropy(rng) => rng.fill_bytes(dst),
        }
    }
}
