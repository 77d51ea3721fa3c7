//! Deterministic RNG wrapper and seed-derivation helpers.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Exclusive upper bound for per-trial seeds, `2^32 - 1`.
pub const TRIAL_SEED_BOUND: u32 = u32::MAX;

/// Deterministic RNG handle used wherever the toolkit draws seeds.
///
/// A thin wrapper around `StdRng`. Callers provide a master `seed: u64`.
/// Independent substreams (one per manifold, for instance) are derived by
/// hashing `(master_seed, substream_id)` with SipHash-1-3 under fixed zero
/// keys, which is stable across platforms.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a trial seed uniformly from `[0, 2^32 - 1)`.
    pub fn next_trial_seed(&mut self) -> u32 {
        self.rng.gen_range(0..TRIAL_SEED_BOUND)
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Derives the deterministic seed for a specific substream.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
