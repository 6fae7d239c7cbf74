//! Deterministic random number generation.
//!
//! Every stochastic rule in the simulation draws from a named stream derived
//! from the scenario's master seed, so a run is fully reproducible and each
//! rule can be unit-tested against a fixed stream.

use std::collections::HashMap;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct RngManager {
    master: ChaCha8Rng,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
        }
    }

    /// Get or create the stream for a named consumer. Streams are seeded
    /// from the master generator on first use, in request order.
    pub fn stream(&mut self, name: &str) -> SystemRng<'_> {
        let entry = self.streams.entry(name.to_string()).or_insert_with(|| {
            let mut seed_bytes = [0u8; 32];
            self.master.fill_bytes(&mut seed_bytes);
            ChaCha8Rng::from_seed(seed_bytes)
        });
        SystemRng { inner: entry }
    }
}

pub struct SystemRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> RngCore for SystemRng<'a> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Helpers for the probability checks the simulation rules are written in
pub trait RngExt {
    /// One Bernoulli draw with the given success probability
    fn chance(&mut self, probability: f64) -> bool;
    /// Uniform multiplier in `[lo, hi]`
    fn factor_in(&mut self, lo: f64, hi: f64) -> f64;
}

impl<R: Rng> RngExt for R {
    fn chance(&mut self, probability: f64) -> bool {
        self.gen::<f64>() < probability
    }

    fn factor_in(&mut self, lo: f64, hi: f64) -> f64 {
        self.gen_range(lo..=hi)
    }
}
