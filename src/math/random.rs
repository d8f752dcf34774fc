//! Random sources injected into the engine
//!
//! The engine only ever asks for one uniform value in `[0, 1)` at a time, and the
//! number of draws per step is fixed, so any deterministic source reproduces a run.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// A source of uniform samples in `[0, 1)`
pub trait RandomSource {
    /// Draw the next uniform sample
    fn next_f64(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Seeded random source backed by `StdRng`
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a deterministic source from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a non-deterministic source seeded by the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

const LCG_MODULUS: u64 = 2_147_483_647;
const LCG_MULTIPLIER: u64 = 48_271;
const LCG_ZERO_SEED: u64 = 311;

/// Park–Miller minimal standard generator
///
/// Small, portable and trivially reproducible across platforms; useful for fixtures
/// whose expected output must not depend on the `rand` version.
#[derive(Debug, Clone)]
pub struct LcgRandom {
    state: u64,
}

impl LcgRandom {
    /// Create a generator from a numeric seed
    pub const fn new(seed: u64) -> Self {
        let state = seed % LCG_MODULUS;
        Self {
            state: if state == 0 { LCG_ZERO_SEED } else { state },
        }
    }

    /// Create a generator from a text seed by folding its UTF-16 code units
    pub fn from_phrase(phrase: &str) -> Self {
        let seed = phrase
            .encode_utf16()
            .enumerate()
            .fold(0_u64, |acc, (i, c)| {
                (acc + (i as u64 + 1) * (u64::from(c) % 96)) % LCG_MODULUS
            });
        Self::new(seed)
    }
}

impl RandomSource for LcgRandom {
    fn next_f64(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }
}

/// Adapter turning any `FnMut() -> f64` into a random source
pub struct FnRandom<F>(pub F);

impl<F: FnMut() -> f64> RandomSource for FnRandom<F> {
    fn next_f64(&mut self) -> f64 {
        (self.0)()
    }
}
