/// Source of randomness consumed by effects and palette selection.
///
/// Kept behind a trait so drivers can plug in hardware entropy while tests
/// run against a seeded generator.
pub trait Entropy {
    /// Uniform value in `0..n`; `n == 0` yields 0.
    fn below(&mut self, n: u8) -> u8;

    /// Uniform value in `lo..hi`; an empty range yields `lo`.
    fn between(&mut self, lo: u8, hi: u8) -> u8 {
        if hi <= lo {
            return lo;
        }
        lo + self.below(hi - lo)
    }

    /// Uniform value in `0..n`; `n == 0` yields 0.
    fn below16(&mut self, n: u16) -> u16;
}

/// [`Entropy`] backed by a `fastrand` generator.
#[derive(Debug, Clone)]
pub struct SeededEntropy {
    rng: fastrand::Rng,
}

impl SeededEntropy {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for SeededEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl Entropy for SeededEntropy {
    fn below(&mut self, n: u8) -> u8 {
        if n == 0 {
            0
        } else {
            self.rng.u8(..n)
        }
    }

    fn below16(&mut self, n: u16) -> u16 {
        if n == 0 {
            0
        } else {
            self.rng.u16(..n)
        }
    }
}
