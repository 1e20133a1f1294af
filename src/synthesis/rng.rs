//! Seedable randomness for synthesis
//!
//! Every planner draws through this wrapper so a fixed seed reproduces a
//! plan exactly. ChaCha8 keeps the stream identical across platforms,
//! which `StdRng` does not guarantee across releases.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma, LogNormal, Normal};

use crate::profile::IkiDistribution;

/// Deterministic RNG handle threaded through the planners
pub struct SynthRng {
    inner: ChaCha8Rng,
}

impl SynthRng {
    /// Fixed-seed stream; identical seeds yield identical draws
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// OS-entropy stream for normal operation
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Normal draw; collapses to the mean when std is not positive
    pub fn gaussian(&mut self, mean: f64, std: f64) -> f64 {
        match Normal::new(mean, std.max(0.0)) {
            Ok(dist) => dist.sample(&mut self.inner),
            Err(_) => mean,
        }
    }

    /// Uniform draw in [lo, hi)
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..hi)
    }

    /// Bernoulli draw; p is clamped into [0, 1]
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen::<f64>() < p.clamp(0.0, 1.0)
    }

    /// Random sign, +1.0 or -1.0
    pub fn sign(&mut self) -> f64 {
        if self.inner.gen::<bool>() {
            1.0
        } else {
            -1.0
        }
    }

    /// Uniformly chosen element; None for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.inner.gen_range(0..items.len());
        Some(&items[idx])
    }

    /// Draw an inter-key interval from the fitted distribution family.
    ///
    /// The family's parameters are recovered from the profile's mean and
    /// std by moment matching. Degenerate parameters collapse to the mean.
    pub fn interval(&mut self, dist: IkiDistribution, mean: f64, std: f64) -> f64 {
        if mean <= 0.0 {
            return 0.0;
        }
        if std <= 0.0 {
            return mean;
        }
        let var = std * std;
        let drawn = match dist {
            IkiDistribution::Normal => self.gaussian(mean, std),
            IkiDistribution::Lognormal => {
                let sigma2 = (1.0 + var / (mean * mean)).ln();
                let mu = mean.ln() - sigma2 / 2.0;
                match LogNormal::new(mu, sigma2.sqrt()) {
                    Ok(d) => d.sample(&mut self.inner),
                    Err(_) => mean,
                }
            }
            IkiDistribution::Gamma => {
                let shape = mean * mean / var;
                let scale = var / mean;
                match Gamma::new(shape, scale) {
                    Ok(d) => d.sample(&mut self.inner),
                    Err(_) => mean,
                }
            }
        };
        drawn.max(0.0)
    }
}
