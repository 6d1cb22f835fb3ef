//! Random variables and the simulation RNG handle.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp1, StandardNormal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parameterised distribution that can be sampled.
///
/// Parameters are trusted: callers supply `mean > 0` for exponentials and
/// non-negative `sigma`/`variance`. Nothing here fails at sample time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RandomVariable {
    /// Uniform over `[min, max)`.
    Uniform { min: f64, max: f64 },

    /// Exponential with the given mean (`1 / rate`).
    Exponential { mean: f64 },

    /// Log-normal: `exp(mu + sigma * z)` for standard normal `z`.
    LogNormal { mu: f64, sigma: f64 },

    /// Normal parameterised by variance, not standard deviation.
    Normal { mean: f64, variance: f64 },
}

impl RandomVariable {
    /// Draw one independent sample.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            RandomVariable::Uniform { min, max } => min + (max - min) * rng.gen::<f64>(),
            RandomVariable::Exponential { mean } => {
                let unit: f64 = Exp1.sample(rng);
                mean * unit
            }
            RandomVariable::LogNormal { mu, sigma } => {
                let z: f64 = StandardNormal.sample(rng);
                (mu + sigma * z).exp()
            }
            RandomVariable::Normal { mean, variance } => {
                let z: f64 = StandardNormal.sample(rng);
                mean + variance.sqrt() * z
            }
        }
    }

    /// Expected value of the distribution.
    pub fn mean(&self) -> f64 {
        match *self {
            RandomVariable::Uniform { min, max } => (min + max) / 2.0,
            RandomVariable::Exponential { mean } => mean,
            RandomVariable::LogNormal { mu, sigma } => (mu + sigma * sigma / 2.0).exp(),
            RandomVariable::Normal { mean, .. } => mean,
        }
    }
}

/// Deterministic RNG handle for one simulation run.
///
/// Seeded from a `(seed, run)` pair: the seed keys the ChaCha8 generator and
/// the run number selects its stream, so runs sharing a seed are independent
/// replications. The handle is passed by `&mut` into every component that
/// draws randomness; there is no global RNG.
#[derive(Clone)]
pub struct SimRng {
    inner: ChaCha8Rng,
    seed: u64,
    run: u64,
}

impl SimRng {
    /// Create a handle for the given seed and run number.
    pub fn new(seed: u64, run: u64) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(seed);
        inner.set_stream(run);
        Self { inner, seed, run }
    }

    /// Draw one sample from `variable`.
    pub fn sample(&mut self, variable: RandomVariable) -> f64 {
        variable.sample(&mut self.inner)
    }

    /// Seed this handle was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run number this handle was created from.
    pub fn run(&self) -> u64 {
        self.run
    }
}

impl fmt::Debug for SimRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimRng")
            .field("seed", &self.seed)
            .field("run", &self.run)
            .finish_non_exhaustive()
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empirical_mean(variable: RandomVariable, rng: &mut SimRng, n: usize) -> f64 {
        (0..n).map(|_| rng.sample(variable)).sum::<f64>() / n as f64
    }

    #[test]
    fn test_same_seed_and_run_is_deterministic() {
        let mut a = SimRng::new(7, 1);
        let mut b = SimRng::new(7, 1);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_handle_remembers_seed_and_run() {
        let rng = SimRng::new(12345, 3);
        assert_eq!(rng.seed(), 12345);
        assert_eq!(rng.run(), 3);
        assert_eq!(format!("{rng:?}"), "SimRng { seed: 12345, run: 3, .. }");
    }

    #[test]
    fn test_runs_are_independent_streams() {
        let mut a = SimRng::new(7, 1);
        let mut b = SimRng::new(7, 2);
        let xs: Vec<u64> = (0..4).map(|_| a.next_u64()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.next_u64()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_uniform_stays_in_range() {
        let mut rng = SimRng::new(42, 1);
        let variable = RandomVariable::Uniform { min: 2.0, max: 5.01 };
        for _ in 0..1000 {
            let x = rng.sample(variable);
            assert!((2.0..5.01).contains(&x), "sample {x} out of range");
        }
    }

    #[test]
    fn test_exponential_is_non_negative_with_expected_mean() {
        let mut rng = SimRng::new(42, 1);
        let variable = RandomVariable::Exponential { mean: 5.0 };
        for _ in 0..1000 {
            assert!(rng.sample(variable) >= 0.0);
        }
        let mean = empirical_mean(variable, &mut rng, 20_000);
        assert!((mean - 5.0).abs() < 0.25, "mean was {mean}");
    }

    #[test]
    fn test_normal_uses_variance() {
        let mut rng = SimRng::new(42, 1);
        let variable = RandomVariable::Normal {
            mean: 0.6,
            variance: 0.01,
        };
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.sample(variable)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 0.6).abs() < 0.01, "mean was {mean}");
        assert!((var - 0.01).abs() < 0.002, "variance was {var}");
    }

    #[test]
    fn test_log_normal_is_positive_with_expected_mean() {
        let mut rng = SimRng::new(42, 1);
        let variable = RandomVariable::LogNormal {
            mu: 1.0,
            sigma: 0.35,
        };
        for _ in 0..1000 {
            assert!(rng.sample(variable) > 0.0);
        }
        let mean = empirical_mean(variable, &mut rng, 20_000);
        let expected = variable.mean();
        assert!(
            (mean - expected).abs() / expected < 0.02,
            "mean was {mean}, expected {expected}"
        );
    }

    #[test]
    fn test_zero_sigma_log_normal_is_constant() {
        let mut rng = SimRng::new(3, 1);
        let variable = RandomVariable::LogNormal { mu: 2.0, sigma: 0.0 };
        assert!((rng.sample(variable) - 2.0f64.exp()).abs() < 1e-12);
    }
}
