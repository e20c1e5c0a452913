//! Circuit inputs sampled uniformly with replacement

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{LgvError, Result};

/// Standard deviation of synthetic features
pub const SYNTHETIC_FEATURE_STD: f64 = 0.6;

/// Default seed for synthetic data
pub const DEFAULT_SYNTHETIC_SEED: u64 = 123;

/// Ordered sequence of feature vectors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<Vec<f64>>,
}

impl Dataset {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Gaussian features, N(0, 0.6²), reproducible from `seed`
    pub fn synthetic(n_samples: usize, n_features: usize, seed: u64) -> Result<Self> {
        let normal = Normal::new(0.0, SYNTHETIC_FEATURE_STD)
            .map_err(|e| LgvError::InvalidDistribution(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(seed);

        let rows = (0..n_samples)
            .map(|_| (0..n_features).map(|_| normal.sample(&mut rng)).collect())
            .collect();
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Length of the first feature vector
    pub fn feature_len(&self) -> Option<usize> {
        self.rows.first().map(Vec::len)
    }

    pub fn get(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// One row drawn uniformly; `None` (and no RNG draw) when empty
    pub fn sample(&self, rng: &mut dyn RngCore) -> Option<&[f64]> {
        if self.rows.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.rows.len());
        self.get(index)
    }
}

impl From<Vec<Vec<f64>>> for Dataset {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Self::new(rows)
    }
}
