//! Finite-shot measurement
//!
//! Sampling draws computational-basis outcomes from the Born distribution
//! of a state; expectation values are then estimated from the counts.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::observable::Observable;
use crate::state::StateVector;

/// Outcome counts from one batch of shots
#[derive(Debug, Clone, PartialEq)]
pub struct ShotResult {
    pub n_wires: usize,
    pub n_shots: usize,
    pub counts: HashMap<usize, usize>,
}

impl ShotResult {
    /// Counts for an `n_wires` register; `n_shots` is their total
    pub fn from_counts(n_wires: usize, counts: HashMap<usize, usize>) -> Self {
        let n_shots = counts.values().sum();
        ShotResult {
            n_wires,
            n_shots,
            counts,
        }
    }

    pub fn count(&self, outcome: usize) -> usize {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Bitstring with wire 0 first
    pub fn bitstring(&self, outcome: usize) -> String {
        (0..self.n_wires)
            .rev()
            .map(|i| if (outcome >> i) & 1 == 1 { '1' } else { '0' })
            .collect()
    }
}

/// Seeded source of measurement outcomes
///
/// One sampler owns one RNG stream, so repeated calls on the same sampler
/// give fresh draws while two samplers built from the same seed agree.
#[derive(Debug)]
pub struct ShotSampler {
    rng: StdRng,
}

impl ShotSampler {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        ShotSampler { rng }
    }

    /// Measure every wire of `state` `n_shots` times
    pub fn sample_state(&mut self, state: &StateVector, n_shots: usize) -> ShotResult {
        let probs = state.probabilities();
        // Rounding can leave the last cumulative weight just under 1
        let last = probs.len().saturating_sub(1);
        let mut counts = HashMap::new();
        for _ in 0..n_shots {
            let r: f64 = self.rng.gen();
            let outcome = probs
                .iter()
                .scan(0.0, |acc, &p| {
                    *acc += p;
                    Some(*acc)
                })
                .position(|cumulative| r < cumulative)
                .unwrap_or(last);
            *counts.entry(outcome).or_insert(0) += 1;
        }
        ShotResult {
            n_wires: state.n_wires(),
            n_shots,
            counts,
        }
    }
}

/// Mean eigenvalue of `observable` over the recorded outcomes
pub fn expectation_from_shots(shots: &ShotResult, observable: &Observable) -> f64 {
    if shots.n_shots == 0 {
        return f64::NAN;
    }
    let total: f64 = shots
        .counts
        .iter()
        .map(|(&outcome, &count)| observable.eigenvalue(outcome) * count as f64)
        .sum();
    total / shots.n_shots as f64
}
