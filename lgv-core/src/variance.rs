//! Local Gradient Variance and Shot-Noise Estimation
//!
//! Two variance tensors built on the parameter-shift gradient:
//!
//! - **LGV**: variance of each gradient component across random
//!   parameter draws. Var(∂E/∂θ) collapsing as qubit count or depth grows
//!   signals a barren plateau.
//! - **Shot noise**: variance of each gradient component across repeated
//!   estimates at one fixed parameter point. Isolates the evaluator's
//!   measurement randomness (plus input-row resampling when a dataset is
//!   given); zero for a deterministic evaluator without a dataset.
//!
//! Both use the unbiased estimator (divisor n−1). With fewer than two
//! samples the result is NaN in every component rather than an error,
//! so a sweep can record "insufficient samples" and keep going.
//!
//! # References
//!
//! - McClean et al., "Barren plateaus in quantum neural network training landscapes"
//! - Cerezo et al., "Cost function dependent barren plateaus"

use ndarray::Array1;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::gradient::{Dispatch, ParameterShift};
use crate::sampler::Sampler;
use crate::tensor::{ParamShape, ParamTensor, Rank, VarianceTensor};

// =============================================================================
// Constants
// =============================================================================

/// Default number of parameter draws for LGV
pub const DEFAULT_N_SAMPLES: usize = 5;

/// Default number of repeats for shot noise
pub const DEFAULT_REPEATS: usize = 2;

// =============================================================================
// Variance Statistics
// =============================================================================

/// Per-component unbiased variance of equally long rows
///
/// Every component is NaN when fewer than two rows are given.
pub fn unbiased_variance(rows: &[Array1<f64>], width: usize) -> Array1<f64> {
    let n = rows.len();
    if n == 0 {
        return Array1::from_elem(width, f64::NAN);
    }

    // Deviations from the first row: identical rows give exact zeros
    let pivot = &rows[0];
    let mut sum = Array1::<f64>::zeros(width);
    let mut sum_sq = Array1::<f64>::zeros(width);
    for row in rows {
        let d = row - pivot;
        sum_sq += &(&d * &d);
        sum += &d;
    }

    // n == 1 gives 0/0 = NaN, the degenerate value
    let centered = sum_sq - &(&sum * &sum / n as f64);
    centered.mapv(|v| if v < 0.0 { 0.0 } else { v }) / (n as f64 - 1.0)
}

/// Scalar summary of a variance tensor for reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceSummary {
    pub mean: f64,
    pub max: f64,
}

impl VarianceSummary {
    pub fn of(variance: &VarianceTensor) -> Self {
        Self {
            mean: variance.mean(),
            max: variance.max(),
        }
    }

    /// Check if the summary came from fewer than two samples
    pub fn is_degenerate(&self) -> bool {
        self.mean.is_nan()
    }
}

fn variance_tensor(
    gradients: &[ParamTensor],
    shape: ParamShape,
    rank: Rank,
) -> Result<VarianceTensor> {
    let rows: Vec<Array1<f64>> = gradients.iter().map(ParamTensor::flatten).collect();
    let variance = unbiased_variance(&rows, shape.len());
    ParamTensor::from_flat(shape, rank, variance.to_vec())
}

// =============================================================================
// LGV Estimator
// =============================================================================

/// Local Gradient Variance over sampled parameter points
#[derive(Debug, Clone, Copy)]
pub struct LgvEstimator {
    n_samples: usize,
    shift: ParameterShift,
}

impl Default for LgvEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl LgvEstimator {
    pub fn new() -> Self {
        Self {
            n_samples: DEFAULT_N_SAMPLES,
            shift: ParameterShift::new(),
        }
    }

    /// Set number of parameter draws
    pub fn with_n_samples(mut self, n: usize) -> Self {
        self.n_samples = n;
        self
    }

    /// Set how shift pairs inside each gradient are dispatched
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.shift = self.shift.with_dispatch(dispatch);
        self
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Variance of each gradient component across `n_samples` draws
    ///
    /// All RNG draws (parameters, then the input row, per sample) happen
    /// up front in a fixed order; only evaluator calls may run in parallel.
    pub fn estimate(
        &self,
        evaluator: &Evaluator,
        sampler: &dyn Sampler,
        dataset: Option<&Dataset>,
        rng: &mut dyn RngCore,
    ) -> Result<VarianceTensor> {
        evaluator.as_scalar()?;

        if self.n_samples < 2 {
            warn!(
                n_samples = self.n_samples,
                "fewer than two samples; LGV is undefined"
            );
        }

        let mut draws = Vec::with_capacity(self.n_samples);
        for _ in 0..self.n_samples {
            let params = sampler.sample(rng);
            let input = dataset.and_then(|d| d.sample(&mut *rng));
            draws.push((params, input));
        }

        let gradients = draws
            .iter()
            .map(|(params, input)| self.shift.gradient(params, evaluator, *input))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            sampler = sampler.name(),
            n_samples = self.n_samples,
            dims = ?sampler.shape().dims(sampler.rank()),
            "computed LGV"
        );

        variance_tensor(&gradients, sampler.shape(), sampler.rank())
    }
}

/// LGV with sequential dispatch
pub fn compute_lgv(
    evaluator: &Evaluator,
    sampler: &dyn Sampler,
    n_samples: usize,
    dataset: Option<&Dataset>,
    rng: &mut dyn RngCore,
) -> Result<VarianceTensor> {
    LgvEstimator::new()
        .with_n_samples(n_samples)
        .estimate(evaluator, sampler, dataset, rng)
}

// =============================================================================
// Shot-Noise Estimator
// =============================================================================

/// Gradient variance across repeated estimates at fixed parameters
#[derive(Debug, Clone, Copy)]
pub struct ShotNoiseEstimator {
    repeats: usize,
    shift: ParameterShift,
}

impl Default for ShotNoiseEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShotNoiseEstimator {
    pub fn new() -> Self {
        Self {
            repeats: DEFAULT_REPEATS,
            shift: ParameterShift::new(),
        }
    }

    /// Set number of repeated gradient estimates
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.shift = self.shift.with_dispatch(dispatch);
        self
    }

    pub fn repeats(&self) -> usize {
        self.repeats
    }

    /// Variance of each gradient component across `repeats` estimates
    pub fn estimate(
        &self,
        evaluator: &Evaluator,
        params: &ParamTensor,
        dataset: Option<&Dataset>,
        rng: &mut dyn RngCore,
    ) -> Result<VarianceTensor> {
        evaluator.as_scalar()?;

        if self.repeats < 2 {
            warn!(
                repeats = self.repeats,
                "fewer than two repeats; shot-noise variance is undefined"
            );
        }

        let inputs: Vec<Option<&[f64]>> = (0..self.repeats)
            .map(|_| dataset.and_then(|d| d.sample(&mut *rng)))
            .collect();

        let gradients = inputs
            .iter()
            .map(|input| self.shift.gradient(params, evaluator, *input))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            repeats = self.repeats,
            dims = ?params.dims(),
            "computed shot-noise variance"
        );

        variance_tensor(&gradients, params.shape(), params.rank())
    }
}

/// Shot-noise variance with sequential dispatch
pub fn compute_shot_noise(
    evaluator: &Evaluator,
    params: &ParamTensor,
    repeats: usize,
    dataset: Option<&Dataset>,
    rng: &mut dyn RngCore,
) -> Result<VarianceTensor> {
    ShotNoiseEstimator::new()
        .with_repeats(repeats)
        .estimate(evaluator, params, dataset, rng)
}

// =============================================================================
// Tests
// =============================================================================
