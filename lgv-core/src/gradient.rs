//! Parameter-Shift Gradient Estimation
//!
//! For a gate U(θ) = exp(-iθG/2) whose generator G has eigenvalues ±1,
//! every expectation value is sinusoidal in θ and
//!
//! ```text
//! ∂⟨O⟩/∂θ = (⟨O⟩_{θ+π/2} - ⟨O⟩_{θ-π/2}) / 2
//! ```
//!
//! holds exactly. Under a finite-shot evaluator the same formula is an
//! unbiased estimator of the derivative.
//!
//! Each component needs one independent pair of evaluations, so a
//! gradient over an `(L, W, G)` tensor costs `2·L·W·G` evaluator calls.
//! The pairs share no state and can be dispatched on the rayon pool.

use std::f64::consts::FRAC_PI_2;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::evaluator::{Evaluator, ExpectationFn};
use crate::tensor::{GradientTensor, ParamTensor};

// =============================================================================
// Constants
// =============================================================================

/// Shift amount for the parameter-shift rule (π/2)
pub const PARAMETER_SHIFT: f64 = FRAC_PI_2;

/// Default step for the central finite-difference check
pub const DEFAULT_FD_EPSILON: f64 = 1e-6;

// =============================================================================
// Dispatch
// =============================================================================

/// How independent shift pairs are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispatch {
    /// Row-major index order on the calling thread
    #[default]
    Sequential,
    /// Spread across the global rayon pool
    Parallel,
}

/// Configure the global rayon pool used by [`Dispatch::Parallel`]
pub fn configure_thread_pool(
    num_threads: usize,
) -> std::result::Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
}

// =============================================================================
// Shift Pairs
// =============================================================================

/// One independent unit of gradient work
#[derive(Debug, Clone)]
pub struct ShiftPair {
    /// Component `(l, w, g)` being differentiated
    pub index: (usize, usize, usize),
    /// Parameters with the component moved by +π/2
    pub plus: ParamTensor,
    /// Parameters with the component moved by -π/2
    pub minus: ParamTensor,
}

impl ShiftPair {
    pub fn new(params: &ParamTensor, index: (usize, usize, usize)) -> Self {
        ShiftPair {
            index,
            plus: params.shifted(index, PARAMETER_SHIFT),
            minus: params.shifted(index, -PARAMETER_SHIFT),
        }
    }

    /// 0.5 · (f(θ + π/2) - f(θ - π/2))
    pub fn derivative(&self, f: &dyn ExpectationFn, input: Option<&[f64]>) -> Result<f64> {
        let outp = f.expectation(&self.plus, input)?;
        let outm = f.expectation(&self.minus, input)?;
        Ok(0.5 * (outp - outm))
    }
}

// =============================================================================
// Parameter-Shift Estimator
// =============================================================================

/// Parameter-shift gradient estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterShift {
    dispatch: Dispatch,
}

impl ParameterShift {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    /// All shift pairs for `params`, in row-major index order
    pub fn shift_pairs(&self, params: &ParamTensor) -> Vec<ShiftPair> {
        params
            .indices()
            .map(|index| ShiftPair::new(params, index))
            .collect()
    }

    /// Gradient of a scalar-mode evaluator at `params`
    ///
    /// The output has the shape and rank of `params`. A state-mode
    /// evaluator is rejected before any shifted evaluation runs.
    pub fn gradient(
        &self,
        params: &ParamTensor,
        evaluator: &Evaluator,
        input: Option<&[f64]>,
    ) -> Result<GradientTensor> {
        let f = evaluator.as_scalar()?;
        let pairs = self.shift_pairs(params);

        debug!(
            dims = ?params.dims(),
            evaluations = 2 * pairs.len(),
            dispatch = ?self.dispatch,
            "parameter-shift gradient"
        );

        let values = match self.dispatch {
            Dispatch::Sequential => pairs
                .iter()
                .map(|pair| pair.derivative(f, input))
                .collect::<Result<Vec<f64>>>()?,
            Dispatch::Parallel => pairs
                .par_iter()
                .map(|pair| pair.derivative(f, input))
                .collect::<Result<Vec<f64>>>()?,
        };

        ParamTensor::from_flat(params.shape(), params.rank(), values)
    }
}

/// Parameter-shift gradient with sequential dispatch
pub fn gradient(
    params: &ParamTensor,
    evaluator: &Evaluator,
    input: Option<&[f64]>,
) -> Result<GradientTensor> {
    ParameterShift::new().gradient(params, evaluator, input)
}

// =============================================================================
// Gradient Verification
// =============================================================================

/// Central finite-difference gradient, for cross-checking
pub fn finite_difference(
    params: &ParamTensor,
    evaluator: &Evaluator,
    input: Option<&[f64]>,
    epsilon: f64,
) -> Result<GradientTensor> {
    let f = evaluator.as_scalar()?;
    let values = params
        .indices()
        .map(|index| {
            let exp_plus = f.expectation(&params.shifted(index, epsilon), input)?;
            let exp_minus = f.expectation(&params.shifted(index, -epsilon), input)?;
            Ok((exp_plus - exp_minus) / (2.0 * epsilon))
        })
        .collect::<Result<Vec<f64>>>()?;

    ParamTensor::from_flat(params.shape(), params.rank(), values)
}

/// Compare parameter-shift and finite-difference gradients
///
/// Returns `(analytic, numeric, max_abs_diff)`.
pub fn verify_gradient(
    params: &ParamTensor,
    evaluator: &Evaluator,
    input: Option<&[f64]>,
    epsilon: f64,
) -> Result<(GradientTensor, GradientTensor, f64)> {
    let analytic = gradient(params, evaluator, input)?;
    let numeric = finite_difference(params, evaluator, input, epsilon)?;

    let max_diff = analytic
        .flatten()
        .iter()
        .zip(numeric.flatten().iter())
        .map(|(a, n)| (a - n).abs())
        .fold(0.0_f64, f64::max);

    Ok((analytic, numeric, max_diff))
}

// =============================================================================
// Tests
// =============================================================================
