//! Partial trace and von Neumann entanglement entropy
//!
//! Wire 0 is the most significant bit of a basis index, so reshaping a
//! length-2^n state into n binary axes in row-major order puts wire `i`
//! on axis `i`.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2, IxDyn};
use num_complex::Complex64;
use tracing::debug;

use crate::error::{LgvError, Result};
use crate::evaluator::Evaluator;
use crate::tensor::ParamTensor;

/// Eigenvalue floor applied before taking logarithms
pub const DEFAULT_ENTROPY_EPS: f64 = 1e-12;

/// Density matrix of the kept subsystem
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedDensityMatrix {
    rho: Array2<Complex64>,
    kept: Vec<usize>,
}

impl ReducedDensityMatrix {
    /// Matrix dimension, 2^|kept|
    pub fn dim(&self) -> usize {
        self.rho.nrows()
    }

    /// Kept wires, sorted and deduplicated
    pub fn kept(&self) -> &[usize] {
        &self.kept
    }

    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.rho
    }

    /// Tr ρ (real part)
    pub fn trace(&self) -> f64 {
        self.rho.diag().iter().map(|c| c.re).sum()
    }

    /// Tr ρ²; 1 for a pure subsystem, 1/dim when maximally mixed
    pub fn purity(&self) -> f64 {
        // ρ is Hermitian, so Tr ρ² = Σ |ρ_ij|²
        self.rho.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Eigenvalues in ascending order
    pub fn eigenvalues(&self) -> Vec<f64> {
        let n = self.dim();
        let matrix = DMatrix::from_fn(n, n, |i, j| self.rho[[i, j]]);
        let mut values: Vec<f64> = matrix.symmetric_eigenvalues().iter().copied().collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values
    }

    /// −Σ λ log2 λ with every eigenvalue floored at `eps`
    pub fn entropy(&self, eps: f64) -> f64 {
        -self
            .eigenvalues()
            .into_iter()
            .map(|v| v.max(eps))
            .map(|v| v * v.log2())
            .sum::<f64>()
    }
}

/// Reduce a pure state on `n_wires` wires to the `keep` subsystem
///
/// `keep` may be unordered or contain duplicates. An empty `keep` traces
/// out everything and yields the 1×1 matrix [⟨ψ|ψ⟩].
pub fn partial_trace(
    state: &Array1<Complex64>,
    keep: &[usize],
    n_wires: usize,
) -> Result<ReducedDensityMatrix> {
    let expected = u32::try_from(n_wires)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .ok_or(LgvError::InvalidStateShape {
            expected: usize::MAX,
            actual: state.len(),
        })?;
    if state.len() != expected {
        return Err(LgvError::InvalidStateShape {
            expected,
            actual: state.len(),
        });
    }

    let mut kept = keep.to_vec();
    kept.sort_unstable();
    kept.dedup();
    if let Some(&wire) = kept.iter().find(|&&w| w >= n_wires) {
        return Err(LgvError::InvalidPartition { wire, n_wires });
    }

    let traced: Vec<usize> = (0..n_wires).filter(|w| !kept.contains(w)).collect();
    let order: Vec<usize> = kept.iter().chain(traced.iter()).copied().collect();

    let dim_keep = 1usize << kept.len();
    let dim_trace = 1usize << traced.len();

    // Internal reshapes only fail if the length check above is wrong
    let reshape_err = |_| LgvError::InvalidStateShape {
        expected,
        actual: state.len(),
    };
    let tensor = state
        .clone()
        .into_shape(IxDyn(&vec![2; n_wires]))
        .map_err(reshape_err)?;
    let matrix = tensor
        .permuted_axes(IxDyn(&order))
        .as_standard_layout()
        .into_owned()
        .into_shape((dim_keep, dim_trace))
        .map_err(reshape_err)?;

    let adjoint = matrix.t().mapv(|c| c.conj());
    let rho = matrix.dot(&adjoint);

    debug!(n_wires, kept = ?kept, dim = dim_keep, "partial trace");

    Ok(ReducedDensityMatrix { rho, kept })
}

/// Von Neumann entropy (bits) of the `keep` subsystem
pub fn entropy(
    state: &Array1<Complex64>,
    keep: &[usize],
    n_wires: usize,
    eps: f64,
) -> Result<f64> {
    Ok(partial_trace(state, keep, n_wires)?.entropy(eps))
}

/// Entropy of the state produced by a state-mode evaluator
///
/// The register width is inferred from the state length.
pub fn state_entropy(
    evaluator: &Evaluator,
    params: &ParamTensor,
    input: Option<&[f64]>,
    keep: &[usize],
    eps: f64,
) -> Result<f64> {
    let state = evaluator.as_state()?.state(params, input)?;
    let len = state.len();
    if !len.is_power_of_two() {
        return Err(LgvError::InvalidStateShape {
            expected: len.next_power_of_two(),
            actual: len,
        });
    }
    let n_wires = len.trailing_zeros() as usize;
    entropy(&state, keep, n_wires, eps)
}
