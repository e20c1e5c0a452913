use ndarray::Array2;
use num_complex::Complex64;

use crate::gates;
use crate::state::StateVector;
use lgv_core::{LgvError, Result};

/// Applies a single-wire gate
///
/// The state is viewed as a (outer, 2, inner) tensor whose middle axis is
/// the target wire; inner = 2^(n-1-wire) under the MSB wire convention.
pub fn apply_gate(state: &mut StateVector, wire: usize, gate: &Array2<Complex64>) -> Result<()> {
    state.check_wire(wire)?;
    let dim = state.dimension();
    let inner_dim = state.wire_mask(wire);
    let outer_dim = dim / (2 * inner_dim);

    let mut tensor_view = state
        .amplitudes_mut()
        .view_mut()
        .into_shape((outer_dim, 2, inner_dim))
        .map_err(|_| LgvError::InvalidStateShape {
            expected: dim,
            actual: outer_dim * 2 * inner_dim,
        })?;

    let u00 = gate[[0, 0]];
    let u01 = gate[[0, 1]];
    let u10 = gate[[1, 0]];
    let u11 = gate[[1, 1]];

    for mut chunk in tensor_view.outer_iter_mut() {
        for i in 0..inner_dim {
            let alpha = chunk[[0, i]];
            let beta = chunk[[1, i]];

            chunk[[0, i]] = u00 * alpha + u01 * beta;
            chunk[[1, i]] = u10 * alpha + u11 * beta;
        }
    }
    Ok(())
}

/// Applies a two-wire gate; `first` is the high bit of the gate's local basis
pub fn apply_gate_2q(
    state: &mut StateVector,
    first: usize,
    second: usize,
    gate: &Array2<Complex64>,
) -> Result<()> {
    state.check_wire(first)?;
    state.check_wire(second)?;
    if first == second {
        return Err(LgvError::InvalidPartition {
            wire: second,
            n_wires: state.n_wires(),
        });
    }

    let bit_a = state.wire_mask(first);
    let bit_b = state.wire_mask(second);
    let dim = state.dimension();
    let amps = state.amplitudes_mut();

    // Visit each group of four once, from its |00⟩ member
    for base in (0..dim).filter(|i| i & (bit_a | bit_b) == 0) {
        let idx = [base, base | bit_b, base | bit_a, base | bit_a | bit_b];
        let old = idx.map(|i| amps[i]);
        for (row, &target) in idx.iter().enumerate() {
            amps[target] = (0..4).map(|col| gate[[row, col]] * old[col]).sum();
        }
    }
    Ok(())
}

pub fn apply_rx(state: &mut StateVector, wire: usize, theta: f64) -> Result<()> {
    apply_gate(state, wire, &gates::rx(theta))
}

pub fn apply_ry(state: &mut StateVector, wire: usize, theta: f64) -> Result<()> {
    apply_gate(state, wire, &gates::ry(theta))
}

pub fn apply_cnot(state: &mut StateVector, control: usize, target: usize) -> Result<()> {
    apply_gate_2q(state, control, target, &gates::cnot())
}

pub fn apply_cz(state: &mut StateVector, a: usize, b: usize) -> Result<()> {
    apply_gate_2q(state, a, b, &gates::cz())
}
