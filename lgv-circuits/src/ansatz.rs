//! Layered ansatz circuits
//!
//! Both ansatzes read generator group 0 of each `(layer, wire)` slot as an
//! RY angle. Wider group axes are accepted and the remaining groups are
//! ignored, so their gradient components are exactly zero.

use serde::{Deserialize, Serialize};

use crate::ops;
use crate::state::StateVector;
use lgv_core::{ParamTensor, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ansatz {
    /// Hardware-efficient: RY layer, then CZ on even pairs after even
    /// layers and odd pairs after odd layers
    Hea,
    /// RY layer, then a linear CNOT chain
    BasicRyCnot,
}

impl Ansatz {
    pub fn name(&self) -> &'static str {
        match self {
            Ansatz::Hea => "hea",
            Ansatz::BasicRyCnot => "basic_ry_cnot",
        }
    }

    /// Apply all layers to `state`
    ///
    /// Fails with `ShapeMismatch` unless the tensor's wire axis equals the
    /// register width. No entangler follows the last layer.
    pub fn apply(&self, state: &mut StateVector, params: &ParamTensor) -> Result<()> {
        let n_wires = state.n_wires();
        params.expect_wires(n_wires)?;
        let angles = params.as_array3();
        let layers = params.shape().layers;

        for l in 0..layers {
            for w in 0..n_wires {
                ops::apply_ry(state, w, angles[[l, w, 0]])?;
            }

            if l + 1 == layers {
                continue;
            }
            match self {
                Ansatz::Hea => {
                    let start = l % 2;
                    for i in (start..n_wires.saturating_sub(1)).step_by(2) {
                        ops::apply_cz(state, i, i + 1)?;
                    }
                }
                Ansatz::BasicRyCnot => {
                    for i in 0..n_wires.saturating_sub(1) {
                        ops::apply_cnot(state, i, i + 1)?;
                    }
                }
            }
        }
        Ok(())
    }
}
