use serde::{Deserialize, Serialize};

use crate::state::StateVector;
use lgv_core::{LgvError, Result};

/// Pauli-Z on one wire of an n-wire register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observable {
    n_wires: usize,
    target: usize,
}

impl Observable {
    /// Z on `target`; fails with `InvalidPartition` if `target >= n_wires`
    pub fn z(n_wires: usize, target: usize) -> Result<Self> {
        if target >= n_wires {
            return Err(LgvError::InvalidPartition {
                wire: target,
                n_wires,
            });
        }
        Ok(Observable { n_wires, target })
    }

    pub fn n_wires(&self) -> usize {
        self.n_wires
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// ±1 eigenvalue for a computational basis outcome
    #[inline]
    pub fn eigenvalue(&self, outcome: usize) -> f64 {
        let bit = 1 << (self.n_wires - 1 - self.target);
        if outcome & bit == 0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Exact ⟨Z_target⟩
    pub fn expectation(&self, state: &StateVector) -> Result<f64> {
        if state.n_wires() != self.n_wires {
            return Err(LgvError::InvalidStateShape {
                expected: StateVector::dimension_for(self.n_wires).unwrap_or(usize::MAX),
                actual: state.dimension(),
            });
        }
        Ok(state
            .amplitudes()
            .iter()
            .enumerate()
            .map(|(i, c)| self.eigenvalue(i) * c.norm_sqr())
            .sum())
    }
}
