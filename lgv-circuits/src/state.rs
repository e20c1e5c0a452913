use ndarray::Array1;
use num_complex::Complex64;

use lgv_core::{LgvError, Result};

/// Widest register a dense state vector is built for
pub const MAX_WIRES: usize = 30;

/// Dense n-wire state vector
///
/// Index Mapping: wire 0 is the most significant bit of the basis index,
/// so for 3 wires |q0 q1 q2⟩ sits at index q0·4 + q1·2 + q2.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    n_wires: usize,
    amplitudes: Array1<Complex64>,
}

impl StateVector {
    /// 2^n_wires, or `RegisterTooWide` past [`MAX_WIRES`]
    pub fn dimension_for(n_wires: usize) -> Result<usize> {
        if n_wires > MAX_WIRES {
            return Err(LgvError::RegisterTooWide {
                n_wires,
                max: MAX_WIRES,
            });
        }
        Ok(1 << n_wires)
    }

    /// Creates |0...0⟩
    pub fn new(n_wires: usize) -> Result<Self> {
        Self::basis(n_wires, 0)
    }

    /// Computational basis state |index⟩
    pub fn basis(n_wires: usize, index: usize) -> Result<Self> {
        let dim = Self::dimension_for(n_wires)?;
        if index >= dim {
            return Err(LgvError::InvalidStateShape {
                expected: dim,
                actual: index + 1,
            });
        }
        let mut amplitudes = Array1::<Complex64>::zeros(dim);
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(StateVector {
            n_wires,
            amplitudes,
        })
    }

    /// Wrap existing amplitudes; length must be 2^n
    pub fn from_amplitudes(n_wires: usize, amplitudes: Array1<Complex64>) -> Result<Self> {
        let expected = Self::dimension_for(n_wires)?;
        if amplitudes.len() != expected {
            return Err(LgvError::InvalidStateShape {
                expected,
                actual: amplitudes.len(),
            });
        }
        Ok(StateVector {
            n_wires,
            amplitudes,
        })
    }

    pub fn n_wires(&self) -> usize {
        self.n_wires
    }

    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut Array1<Complex64> {
        &mut self.amplitudes
    }

    pub fn into_amplitudes(self) -> Array1<Complex64> {
        self.amplitudes
    }

    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes
            .get(index)
            .map(|c| c.norm_sqr())
            .unwrap_or(0.0)
    }

    /// Born-rule distribution over basis indices
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm_sqr()).collect()
    }

    /// Bit mask selecting `wire` in a basis index
    #[inline]
    pub fn wire_mask(&self, wire: usize) -> usize {
        1 << (self.n_wires - 1 - wire)
    }

    /// Fail unless `wire` is inside the register
    pub fn check_wire(&self, wire: usize) -> Result<()> {
        if wire >= self.n_wires {
            return Err(LgvError::InvalidPartition {
                wire,
                n_wires: self.n_wires,
            });
        }
        Ok(())
    }

    /// Probability of measuring |1⟩ on `wire`
    pub fn marginal_one(&self, wire: usize) -> Result<f64> {
        self.check_wire(wire)?;
        let mask = self.wire_mask(wire);
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, c)| c.norm_sqr())
            .sum())
    }
}
