//! Input encodings
//!
//! An encoding turns a feature vector into the register's starting
//! state, before the ansatz runs.

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ops;
use crate::state::StateVector;
use lgv_core::{LgvError, Result};

/// Norm below which amplitude inputs cannot be normalized
pub const MIN_AMPLITUDE_NORM: f64 = 1e-12;

/// Handling of near-zero-norm amplitude inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroNormPolicy {
    /// Substitute |0…0⟩ and log a warning
    #[default]
    BasisFallback,
    /// Fail with `DegenerateNorm`
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Encoding {
    /// RX(x_i · scale) on wire i; features are cycled when fewer than the
    /// wire count and truncated when more
    AngleProduct {
        #[serde(default = "default_angle_scale")]
        scale: f64,
    },
    /// Normalized features as the 2^n amplitudes
    Amplitude {
        #[serde(default)]
        policy: ZeroNormPolicy,
    },
}

fn default_angle_scale() -> f64 {
    1.0
}

impl Encoding {
    pub fn angle_product() -> Self {
        Encoding::AngleProduct {
            scale: default_angle_scale(),
        }
    }

    pub fn amplitude() -> Self {
        Encoding::Amplitude {
            policy: ZeroNormPolicy::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Encoding::AngleProduct { .. } => "angle_product",
            Encoding::Amplitude { .. } => "amplitude",
        }
    }

    /// Exact input length the encoding needs on `n_wires`, if any
    ///
    /// Registers wider than [`crate::state::MAX_WIRES`] cannot be encoded at all and
    /// report `usize::MAX`, which no input matches.
    pub fn required_input_len(&self, n_wires: usize) -> Option<usize> {
        match self {
            Encoding::AngleProduct { .. } => None,
            Encoding::Amplitude { .. } => {
                Some(StateVector::dimension_for(n_wires).unwrap_or(usize::MAX))
            }
        }
    }

    /// Starting state for `input` on an `n_wires` register
    pub fn prepare(&self, n_wires: usize, input: &[f64]) -> Result<StateVector> {
        match *self {
            Encoding::AngleProduct { scale } => {
                let mut state = StateVector::new(n_wires)?;
                if input.is_empty() {
                    return Ok(state);
                }
                for wire in 0..n_wires {
                    let feature = input[wire % input.len()];
                    ops::apply_rx(&mut state, wire, feature * scale)?;
                }
                Ok(state)
            }
            Encoding::Amplitude { policy } => amplitude_state(n_wires, input, policy),
        }
    }
}

fn amplitude_state(n_wires: usize, input: &[f64], policy: ZeroNormPolicy) -> Result<StateVector> {
    let expected = StateVector::dimension_for(n_wires)?;
    if input.len() != expected {
        return Err(LgvError::EncodingLength {
            expected,
            actual: input.len(),
        });
    }

    let norm = input.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm < MIN_AMPLITUDE_NORM {
        return match policy {
            ZeroNormPolicy::BasisFallback => {
                warn!(norm, n_wires, "amplitude input has near-zero norm; using |0…0⟩");
                StateVector::new(n_wires)
            }
            ZeroNormPolicy::Reject => Err(LgvError::DegenerateNorm { norm }),
        };
    }

    let amplitudes: Array1<Complex64> = input
        .iter()
        .map(|&v| Complex64::new(v / norm, 0.0))
        .collect();
    StateVector::from_amplitudes(n_wires, amplitudes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_angle_product_cycles_features() {
        // [π] on 3 wires → RX(π) everywhere → |111⟩
        let state = Encoding::angle_product().prepare(3, &[PI]).unwrap();
        assert!((state.probability(0b111) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_product_truncates() {
        let state = Encoding::angle_product()
            .prepare(2, &[PI, 0.0, PI, PI])
            .unwrap();
        assert!((state.probability(0b10) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_product_scale() {
        let enc = Encoding::AngleProduct { scale: 2.0 };
        let state = enc.prepare(1, &[PI / 2.0]).unwrap();
        assert!((state.probability(1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_amplitude_normalizes() {
        let state = Encoding::amplitude().prepare(2, &[3.0, 0.0, 0.0, 4.0]).unwrap();
        assert!((state.probability(0) - 0.36).abs() < 1e-12);
        assert!((state.probability(3) - 0.64).abs() < 1e-12);
    }

    #[test]
    fn test_amplitude_length_checked() {
        let err = Encoding::amplitude().prepare(2, &[1.0, 0.0]).unwrap_err();
        assert_eq!(
            err,
            LgvError::EncodingLength {
                expected: 4,
                actual: 2
            }
        );
        assert_eq!(Encoding::amplitude().required_input_len(3), Some(8));
        assert_eq!(Encoding::angle_product().required_input_len(3), None);
    }

    #[test]
    fn test_oversized_register() {
        assert_eq!(Encoding::amplitude().required_input_len(64), Some(usize::MAX));
        for enc in [Encoding::amplitude(), Encoding::angle_product()] {
            assert!(matches!(
                enc.prepare(64, &[1.0]),
                Err(LgvError::RegisterTooWide { n_wires: 64, .. })
            ));
        }
    }

    #[test]
    fn test_zero_norm_policies() {
        let zeros = [0.0; 4];
        let state = Encoding::amplitude().prepare(2, &zeros).unwrap();
        assert_eq!(state.probability(0), 1.0);

        let reject = Encoding::Amplitude {
            policy: ZeroNormPolicy::Reject,
        };
        assert!(matches!(
            reject.prepare(2, &zeros),
            Err(LgvError::DegenerateNorm { .. })
        ));
    }

    #[test]
    fn test_serde_defaults() {
        let enc: Encoding = serde_json::from_str(r#"{"kind":"amplitude"}"#).unwrap();
        assert_eq!(enc, Encoding::amplitude());
        let enc: Encoding = serde_json::from_str(r#"{"kind":"angle_product"}"#).unwrap();
        assert_eq!(enc, Encoding::angle_product());
    }
}
