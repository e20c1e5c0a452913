//! Error types for gradient-variance diagnostics
//!
//! Every precondition violation is fatal to the single call that raised
//! it. Shape errors carry both the expected and the observed shape so a
//! failing sweep entry can be diagnosed from the message alone.

use thiserror::Error;

use crate::evaluator::OutputMode;

/// Result type alias for lgv-core operations
pub type Result<T> = std::result::Result<T, LgvError>;

/// Errors raised by samplers, estimators and the entropy module
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LgvError {
    // ==========================================================================
    // Shape Errors
    // ==========================================================================
    /// Parameter tensor axes disagree with the declared layer/wire counts
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Evaluator configured for one output mode was used in the other
    #[error("Invalid evaluator output: expected {expected} output, evaluator produces {actual}")]
    InvalidOutputShape {
        expected: OutputMode,
        actual: OutputMode,
    },

    /// State vector length is not 2^n
    #[error("Invalid state vector length: expected {expected}, got {actual}")]
    InvalidStateShape { expected: usize, actual: usize },

    /// Register wider than a dense state vector can address
    #[error("Register of {n_wires} wires exceeds the {max}-wire limit")]
    RegisterTooWide { n_wires: usize, max: usize },

    /// Kept wire outside [0, n)
    #[error("Wire {wire} is outside the {n_wires}-wire register")]
    InvalidPartition { wire: usize, n_wires: usize },

    // ==========================================================================
    // Encoding Errors
    // ==========================================================================
    /// Amplitude-style encoding given an input of the wrong length
    #[error("Encoding requires input length {expected}, got {actual}")]
    EncodingLength { expected: usize, actual: usize },

    /// Near-zero-norm input under a policy that refuses the basis fallback
    #[error("Input norm {norm:.3e} is too small to normalize")]
    DegenerateNorm { norm: f64 },

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Sampler or estimator configuration cannot produce valid draws
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    // ==========================================================================
    // Collaborator Errors
    // ==========================================================================
    /// Failure reported by the evaluator collaborator
    #[error("Evaluation failed: {0}")]
    Evaluation(String),
}

impl LgvError {
    /// Build a shape mismatch from any pair of dimension slices
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        LgvError::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Check if the error reports a shape/length precondition
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            LgvError::ShapeMismatch { .. }
                | LgvError::InvalidOutputShape { .. }
                | LgvError::InvalidStateShape { .. }
                | LgvError::RegisterTooWide { .. }
                | LgvError::EncodingLength { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = LgvError::shape_mismatch(&[2, 3, 1], &[2, 4, 1]);
        assert_eq!(
            err.to_string(),
            "Shape mismatch: expected [2, 3, 1], got [2, 4, 1]"
        );
    }

    #[test]
    fn test_output_shape_display() {
        let err = LgvError::InvalidOutputShape {
            expected: OutputMode::Scalar,
            actual: OutputMode::State,
        };
        assert_eq!(
            err.to_string(),
            "Invalid evaluator output: expected scalar output, evaluator produces state"
        );
    }

    #[test]
    fn test_is_shape_error() {
        assert!(LgvError::InvalidStateShape {
            expected: 4,
            actual: 3
        }
        .is_shape_error());
        assert!(LgvError::RegisterTooWide {
            n_wires: 64,
            max: 30
        }
        .is_shape_error());
        assert!(!LgvError::DegenerateNorm { norm: 0.0 }.is_shape_error());
        assert!(!LgvError::Evaluation("backend offline".into()).is_shape_error());
    }
}
