//! Evaluator capability: the circuit-execution collaborator
//!
//! An evaluator is configured for exactly one output mode when it is
//! built. Scalar-mode evaluators return an expectation value and feed the
//! gradient estimators; state-mode evaluators return a state vector and
//! feed the entropy module. Asking an evaluator for the other mode fails
//! with [`LgvError::InvalidOutputShape`] without running anything.

use std::fmt;
use std::sync::Arc;

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{LgvError, Result};
use crate::tensor::ParamTensor;

/// Output mode selected at evaluator construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Scalar,
    State,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Scalar => write!(f, "scalar"),
            OutputMode::State => write!(f, "state"),
        }
    }
}

/// Scalar-mode evaluation: parameters (and optional input) to ⟨O⟩
///
/// May be stochastic (finite shots). Must be callable from several
/// threads at once when shift pairs are dispatched in parallel.
pub trait ExpectationFn: Send + Sync {
    fn expectation(&self, params: &ParamTensor, input: Option<&[f64]>) -> Result<f64>;
}

/// State-mode evaluation: parameters (and optional input) to |ψ⟩
pub trait StateFn: Send + Sync {
    fn state(&self, params: &ParamTensor, input: Option<&[f64]>) -> Result<Array1<Complex64>>;
}

impl<F> ExpectationFn for F
where
    F: Fn(&ParamTensor, Option<&[f64]>) -> Result<f64> + Send + Sync,
{
    fn expectation(&self, params: &ParamTensor, input: Option<&[f64]>) -> Result<f64> {
        self(params, input)
    }
}

impl<F> StateFn for F
where
    F: Fn(&ParamTensor, Option<&[f64]>) -> Result<Array1<Complex64>> + Send + Sync,
{
    fn state(&self, params: &ParamTensor, input: Option<&[f64]>) -> Result<Array1<Complex64>> {
        self(params, input)
    }
}

/// Result of a mode-agnostic evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Scalar(f64),
    State(Array1<Complex64>),
}

impl Output {
    pub fn mode(&self) -> OutputMode {
        match self {
            Output::Scalar(_) => OutputMode::Scalar,
            Output::State(_) => OutputMode::State,
        }
    }
}

/// Evaluator with its output mode fixed at construction
#[derive(Clone)]
pub enum Evaluator {
    Scalar(Arc<dyn ExpectationFn>),
    State(Arc<dyn StateFn>),
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Evaluator").field(&self.mode()).finish()
    }
}

impl Evaluator {
    /// Scalar-mode evaluator from any [`ExpectationFn`]
    pub fn scalar(f: impl ExpectationFn + 'static) -> Self {
        Evaluator::Scalar(Arc::new(f))
    }

    /// State-mode evaluator
    pub fn state(f: impl StateFn + 'static) -> Self {
        Evaluator::State(Arc::new(f))
    }

    /// Scalar-mode evaluator from a closure
    pub fn scalar_fn<F>(f: F) -> Self
    where
        F: Fn(&ParamTensor, Option<&[f64]>) -> Result<f64> + Send + Sync + 'static,
    {
        Evaluator::Scalar(Arc::new(f))
    }

    /// State-mode evaluator from a closure
    pub fn state_fn<F>(f: F) -> Self
    where
        F: Fn(&ParamTensor, Option<&[f64]>) -> Result<Array1<Complex64>> + Send + Sync + 'static,
    {
        Evaluator::State(Arc::new(f))
    }

    pub fn mode(&self) -> OutputMode {
        match self {
            Evaluator::Scalar(_) => OutputMode::Scalar,
            Evaluator::State(_) => OutputMode::State,
        }
    }

    /// Scalar capability, or `InvalidOutputShape` for a state-mode evaluator
    pub fn as_scalar(&self) -> Result<&dyn ExpectationFn> {
        match self {
            Evaluator::Scalar(f) => Ok(f.as_ref()),
            Evaluator::State(_) => Err(LgvError::InvalidOutputShape {
                expected: OutputMode::Scalar,
                actual: OutputMode::State,
            }),
        }
    }

    /// State capability, or `InvalidOutputShape` for a scalar-mode evaluator
    pub fn as_state(&self) -> Result<&dyn StateFn> {
        match self {
            Evaluator::State(f) => Ok(f.as_ref()),
            Evaluator::Scalar(_) => Err(LgvError::InvalidOutputShape {
                expected: OutputMode::State,
                actual: OutputMode::Scalar,
            }),
        }
    }

    /// Evaluate in whichever mode the evaluator was built for
    pub fn evaluate(&self, params: &ParamTensor, input: Option<&[f64]>) -> Result<Output> {
        match self {
            Evaluator::Scalar(f) => f.expectation(params, input).map(Output::Scalar),
            Evaluator::State(f) => f.state(params, input).map(Output::State),
        }
    }
}
