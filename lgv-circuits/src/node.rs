//! Circuit node: encoding, ansatz and readout bound into an `Evaluator`
//!
//! A node with an observable evaluates in scalar mode (exact or
//! finite-shot ⟨Z⟩); without one it evaluates in state mode and returns
//! the final amplitudes. The encoding only runs when an input row is
//! supplied.

use std::sync::Mutex;

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::ansatz::Ansatz;
use crate::encoding::Encoding;
use crate::observable::Observable;
use crate::shots::{expectation_from_shots, ShotSampler};
use crate::state::StateVector;
use lgv_core::{Evaluator, ExpectationFn, LgvError, ParamTensor, Result, StateFn};

/// Circuit node configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub n_wires: usize,
    pub ansatz: Ansatz,
    pub encoding: Option<Encoding>,
    pub observable: Option<Observable>,
    /// `None` for exact expectation values
    pub shots: Option<usize>,
    /// Seed of the shot sampler; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl NodeConfig {
    /// State-mode node with no encoding
    pub fn new(n_wires: usize, ansatz: Ansatz) -> Self {
        Self {
            n_wires,
            ansatz,
            encoding: None,
            observable: None,
            shots: None,
            seed: None,
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Switch to scalar mode, measuring `observable`
    pub fn with_observable(mut self, observable: Observable) -> Self {
        self.observable = Some(observable);
        self
    }

    pub fn with_shots(mut self, shots: Option<usize>) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate and build the evaluator
    pub fn build(self) -> Result<Evaluator> {
        if self.n_wires == 0 {
            return Err(LgvError::InvalidStateShape {
                expected: 2,
                actual: 1,
            });
        }
        StateVector::dimension_for(self.n_wires)?;
        let circuit = Circuit {
            n_wires: self.n_wires,
            ansatz: self.ansatz,
            encoding: self.encoding,
        };

        match self.observable {
            None => Ok(Evaluator::state(StateNode { circuit })),
            Some(observable) => {
                if observable.n_wires() != self.n_wires {
                    return Err(LgvError::shape_mismatch(
                        &[self.n_wires],
                        &[observable.n_wires()],
                    ));
                }
                // Deserialized observables skip the constructor check
                let observable = Observable::z(self.n_wires, observable.target())?;
                let shots = match self.shots {
                    None => None,
                    Some(0) => {
                        return Err(LgvError::InvalidDistribution(
                            "shot count must be at least 1".into(),
                        ))
                    }
                    Some(n) => Some((n, Mutex::new(ShotSampler::new(self.seed)))),
                };
                Ok(Evaluator::scalar(ExpectationNode {
                    circuit,
                    observable,
                    shots,
                }))
            }
        }
    }
}

/// Encoding followed by the ansatz
#[derive(Debug, Clone, Copy)]
struct Circuit {
    n_wires: usize,
    ansatz: Ansatz,
    encoding: Option<Encoding>,
}

impl Circuit {
    fn run(&self, params: &ParamTensor, input: Option<&[f64]>) -> Result<StateVector> {
        let mut state = match (self.encoding, input) {
            (Some(encoding), Some(x)) => encoding.prepare(self.n_wires, x)?,
            _ => StateVector::new(self.n_wires)?,
        };
        self.ansatz.apply(&mut state, params)?;
        Ok(state)
    }
}

struct StateNode {
    circuit: Circuit,
}

impl StateFn for StateNode {
    fn state(&self, params: &ParamTensor, input: Option<&[f64]>) -> Result<Array1<Complex64>> {
        Ok(self.circuit.run(params, input)?.into_amplitudes())
    }
}

struct ExpectationNode {
    circuit: Circuit,
    observable: Observable,
    shots: Option<(usize, Mutex<ShotSampler>)>,
}

impl ExpectationFn for ExpectationNode {
    fn expectation(&self, params: &ParamTensor, input: Option<&[f64]>) -> Result<f64> {
        let state = self.circuit.run(params, input)?;
        match &self.shots {
            None => self.observable.expectation(&state),
            Some((n_shots, sampler)) => {
                let counts = sampler
                    .lock()
                    .map_err(|e| LgvError::Evaluation(e.to_string()))?
                    .sample_state(&state, *n_shots);
                Ok(expectation_from_shots(&counts, &self.observable))
            }
        }
    }
}
