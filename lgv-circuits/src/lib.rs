//! Reference circuit collaborators for lgv-core
//!
//! A small dense simulator (RX/RY/H/CNOT/CZ), the two layered ansatzes,
//! input encodings, a Pauli-Z readout with optional finite shots, and
//! [`NodeConfig`], which binds them into an [`lgv_core::Evaluator`].

pub mod ansatz;
pub mod encoding;
pub mod gates;
pub mod node; // Evaluator construction
pub mod observable;
pub mod ops;
pub mod shots; // Finite-shot sampling
pub mod state;

pub use ansatz::Ansatz;
pub use encoding::{Encoding, ZeroNormPolicy, MIN_AMPLITUDE_NORM};
pub use node::NodeConfig;
pub use observable::Observable;
pub use ops::{apply_cnot, apply_cz, apply_gate, apply_gate_2q, apply_rx, apply_ry};
pub use shots::{expectation_from_shots, ShotResult, ShotSampler};
pub use state::{StateVector, MAX_WIRES};
