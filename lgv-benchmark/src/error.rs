//! Error types for sweeps and report output

use thiserror::Error;

use lgv_core::LgvError;

/// Result type alias for lgv-benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Error, Debug)]
pub enum BenchError {
    // ==========================================================================
    // Diagnostic Errors
    // ==========================================================================
    /// Estimator, sampler or circuit precondition failed
    #[error(transparent)]
    Core(#[from] LgvError),

    /// Sweep configuration is unusable before anything runs
    #[error("Invalid sweep configuration: {0}")]
    InvalidConfig(String),

    // ==========================================================================
    // Output Errors
    // ==========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl BenchError {
    /// Check if the error came from a shape/length precondition
    pub fn is_shape_error(&self) -> bool {
        matches!(self, BenchError::Core(e) if e.is_shape_error())
    }
}
