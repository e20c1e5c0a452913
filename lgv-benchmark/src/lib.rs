//! # LGV Sweep Suite
//!
//! Systematic LGV and shot-noise measurements over a Cartesian product of
//! ansatz × qubit count × encoding × depth × parameter distribution.
//!
//! ## Modules
//!
//! - `sweep`: runs the product and collects one record per combination
//! - `report`: JSON / CSV / Markdown output
//! - `plateau`: exponential-decay fits of LGV against qubit count
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lgv_benchmark::{run_sweep, SweepConfig};
//!
//! let config = SweepConfig::default();
//! let report = run_sweep(&config)?;
//! report.save_json("lgv_results.json")?;
//! ```

pub mod error;
pub mod plateau;
pub mod report;
pub mod sweep;

use std::path::Path;

use serde::{Deserialize, Serialize};

use lgv_circuits::{Ansatz, Encoding};
use lgv_core::{Dataset, Dispatch, Distribution, DEFAULT_N_SAMPLES, DEFAULT_REPEATS};

pub use error::{BenchError, Result};
pub use plateau::{collapsing_series, fit_variance_scaling, ScalingFit, SeriesKey};
pub use sweep::run_sweep;

/// Synthetic dataset settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub samples: usize,
    pub features: usize,
    pub seed: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            samples: 20,
            features: 4,
            seed: lgv_core::DEFAULT_SYNTHETIC_SEED,
        }
    }
}

impl DatasetConfig {
    pub fn generate(&self) -> lgv_core::Result<Dataset> {
        Dataset::synthetic(self.samples, self.features, self.seed)
    }
}

/// Sweep configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub ansatzes: Vec<Ansatz>,
    pub qubits: Vec<usize>,
    pub layers: Vec<usize>,
    /// Parameter distributions
    pub samplers: Vec<Distribution>,
    pub encodings: Vec<Encoding>,
    /// Generator-group width of every sampled tensor
    pub groups: usize,
    /// Shots per evaluation; `None` for exact expectation values
    pub shots: Option<usize>,
    /// Parameter draws per LGV estimate
    pub n_samples: usize,
    /// Repeats per shot-noise estimate
    pub repeats: usize,
    pub seed: u64,
    /// Input rows; `None` runs every circuit without encoding input
    pub dataset: Option<DatasetConfig>,
    pub dispatch: Dispatch,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            ansatzes: vec![Ansatz::Hea, Ansatz::BasicRyCnot],
            qubits: vec![2, 3, 4],
            layers: vec![1, 2, 4],
            samplers: vec![
                Distribution::uniform(),
                Distribution::normal(),
                Distribution::tiny_noise(),
            ],
            encodings: vec![Encoding::angle_product(), Encoding::amplitude()],
            groups: 1,
            shots: None,
            n_samples: DEFAULT_N_SAMPLES,
            repeats: DEFAULT_REPEATS,
            seed: 42,
            dataset: Some(DatasetConfig::default()),
            dispatch: Dispatch::Sequential,
        }
    }
}

impl SweepConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Number of (ansatz, qubits, encoding, layers, sampler) combinations
    pub fn combinations(&self) -> usize {
        self.ansatzes.len()
            * self.qubits.len()
            * self.encodings.len()
            * self.layers.len()
            * self.samplers.len()
    }
}

/// One row of sweep output
///
/// Variance summaries are NaN when `n_samples` or `repeats` is below two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    pub ansatz: String,
    pub qubits: usize,
    pub layers: usize,
    pub sampler: String,
    pub encoding: String,
    pub groups: usize,
    pub shots: Option<usize>,
    pub lgv_mean: f64,
    pub lgv_max: f64,
    pub noise_mean: f64,
    pub noise_max: f64,
}

/// Combination left out because the dataset cannot feed its encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCombination {
    pub ansatz: String,
    pub qubits: usize,
    pub encoding: String,
    pub layers: usize,
    pub reason: String,
}

/// Full sweep output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// Timestamp (RFC 3339)
    pub timestamp: String,
    pub config: SweepConfig,
    pub records: Vec<SweepRecord>,
    pub skipped: Vec<SkippedCombination>,
}

impl SweepReport {
    pub fn new(config: SweepConfig) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            config,
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SweepConfig::default();
        assert_eq!(config.n_samples, 5);
        assert_eq!(config.repeats, 2);
        assert_eq!(config.groups, 1);
        assert_eq!(config.combinations(), 2 * 3 * 2 * 3 * 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SweepConfig =
            serde_json::from_str(r#"{"qubits": [2], "shots": 100, "dataset": null}"#).unwrap();
        assert_eq!(config.qubits, vec![2]);
        assert_eq!(config.shots, Some(100));
        assert_eq!(config.dataset, None);
        assert_eq!(config.layers, SweepConfig::default().layers);
    }

    #[test]
    fn test_distribution_json() {
        let config: SweepConfig = serde_json::from_str(
            r#"{"samplers": [{"kind": "normal", "std": 0.2}], "encodings": [{"kind": "angle_product", "scale": 0.5}]}"#,
        )
        .unwrap();
        assert_eq!(config.samplers, vec![Distribution::Normal { std: 0.2 }]);
        assert_eq!(config.encodings, vec![Encoding::AngleProduct { scale: 0.5 }]);
    }

    #[test]
    fn test_report_timestamp() {
        let report = SweepReport::new(SweepConfig::default());
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
        assert!(report.records.is_empty());
    }
}
