//! Cartesian-product sweep of LGV and shot noise
//!
//! Loop order is ansatz → qubits → encoding → layers → sampler. One seeded
//! `StdRng` is threaded through every draw, so a config reproduces its
//! report exactly under sequential dispatch.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use lgv_circuits::{Encoding, NodeConfig, Observable, MAX_WIRES};
use lgv_core::{
    Dataset, LgvEstimator, ParameterSampler, Sampler, SamplerConfig, ShotNoiseEstimator,
    VarianceSummary,
};

use crate::error::{BenchError, Result};
use crate::{SkippedCombination, SweepConfig, SweepRecord, SweepReport};

/// Why `encoding` cannot run on `n_wires` with `dataset`, if it cannot
fn skip_reason(encoding: &Encoding, n_wires: usize, dataset: Option<&Dataset>) -> Option<String> {
    let required = encoding.required_input_len(n_wires)?;
    let actual = dataset.and_then(Dataset::feature_len)?;
    (actual != required).then(|| {
        format!(
            "{} encoding on {} qubits requires input size {}, dataset has {}",
            encoding.name(),
            n_wires,
            required,
            actual
        )
    })
}

/// Run every combination in `config`
///
/// Combinations whose encoding cannot accept the dataset rows are
/// recorded in `skipped` and never evaluated. Any other failure aborts
/// the sweep.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepReport> {
    if let Some(&n) = config.qubits.iter().find(|&&n| n == 0 || n > MAX_WIRES) {
        return Err(BenchError::InvalidConfig(format!(
            "qubit count {} outside 1..={}",
            n, MAX_WIRES
        )));
    }

    let dataset = config.dataset.map(|d| d.generate()).transpose()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut report = SweepReport::new(config.clone());

    let lgv = LgvEstimator::new()
        .with_n_samples(config.n_samples)
        .with_dispatch(config.dispatch);
    let shot_noise = ShotNoiseEstimator::new()
        .with_repeats(config.repeats)
        .with_dispatch(config.dispatch);

    info!(
        combinations = config.combinations(),
        seed = config.seed,
        "starting sweep"
    );

    for ansatz in &config.ansatzes {
        for &n_wires in &config.qubits {
            for encoding in &config.encodings {
                for &layers in &config.layers {
                    if let Some(reason) = skip_reason(encoding, n_wires, dataset.as_ref()) {
                        info!(
                            ansatz = ansatz.name(),
                            qubits = n_wires,
                            layers,
                            "skip: {}",
                            reason
                        );
                        report.skipped.push(SkippedCombination {
                            ansatz: ansatz.name().to_string(),
                            qubits: n_wires,
                            encoding: encoding.name().to_string(),
                            layers,
                            reason,
                        });
                        continue;
                    }

                    let mut node = NodeConfig::new(n_wires, *ansatz)
                        .with_encoding(*encoding)
                        .with_observable(Observable::z(n_wires, 0)?)
                        .with_shots(config.shots);
                    if config.shots.is_some() {
                        node = node.with_seed(rng.gen());
                    }
                    let evaluator = node.build()?;

                    for distribution in &config.samplers {
                        let sampler = ParameterSampler::new(
                            SamplerConfig::new(layers, n_wires)
                                .with_groups(config.groups)
                                .with_distribution(*distribution),
                        )?;

                        let params = sampler.sample(&mut rng);
                        let lgv_tensor =
                            lgv.estimate(&evaluator, &sampler, dataset.as_ref(), &mut rng)?;
                        let noise_tensor =
                            shot_noise.estimate(&evaluator, &params, dataset.as_ref(), &mut rng)?;

                        let lgv_summary = VarianceSummary::of(&lgv_tensor);
                        let noise_summary = VarianceSummary::of(&noise_tensor);

                        info!(
                            ansatz = ansatz.name(),
                            qubits = n_wires,
                            encoding = encoding.name(),
                            layers,
                            sampler = sampler.name(),
                            lgv_mean = lgv_summary.mean,
                            noise_mean = noise_summary.mean,
                            "combination done"
                        );

                        report.records.push(SweepRecord {
                            ansatz: ansatz.name().to_string(),
                            qubits: n_wires,
                            layers,
                            sampler: sampler.name().to_string(),
                            encoding: encoding.name().to_string(),
                            groups: config.groups,
                            shots: config.shots,
                            lgv_mean: lgv_summary.mean,
                            lgv_max: lgv_summary.max,
                            noise_mean: noise_summary.mean,
                            noise_max: noise_summary.max,
                        });
                    }
                }
            }
        }
    }

    info!(
        records = report.records.len(),
        skipped = report.skipped.len(),
        "sweep finished"
    );
    Ok(report)
}
