//! Barren-plateau scaling analysis
//!
//! Under a barren plateau the gradient variance decays exponentially in
//! the qubit count, Var ∝ 2^{-βn}. A least-squares line through
//! (n, log2 Var) recovers the decay rate β = −slope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::SweepRecord;

/// Variance below which gradients are considered vanished
pub const VARIANCE_THRESHOLD: f64 = 1e-6;

/// Least-squares fit of log2(variance) against qubit count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Points that entered the fit
    pub n_points: usize,
}

impl ScalingFit {
    /// β in Var ∝ 2^{-βn}
    pub fn decay_rate(&self) -> f64 {
        -self.slope
    }

    /// Check if the variance shrinks as qubits are added
    pub fn is_collapsing(&self) -> bool {
        self.slope < 0.0
    }

    /// Extrapolated variance at `qubits`
    pub fn predict(&self, qubits: usize) -> f64 {
        2f64.powf(self.intercept + self.slope * qubits as f64)
    }

    /// Smallest qubit count whose predicted variance is below [`VARIANCE_THRESHOLD`]
    pub fn vanishing_at(&self) -> Option<usize> {
        if !self.is_collapsing() {
            return None;
        }
        let n = (VARIANCE_THRESHOLD.log2() - self.intercept) / self.slope;
        Some(n.ceil().max(0.0) as usize)
    }
}

/// Fit `(qubits, variance)` points
///
/// Points with a non-finite or non-positive variance are dropped. Returns
/// `None` unless at least two distinct qubit counts remain.
pub fn fit_variance_scaling(points: &[(usize, f64)]) -> Option<ScalingFit> {
    let valid: Vec<(f64, f64)> = points
        .iter()
        .filter(|(_, v)| v.is_finite() && *v > 0.0)
        .map(|&(n, v)| (n as f64, v.log2()))
        .collect();
    if valid.len() < 2 {
        return None;
    }

    let m = valid.len() as f64;
    let mean_x = valid.iter().map(|(x, _)| x).sum::<f64>() / m;
    let mean_y = valid.iter().map(|(_, y)| y).sum::<f64>() / m;

    let sxx: f64 = valid.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = valid
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let syy: f64 = valid.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };

    Some(ScalingFit {
        slope,
        intercept,
        r_squared,
        n_points: valid.len(),
    })
}

/// Series identity: everything except the qubit count
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub ansatz: String,
    pub encoding: String,
    pub sampler: String,
    pub layers: usize,
}

/// Group LGV means into per-series `(qubits, lgv_mean)` points, sorted by qubits
pub fn collapsing_series(records: &[SweepRecord]) -> BTreeMap<SeriesKey, Vec<(usize, f64)>> {
    let mut series: BTreeMap<SeriesKey, Vec<(usize, f64)>> = BTreeMap::new();
    for r in records {
        let key = SeriesKey {
            ansatz: r.ansatz.clone(),
            encoding: r.encoding.clone(),
            sampler: r.sampler.clone(),
            layers: r.layers,
        };
        series.entry(key).or_default().push((r.qubits, r.lgv_mean));
    }
    for points in series.values_mut() {
        points.sort_by_key(|(n, _)| *n);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_exponential_decay() {
        // Var = 2^{-n}
        let points: Vec<(usize, f64)> = (2..7).map(|n| (n, 2f64.powi(-(n as i32)))).collect();
        let fit = fit_variance_scaling(&points).unwrap();

        assert!((fit.slope + 1.0).abs() < 1e-12);
        assert!(fit.intercept.abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!(fit.is_collapsing());
        assert!((fit.decay_rate() - 1.0).abs() < 1e-12);
        assert!((fit.predict(10) - 2f64.powi(-10)).abs() < 1e-15);
        // 2^{-20} ≈ 9.5e-7 is the first value below 1e-6
        assert_eq!(fit.vanishing_at(), Some(20));
    }

    #[test]
    fn test_flat_series_is_not_collapsing() {
        let fit = fit_variance_scaling(&[(2, 0.1), (3, 0.1), (4, 0.1)]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert!(!fit.is_collapsing());
        assert_eq!(fit.vanishing_at(), None);
    }

    #[test]
    fn test_degenerate_points_dropped() {
        let points = [(2, f64::NAN), (3, 0.0), (4, 0.25)];
        assert!(fit_variance_scaling(&points).is_none());

        let points = [(2, 0.5), (2, 0.4)];
        assert!(fit_variance_scaling(&points).is_none());

        let fit = fit_variance_scaling(&[(2, 0.5), (3, f64::NAN), (4, 0.125)]).unwrap();
        assert_eq!(fit.n_points, 2);
        assert!((fit.slope + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_collapsing_series_grouping() {
        let record = |qubits: usize, sampler: &str, lgv_mean: f64| SweepRecord {
            ansatz: "hea".to_string(),
            qubits,
            layers: 2,
            sampler: sampler.to_string(),
            encoding: "angle_product".to_string(),
            groups: 1,
            shots: None,
            lgv_mean,
            lgv_max: lgv_mean,
            noise_mean: 0.0,
            noise_max: 0.0,
        };
        let records = vec![
            record(4, "uniform", 0.05),
            record(2, "uniform", 0.2),
            record(2, "normal", 0.01),
            record(3, "uniform", 0.1),
        ];

        let series = collapsing_series(&records);
        assert_eq!(series.len(), 2);

        let uniform = SeriesKey {
            ansatz: "hea".to_string(),
            encoding: "angle_product".to_string(),
            sampler: "uniform".to_string(),
            layers: 2,
        };
        assert_eq!(series[&uniform], vec![(2, 0.2), (3, 0.1), (4, 0.05)]);
        assert!(fit_variance_scaling(&series[&uniform]).unwrap().is_collapsing());
    }
}
