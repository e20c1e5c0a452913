//! Report output
//!
//! Sweep reports as CSV (one row per record) and Markdown tables. JSON
//! output lives on [`SweepReport::save_json`].

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::SweepReport;

/// Records as CSV with a header row
pub fn generate_csv(report: &SweepReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in &report.records {
        writer.serialize(record)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn save_csv(report: &SweepReport, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in &report.records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn fmt_variance(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.3e}", value)
    }
}

/// Markdown report: configuration, results table, skipped combinations
pub fn generate_markdown_report(report: &SweepReport) -> String {
    let mut out = String::new();
    let config = &report.config;

    out.push_str("# LGV Sweep Results\n\n");
    out.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));

    out.push_str("## Configuration\n\n");
    out.push_str("| Parameter | Value |\n");
    out.push_str("|-----------|-------|\n");
    out.push_str(&format!("| Qubits | {:?} |\n", config.qubits));
    out.push_str(&format!("| Layers | {:?} |\n", config.layers));
    out.push_str(&format!("| Generator Groups | {} |\n", config.groups));
    out.push_str(&format!(
        "| Shots | {} |\n",
        config
            .shots
            .map(|s| s.to_string())
            .unwrap_or_else(|| "exact".to_string())
    ));
    out.push_str(&format!("| LGV Samples | {} |\n", config.n_samples));
    out.push_str(&format!("| Shot-Noise Repeats | {} |\n", config.repeats));
    out.push_str(&format!("| Seed | {} |\n\n", config.seed));

    out.push_str("## Results\n\n");
    if report.records.is_empty() {
        out.push_str("*No combinations were evaluated.*\n\n");
    } else {
        out.push_str(
            "| Ansatz | Qubits | Layers | Encoding | Sampler | LGV Mean | LGV Max | Noise Mean | Noise Max |\n",
        );
        out.push_str(
            "|--------|--------|--------|----------|---------|----------|---------|------------|-----------|\n",
        );
        for r in &report.records {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
                r.ansatz,
                r.qubits,
                r.layers,
                r.encoding,
                r.sampler,
                fmt_variance(r.lgv_mean),
                fmt_variance(r.lgv_max),
                fmt_variance(r.noise_mean),
                fmt_variance(r.noise_max)
            ));
        }
        out.push('\n');
    }

    if !report.skipped.is_empty() {
        out.push_str("## Skipped\n\n");
        for s in &report.skipped {
            out.push_str(&format!(
                "- {} / {} qubits / {} layers: {}\n",
                s.ansatz, s.qubits, s.layers, s.reason
            ));
        }
        out.push('\n');
    }

    out
}

pub fn save_markdown_report(report: &SweepReport, path: impl AsRef<Path>) -> Result<()> {
    let text = generate_markdown_report(report);
    let mut file = std::fs::File::create(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}
