//! LGV sweep runner
//!
//! ```text
//! lgv-sweep --config sweep.json --shots 1000 --json out.json --markdown out.md
//! RUST_LOG=debug lgv-sweep --samples 20
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use tracing_subscriber::EnvFilter;

use lgv_benchmark::{
    collapsing_series, fit_variance_scaling, report, run_sweep, BenchError, Result, SweepConfig,
};
use lgv_core::{configure_thread_pool, Dispatch};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Local Gradient Variance and shot-noise sweeps over ansatz, encoding and sampler"
)]
struct Cli {
    /// JSON sweep configuration; missing fields take their defaults
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// RNG seed for parameter and input draws
    #[arg(long)]
    seed: Option<u64>,

    /// Shots per evaluation (exact expectation values when omitted)
    #[arg(long)]
    shots: Option<usize>,

    /// Parameter draws per LGV estimate
    #[arg(long)]
    samples: Option<usize>,

    /// Repeats per shot-noise estimate
    #[arg(long)]
    repeats: Option<usize>,

    /// Size of the rayon pool used with --parallel
    #[arg(long)]
    threads: Option<usize>,

    /// Dispatch shift pairs on the rayon pool
    #[arg(long)]
    parallel: bool,

    #[arg(long, value_hint = ValueHint::FilePath)]
    json: Option<PathBuf>,

    #[arg(long, value_hint = ValueHint::FilePath)]
    csv: Option<PathBuf>,

    #[arg(long, value_hint = ValueHint::FilePath)]
    markdown: Option<PathBuf>,
}

impl Cli {
    fn sweep_config(&self) -> Result<SweepConfig> {
        let mut config = match &self.config {
            Some(path) => SweepConfig::from_json_file(path)?,
            None => SweepConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.shots.is_some() {
            config.shots = self.shots;
        }
        if let Some(samples) = self.samples {
            config.n_samples = samples;
        }
        if let Some(repeats) = self.repeats {
            config.repeats = repeats;
        }
        if self.parallel {
            config.dispatch = Dispatch::Parallel;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.sweep_config()?;

    if let Some(threads) = cli.threads {
        configure_thread_pool(threads).map_err(|e| BenchError::InvalidConfig(e.to_string()))?;
    }

    println!("LGV sweep: {} combinations", config.combinations());
    let sweep = run_sweep(&config)?;

    println!(
        "\n{:<14} {:>6} {:>6} {:<14} {:<10} {:>11} {:>11}",
        "Ansatz", "Qubits", "Layers", "Encoding", "Sampler", "LGV Mean", "Noise Mean"
    );
    for r in &sweep.records {
        println!(
            "{:<14} {:>6} {:>6} {:<14} {:<10} {:>11.3e} {:>11.3e}",
            r.ansatz, r.qubits, r.layers, r.encoding, r.sampler, r.lgv_mean, r.noise_mean
        );
    }
    for s in &sweep.skipped {
        println!("[SKIP] {}", s.reason);
    }

    println!("\nVariance scaling (log2 LGV vs qubits):");
    for (key, points) in collapsing_series(&sweep.records) {
        if let Some(fit) = fit_variance_scaling(&points) {
            println!(
                "  {}/{}/{}/L={}: slope {:+.3}, R² {:.3}{}",
                key.ansatz,
                key.encoding,
                key.sampler,
                key.layers,
                fit.slope,
                fit.r_squared,
                if fit.is_collapsing() { "  (collapsing)" } else { "" }
            );
        }
    }

    if let Some(path) = &cli.json {
        sweep.save_json(path)?;
        println!("Saved JSON report to {}", path.display());
    }
    if let Some(path) = &cli.csv {
        report::save_csv(&sweep, path)?;
        println!("Saved CSV report to {}", path.display());
    }
    if let Some(path) = &cli.markdown {
        report::save_markdown_report(&sweep, path)?;
        println!("Saved Markdown report to {}", path.display());
    }

    Ok(())
}
