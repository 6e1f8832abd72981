//! Metropolis temperature sweep for the 2-D Ising lattice.
//!
//! Runs every target temperature through an anneal / burn-in / analyze
//! schedule and writes per-temperature observables and spin correlations
//! to versioned CSV files.
//!
//! Compile & run:   cargo run --release --bin sweep
//! Sweep in parallel with the fast engine:  sweep --parallel --fast

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ising::cancel::CancelToken;
use ising::config::RunConfig;
use ising::error::SweepError;
use ising::report;
use ising::sweep::run_sweep;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sweep", about = "2-D Ising lattice Metropolis temperature sweep")]
struct Cli {
    /// Lowest target temperature
    #[arg(long, default_value_t = 2.15)]
    t_min: f64,

    /// Upper sweep bound (exclusive when above t_min)
    #[arg(long, default_value_t = 2.5)]
    t_max: f64,

    /// Spacing between target temperatures
    #[arg(long, default_value_t = 0.05)]
    t_step: f64,

    /// Temperature the anneal ramp starts from
    #[arg(long, default_value_t = 4.0)]
    t_top: f64,

    /// Lattice side length N (N^2 sites)
    #[arg(long, short = 'n', default_value_t = 10)]
    size: usize,

    /// External field the degaussing ramp starts from
    #[arg(long, short = 'b', default_value_t = 0.0)]
    field: f64,

    /// Ratio of sites examined per step
    #[arg(long, default_value_t = 0.1)]
    flip_perc: f64,

    /// Total steps per temperature
    #[arg(long, default_value_t = 9000)]
    n_steps: usize,

    /// Steps held at the target temperature before measuring
    #[arg(long, default_value_t = 2000)]
    n_burnin: usize,

    /// Measured steps at the end of each run
    #[arg(long, default_value_t = 5000)]
    n_analyze: usize,

    /// Use the optimized lattice engine
    #[arg(long)]
    fast: bool,

    /// Run temperatures on the worker pool
    #[arg(long)]
    parallel: bool,

    /// Suppress the per-step progress bar
    #[arg(long)]
    quiet: bool,

    /// Keep the final spin configuration of each run
    #[arg(long)]
    snapshot: bool,

    /// Master seed for reproducible sweeps
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for the CSV files
    #[arg(long, default_value = "data")]
    dir_out: PathBuf,

    /// Prefix prepended to output file names
    #[arg(long, default_value = "")]
    prefix: String,
}

impl Cli {
    fn to_config(&self) -> RunConfig {
        RunConfig {
            side: self.size,
            t_min: self.t_min,
            t_max: self.t_max,
            t_step: self.t_step,
            t_top: self.t_top,
            field: self.field,
            flip_perc: self.flip_perc,
            n_steps: self.n_steps,
            n_burnin: self.n_burnin,
            n_analyze: self.n_analyze,
            use_fast: self.fast,
            parallel: self.parallel,
            quiet_progress: self.quiet,
            snapshot_spins: self.snapshot,
            seed: self.seed,
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let cfg = cli.to_config();
    let cancel = CancelToken::new();

    let mode = if cfg.parallel { "worker pool" } else { "sequential" };
    println!("\n2D Ising model sweep; {mode}\n");

    let sweep = match run_sweep(&cfg, &cancel) {
        Ok(sweep) => sweep,
        Err(SweepError::Config(err)) => {
            eprintln!("fatal: {err}");
            return ExitCode::from(2);
        }
        Err(SweepError::Cancelled) => {
            eprintln!("\nsweep cancelled");
            return ExitCode::from(130);
        }
    };

    let paths = match report::write_results(&cli.dir_out, &cli.prefix, &cfg, &sweep) {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("fatal: {err}");
            return ExitCode::from(1);
        }
    };

    println!(
        "Sweep complete → {} / {}",
        paths.observables.display(),
        paths.correlations.display()
    );
    if let Some(ls) = &paths.spins {
        println!("Final spins    → {}", ls.display());
    }

    if sweep.is_complete() {
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "{} temperature(s) failed; partial results written",
            sweep.failures.len()
        );
        ExitCode::from(1)
    }
}
