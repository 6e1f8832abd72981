//! Single-temperature simulation driver.
//!
//! Drives exactly one lattice engine through exactly one schedule: the
//! anneal and burn-in prefix is stepped without measurement, the analyze
//! suffix records one sample per step. `release()` runs on the engine on
//! every exit path, exactly once.

use crate::cancel::CancelToken;
use crate::config::RunConfig;
use crate::engine::{LatticeEngine, SpinSnapshot};
use crate::error::{DriverError, SimulationError};
use crate::schedule::Schedule;
use indicatif::{ProgressBar, ProgressStyle};

/// Builds one engine per (config, target temperature, seed).
pub type EngineFactory = dyn Sync + Fn(&RunConfig, f64, u64) -> Box<dyn LatticeEngine>;

/// One analyze-phase measurement. Lag labels are dropped: lag order is
/// fixed by the engine contract and implicit in the index.
#[derive(Debug, Clone)]
pub struct AnalyzeSample {
    pub energy: f64,
    pub magnetization: f64,
    pub autocorr: Vec<f64>,
}

/// Raw output of one run, handed to the statistics aggregator.
#[derive(Debug, Clone)]
pub struct RawRun {
    pub samples: Vec<AnalyzeSample>,
    pub last_spins: Option<SpinSnapshot>,
}

fn progress_bar(cfg: &RunConfig, t_final: f64) -> ProgressBar {
    let bar = ProgressBar::new(cfg.n_steps as u64);
    bar.set_style(
        ProgressStyle::with_template(
            " {msg} {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] eta {eta_precise}",
        )
        .unwrap(),
    );
    bar.set_message(format!("{n}x{n} T={t_final:.2}", n = cfg.side));
    bar
}

/// Run one target temperature to completion.
///
/// The schedule is generated before the engine is constructed, so an invalid
/// configuration never touches an engine. Cancellation is checked between
/// steps; the engine is released before the error is returned.
pub fn run_temperature(
    cfg: &RunConfig,
    t_final: f64,
    seed: u64,
    cancel: &CancelToken,
    show_progress: bool,
    factory: &EngineFactory,
) -> Result<RawRun, DriverError> {
    let schedule = Schedule::build(cfg, t_final)?;
    let mut engine = factory(cfg, t_final, seed);
    let bar = show_progress.then(|| progress_bar(cfg, t_final));

    let outcome = drive(engine.as_mut(), cfg, t_final, &schedule, cancel, bar.as_ref());
    engine.release();

    if let Some(bar) = bar {
        match &outcome {
            Ok(_) => bar.finish(),
            Err(_) => bar.abandon(),
        }
    }
    outcome
}

fn drive(
    engine: &mut dyn LatticeEngine,
    cfg: &RunConfig,
    t_final: f64,
    schedule: &Schedule,
    cancel: &CancelToken,
    bar: Option<&ProgressBar>,
) -> Result<RawRun, DriverError> {
    let n_prior = cfg.n_steps - cfg.n_analyze;

    let step_once =
        |engine: &mut dyn LatticeEngine, step: usize| -> Result<(), DriverError> {
            if cancel.is_cancelled() {
                return Err(DriverError::Cancelled);
            }
            let (t, b) = schedule.at(step);
            engine.step(t, b).map_err(|source| SimulationError::Step {
                temperature: t_final,
                source,
            })?;
            if let Some(bar) = bar {
                bar.inc(1);
            }
            Ok(())
        };

    for step in 0..n_prior {
        step_once(engine, step)?;
    }

    let mut samples = Vec::with_capacity(cfg.n_analyze);
    for step in n_prior..cfg.n_steps {
        step_once(engine, step)?;
        let autocorr = engine
            .autocorrelation()
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        samples.push(AnalyzeSample {
            energy: engine.energy(),
            magnetization: engine.magnetization(),
            autocorr,
        });
    }

    let last_spins = cfg.snapshot_spins.then(|| engine.snapshot_spins());
    Ok(RawRun { samples, last_spins })
}
