//! Temperature-sweep coordinator.
//!
//! Sequential mode walks the temperature array in order. Concurrent mode
//! fans one worker per temperature out onto the rayon pool; workers send
//! successful results into an mpsc channel drained by a dedicated
//! aggregator thread, which stops only on the explicit `Done` sentinel.
//! The sentinel is sent after the pool join, so it is the last message the
//! aggregator can see. Completion order is arbitrary; the aggregator's sort
//! restores ascending temperature order.

use crate::cancel::CancelToken;
use crate::config::RunConfig;
use crate::driver::{self, EngineFactory};
use crate::engine;
use crate::error::{DriverError, SweepError};
use crate::stats::{self, TemperatureResult};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use std::sync::mpsc;
use std::thread;
use tracing::error;

/// Final output of a sweep: results sorted by the mode's ordering rule plus
/// the temperatures whose simulations failed and were omitted.
#[derive(Debug)]
pub struct SweepResult {
    pub results: Vec<TemperatureResult>,
    pub failures: Vec<f64>,
}

impl SweepResult {
    /// True when every requested temperature produced a result.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Channel protocol between workers and the aggregator. `Done` is the
/// termination sentinel, out of band from any data message.
enum SweepMessage {
    Result(TemperatureResult),
    Done,
}

/// Sweep the config-derived temperature array with the built-in engines.
pub fn run_sweep(cfg: &RunConfig, cancel: &CancelToken) -> Result<SweepResult, SweepError> {
    run_sweep_with(cfg, cancel, &engine::default_factory)
}

/// Sweep the config-derived temperature array with a caller-supplied engine
/// factory.
pub fn run_sweep_with(
    cfg: &RunConfig,
    cancel: &CancelToken,
    factory: &EngineFactory,
) -> Result<SweepResult, SweepError> {
    let temps = cfg.temperatures();
    run_sweep_over(cfg, &temps, cancel, factory)
}

/// Sweep an arbitrary temperature list.
///
/// Sequential mode preserves the input order; concurrent mode publishes
/// ascending by temperature.
pub fn run_sweep_over(
    cfg: &RunConfig,
    temps: &[f64],
    cancel: &CancelToken,
    factory: &EngineFactory,
) -> Result<SweepResult, SweepError> {
    cfg.validate()?;
    let master = cfg
        .seed
        .unwrap_or_else(|| ChaCha20Rng::from_entropy().next_u64());

    if cfg.parallel {
        run_concurrent(cfg, temps, master, cancel, factory)
    } else {
        run_sequential(cfg, temps, master, cancel, factory)
    }
}

/// Drive and aggregate one temperature. Seeds depend only on the master
/// seed and the temperature index, so both modes hand identical seeds to
/// identical work.
fn run_one(
    cfg: &RunConfig,
    index: usize,
    t_final: f64,
    master: u64,
    cancel: &CancelToken,
    show_progress: bool,
    factory: &EngineFactory,
) -> Result<TemperatureResult, DriverError> {
    let seed = engine::mix_seed(master, index);
    let raw = driver::run_temperature(cfg, t_final, seed, cancel, show_progress, factory)?;
    Ok(stats::aggregate(t_final, raw)?)
}

fn run_sequential(
    cfg: &RunConfig,
    temps: &[f64],
    master: u64,
    cancel: &CancelToken,
    factory: &EngineFactory,
) -> Result<SweepResult, SweepError> {
    let mut results = Vec::with_capacity(temps.len());
    let mut failures = Vec::new();

    for (index, &t) in temps.iter().enumerate() {
        let show_progress = !cfg.quiet_progress;
        match run_one(cfg, index, t, master, cancel, show_progress, factory) {
            Ok(result) => results.push(result),
            Err(DriverError::Cancelled) => return Err(SweepError::Cancelled),
            Err(DriverError::Config(err)) => return Err(SweepError::Config(err)),
            Err(DriverError::Simulation(err)) => {
                error!("simulation failed, temperature omitted: {err}");
                failures.push(t);
            }
        }
    }

    Ok(SweepResult { results, failures })
}

fn run_concurrent(
    cfg: &RunConfig,
    temps: &[f64],
    master: u64,
    cancel: &CancelToken,
    factory: &EngineFactory,
) -> Result<SweepResult, SweepError> {
    let (tx, rx) = mpsc::channel::<SweepMessage>();

    let aggregator = thread::spawn(move || {
        let mut acc: Vec<TemperatureResult> = Vec::new();
        while let Ok(message) = rx.recv() {
            match message {
                SweepMessage::Result(result) => acc.push(result),
                SweepMessage::Done => break,
            }
        }
        acc.sort_by(|a, b| a.temperature.partial_cmp(&b.temperature).unwrap());
        acc
    });

    // One worker per temperature, bounded by the rayon pool width. A failed
    // worker logs and sends nothing; siblings keep running.
    temps
        .par_iter()
        .enumerate()
        .for_each_with(tx.clone(), |tx, (index, &t)| {
            if cancel.is_cancelled() {
                return;
            }
            match run_one(cfg, index, t, master, cancel, false, factory) {
                Ok(result) => {
                    let _ = tx.send(SweepMessage::Result(result));
                }
                Err(DriverError::Cancelled) => {}
                Err(err) => error!("simulation failed, temperature omitted: {err}"),
            }
        });

    // par_iter has joined every worker; the sentinel is delivered even when
    // the sweep was cancelled, so the aggregator never blocks.
    let _ = tx.send(SweepMessage::Done);
    let results = aggregator
        .join()
        .expect("sweep aggregator thread panicked");

    if cancel.is_cancelled() {
        return Err(SweepError::Cancelled);
    }

    // Result temperatures are exact copies of the inputs.
    let failures = temps
        .iter()
        .copied()
        .filter(|&t| !results.iter().any(|r| r.temperature == t))
        .collect();

    Ok(SweepResult { results, failures })
}
