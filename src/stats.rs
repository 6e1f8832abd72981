//! Per-temperature summary statistics.

use crate::driver::RawRun;
use crate::engine::SpinSnapshot;
use crate::error::SimulationError;

/// Welford online mean / variance.
///
/// Population variance (divide by n): the analyze samples are the whole
/// measured population of a run, not a subsample.
#[derive(Debug, Default, Clone)]
pub struct OnlineStats {
    n: u64,
    mean: f64,
    m2: f64,
}

impl OnlineStats {
    pub fn push(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn var(&self) -> f64 {
        if self.n > 0 {
            self.m2 / self.n as f64
        } else {
            0.0
        }
    }

    pub fn std(&self) -> f64 {
        self.var().sqrt()
    }
}

/// Summary of one temperature's analyze phase.
#[derive(Debug, Clone)]
pub struct TemperatureResult {
    pub temperature: f64,
    pub e_mean: f64,
    pub e_std: f64,
    pub m_mean: f64,
    pub m_std: f64,
    pub m_abs_mean: f64,
    pub m_abs_std: f64,
    /// Mean autocorrelation per lag, lag d = index + 1.
    pub autocorr_mean: Vec<f64>,
    /// Standard deviation of the autocorrelation per lag.
    pub autocorr_std: Vec<f64>,
    pub last_spins: Option<SpinSnapshot>,
}

/// Reduce one run's samples to scalar and per-lag summaries.
///
/// The lag count is taken from the first sample; a sample with a different
/// count is a validation failure, never truncated or padded to fit.
pub fn aggregate(temperature: f64, run: RawRun) -> Result<TemperatureResult, SimulationError> {
    let first = run
        .samples
        .first()
        .ok_or(SimulationError::NoSamples { temperature })?;
    let n_lags = first.autocorr.len();

    let mut energy = OnlineStats::default();
    let mut magnetization = OnlineStats::default();
    let mut magnetization_abs = OnlineStats::default();
    let mut per_lag = vec![OnlineStats::default(); n_lags];

    for (index, sample) in run.samples.iter().enumerate() {
        if sample.autocorr.len() != n_lags {
            return Err(SimulationError::LagMismatch {
                temperature,
                index,
                expected: n_lags,
                got: sample.autocorr.len(),
            });
        }
        energy.push(sample.energy);
        magnetization.push(sample.magnetization);
        magnetization_abs.push(sample.magnetization.abs());
        for (stats, &value) in per_lag.iter_mut().zip(&sample.autocorr) {
            stats.push(value);
        }
    }

    Ok(TemperatureResult {
        temperature,
        e_mean: energy.mean(),
        e_std: energy.std(),
        m_mean: magnetization.mean(),
        m_std: magnetization.std(),
        m_abs_mean: magnetization_abs.mean(),
        m_abs_std: magnetization_abs.std(),
        autocorr_mean: per_lag.iter().map(OnlineStats::mean).collect(),
        autocorr_std: per_lag.iter().map(OnlineStats::std).collect(),
        last_spins: run.last_spins,
    })
}
