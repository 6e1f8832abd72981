//! Per-step temperature and field schedules.
//!
//! A run cools from `t_top` down to its target temperature while the external
//! field is ramped to zero, then holds both through the burn-in and analyze
//! phases. Both sequences are built eagerly: rebuilding with the same
//! arguments yields the identical schedule.

use crate::config::RunConfig;
use crate::error::ConfigError;

/// Step-aligned (temperature, field) pairs for one run.
///
/// Length is exactly `n_steps`, partitioned into `n_anneal` ramp points
/// followed by `n_burnin + n_analyze` points held at (`t_final`, 0).
#[derive(Debug, Clone)]
pub struct Schedule {
    temperatures: Vec<f64>,
    fields: Vec<f64>,
}

/// `num` evenly spaced values from `start` to `stop`, both endpoints
/// included when `num >= 2`.
fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num).map(|i| start + i as f64 * step).collect()
        }
    }
}

impl Schedule {
    /// Build the schedule for one target temperature.
    ///
    /// Fails with [`ConfigError::NegativeAnneal`] when
    /// `n_burnin + n_analyze > n_steps`; callers treat that as fatal and must
    /// not construct any engine.
    pub fn build(cfg: &RunConfig, t_final: f64) -> Result<Self, ConfigError> {
        let n_anneal = cfg.n_anneal()?;
        let n_hold = cfg.n_burnin + cfg.n_analyze;

        let mut temperatures = linspace(cfg.t_top, t_final, n_anneal);
        temperatures.extend(std::iter::repeat(t_final).take(n_hold));

        let mut fields = linspace(cfg.field, 0.0, n_anneal);
        fields.extend(std::iter::repeat(0.0).take(n_hold));

        Ok(Self {
            temperatures,
            fields,
        })
    }

    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }

    /// (temperature, field) for one step index.
    pub fn at(&self, step: usize) -> (f64, f64) {
        (self.temperatures[step], self.fields[step])
    }

    /// Step-aligned pairs, consumed front to back by the driver.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.temperatures
            .iter()
            .copied()
            .zip(self.fields.iter().copied())
    }

    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn fields(&self) -> &[f64] {
        &self.fields
    }
}
