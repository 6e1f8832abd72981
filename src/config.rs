//! Run-time configuration (single source of truth).

use crate::error::ConfigError;

/// All simulation parameters for one sweep.
///
/// Immutable once built; `validate` is called by the sweep coordinator
/// before any lattice is constructed.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Lattice side length N (the lattice has N^2 sites).
    pub side: usize,
    /// Lowest target temperature of the sweep.
    pub t_min: f64,
    /// Upper bound of the sweep (exclusive when above `t_min`).
    pub t_max: f64,
    /// Spacing between successive target temperatures.
    pub t_step: f64,
    /// Temperature the anneal ramp starts from.
    pub t_top: f64,
    /// External field magnitude the degaussing ramp starts from.
    pub field: f64,
    /// Ratio of sites examined for a flip in each step.
    pub flip_perc: f64,
    /// Total steps per temperature.
    pub n_steps: usize,
    /// Steps held at the target temperature before measuring.
    pub n_burnin: usize,
    /// Steps measured at the end of the run.
    pub n_analyze: usize,
    /// Prefer the optimized lattice engine.
    pub use_fast: bool,
    /// Run temperatures on the worker pool instead of sequentially.
    pub parallel: bool,
    /// Suppress the per-step progress bar in sequential mode.
    pub quiet_progress: bool,
    /// Capture the final spin configuration of each run.
    pub snapshot_spins: bool,
    /// Master seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            side: 10,
            t_min: 2.15,
            t_max: 2.5,
            t_step: 0.05,
            t_top: 4.0,
            field: 0.0,
            flip_perc: 0.1,
            n_steps: 9_000,
            n_burnin: 2_000,
            n_analyze: 5_000,
            use_fast: false,
            parallel: false,
            quiet_progress: false,
            snapshot_spins: false,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Length of the anneal phase, `n_steps - n_burnin - n_analyze`.
    pub fn n_anneal(&self) -> Result<usize, ConfigError> {
        (self.n_steps)
            .checked_sub(self.n_burnin)
            .and_then(|rest| rest.checked_sub(self.n_analyze))
            .ok_or(ConfigError::NegativeAnneal {
                n_steps: self.n_steps,
                n_burnin: self.n_burnin,
                n_analyze: self.n_analyze,
            })
    }

    /// Reject parameter combinations the pipeline cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.n_anneal()?;
        if self.n_analyze == 0 {
            return Err(ConfigError::EmptyAnalyze);
        }
        if self.side < 4 {
            return Err(ConfigError::LatticeTooSmall { side: self.side });
        }
        if self.t_max > self.t_min && self.t_step <= 0.0 {
            return Err(ConfigError::BadTemperatureStep {
                t_min: self.t_min,
                t_max: self.t_max,
            });
        }
        if !(self.flip_perc > 0.0 && self.flip_perc <= 1.0) {
            return Err(ConfigError::BadFlipRatio(self.flip_perc));
        }
        Ok(())
    }

    /// Target temperatures of the sweep.
    ///
    /// `t_max <= t_min` collapses to the single value `t_min`; otherwise the
    /// half-open arithmetic sequence `t_min, t_min + t_step, .. < t_max`.
    pub fn temperatures(&self) -> Vec<f64> {
        if self.t_max <= self.t_min {
            return vec![self.t_min];
        }
        let count = ((self.t_max - self.t_min) / self.t_step).ceil() as usize;
        (0..count)
            .map(|i| self.t_min + i as f64 * self.t_step)
            .collect()
    }
}
