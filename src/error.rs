//! Error taxonomy for the sweep pipeline.
//!
//! Configuration problems are fatal and surface before any lattice work
//! starts. Per-temperature simulation failures are contained at the sweep
//! boundary. Cancellation is its own variant everywhere so it can never be
//! swallowed together with an ordinary failure.

use thiserror::Error;

/// Invalid parameter combination. Raised before any simulation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("n_burnin + n_analyze exceeds n_steps ({n_burnin} + {n_analyze} > {n_steps})")]
    NegativeAnneal {
        n_steps: usize,
        n_burnin: usize,
        n_analyze: usize,
    },

    #[error("n_analyze must be at least 1")]
    EmptyAnalyze,

    #[error("lattice side {side} is too small for autocorrelation (need side >= 4)")]
    LatticeTooSmall { side: usize },

    #[error("t_step must be positive to sweep from {t_min} to {t_max}")]
    BadTemperatureStep { t_min: f64, t_max: f64 },

    #[error("flip_perc {0} outside (0, 1]")]
    BadFlipRatio(f64),
}

/// Failure inside a lattice engine while stepping.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

/// Failure while stepping or measuring one temperature.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("T={temperature}: engine step failed: {source}")]
    Step {
        temperature: f64,
        source: EngineError,
    },

    #[error(
        "T={temperature}: autocorrelation lag count changed mid-run \
         (sample {index} has {got} lags, expected {expected})"
    )]
    LagMismatch {
        temperature: f64,
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("T={temperature}: no analyze samples were collected")]
    NoSamples { temperature: f64 },
}

impl SimulationError {
    /// Temperature the failure belongs to.
    pub fn temperature(&self) -> f64 {
        match self {
            Self::Step { temperature, .. }
            | Self::LagMismatch { temperature, .. }
            | Self::NoSamples { temperature } => *temperature,
        }
    }
}

/// Outcome of driving a single temperature.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Schedule generation rejected the parameters; no engine was built.
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// The cancel token was set while stepping. Always propagated.
    #[error("run cancelled")]
    Cancelled,
}

/// Outcome of a whole sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("sweep cancelled")]
    Cancelled,
}
