//! The lattice engine contract and construction-time variant selection.

use crate::config::RunConfig;
use crate::error::EngineError;
use crate::lattice::IsingLattice;
use tracing::warn;

/// Full spin configuration captured after the last analyze step.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSnapshot {
    pub side: usize,
    /// Row-major ±1 spins, `side * side` entries.
    pub spins: Vec<i8>,
}

impl SpinSnapshot {
    /// Row `i` of the spin matrix.
    pub fn row(&self, i: usize) -> &[i8] {
        &self.spins[i * self.side..(i + 1) * self.side]
    }
}

/// One Monte Carlo lattice, exclusively owned by a single driver invocation.
///
/// `step` advances the lattice by one sweep at the given temperature and
/// external field. Measurements read the state left by the most recent step.
/// `release` tears down engine-held state; the driver calls it exactly once
/// on every exit path, and implementations must tolerate a second call.
pub trait LatticeEngine {
    fn step(&mut self, temperature: f64, field: f64) -> Result<(), EngineError>;

    /// Energy per site at the most recently applied field.
    fn energy(&self) -> f64;

    /// Mean spin per site.
    fn magnetization(&self) -> f64;

    /// Spin autocorrelation as (lag, value) pairs for lags `1..=side/2 - 1`,
    /// in increasing lag order.
    fn autocorrelation(&self) -> Vec<(usize, f64)>;

    fn snapshot_spins(&self) -> SpinSnapshot;

    fn release(&mut self);
}

/// Which engine implementation a run will construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Reference,
    Fast,
}

impl EngineKind {
    /// Resolve the configured preference against what this build carries.
    ///
    /// Requesting the optimized engine when it was not compiled in is a
    /// warning plus fallback, not an error. Called once per construction;
    /// nothing else consults availability.
    pub fn select(use_fast: bool) -> Self {
        if !use_fast {
            return Self::Reference;
        }
        if fast_lattice_available() {
            Self::Fast
        } else {
            warn!(
                "optimized lattice requested but the fast-lattice feature is \
                 not compiled in; using the reference lattice"
            );
            Self::Reference
        }
    }
}

/// Whether the optimized engine is present in this build.
pub fn fast_lattice_available() -> bool {
    cfg!(feature = "fast-lattice")
}

/// Construct an engine of the given kind.
pub fn build(kind: EngineKind, side: usize, flip_perc: f64, seed: u64) -> Box<dyn LatticeEngine> {
    match kind {
        EngineKind::Reference => Box::new(IsingLattice::new(side, flip_perc, seed)),
        #[cfg(feature = "fast-lattice")]
        EngineKind::Fast => Box::new(crate::lattice_fast::FastLattice::new(side, flip_perc, seed)),
        #[cfg(not(feature = "fast-lattice"))]
        EngineKind::Fast => Box::new(IsingLattice::new(side, flip_perc, seed)),
    }
}

/// Default factory used by the sweep coordinator: one fresh engine per
/// (temperature, seed), variant resolved from the config.
pub fn default_factory(cfg: &RunConfig, _t_final: f64, seed: u64) -> Box<dyn LatticeEngine> {
    build(EngineKind::select(cfg.use_fast), cfg.side, cfg.flip_perc, seed)
}

/// Mix a per-run seed out of the master seed and the temperature index, so
/// concurrent and sequential sweeps hand identical seeds to each temperature.
pub fn mix_seed(master: u64, index: usize) -> u64 {
    let mut x = master ^ (index as u64).wrapping_mul(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
