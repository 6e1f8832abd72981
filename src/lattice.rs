//! Reference 2-D Ising lattice.
//!
//! Plain row-major spin grid with periodic boundaries; every observable is
//! recomputed from the spins on demand. The optimized variant in
//! `lattice_fast` must stay observably equivalent to this one.

use crate::engine::{LatticeEngine, SpinSnapshot};
use crate::error::EngineError;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Spin-spin coupling constant.
const J: f64 = 1.0;

pub struct IsingLattice {
    side: usize,
    /// Row-major ±1 spins.
    spins: Vec<i8>,
    /// Sites examined per step.
    flips_per_step: usize,
    /// Field applied by the most recent step; energy depends on it.
    field: f64,
    rng: ChaCha20Rng,
    released: bool,
}

/// Sites examined per step for a given flip ratio, at least one.
pub(crate) fn flips_per_step(side: usize, flip_perc: f64) -> usize {
    (((side * side) as f64 * flip_perc).round() as usize).max(1)
}

impl IsingLattice {
    /// Build a lattice with uniformly random initial spins.
    pub fn new(side: usize, flip_perc: f64, seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let spins = (0..side * side)
            .map(|_| if rng.gen_bool(0.5) { 1i8 } else { -1i8 })
            .collect();
        Self {
            side,
            spins,
            flips_per_step: flips_per_step(side, flip_perc),
            field: 0.0,
            rng,
            released: false,
        }
    }

    #[inline(always)]
    fn at(&self, row: usize, col: usize) -> i8 {
        self.spins[row * self.side + col]
    }

    /// Σ of the four nearest neighbours with periodic wrap-around.
    fn neighbour_sum(&self, row: usize, col: usize) -> f64 {
        let n = self.side;
        let up = self.at((row + n - 1) % n, col);
        let down = self.at((row + 1) % n, col);
        let left = self.at(row, (col + n - 1) % n);
        let right = self.at(row, (col + 1) % n);
        (up + down + left + right) as f64
    }
}

impl LatticeEngine for IsingLattice {
    /// One Monte Carlo sweep: examine `flips_per_step` randomly chosen sites
    /// and flip each with the Metropolis acceptance rule.
    fn step(&mut self, temperature: f64, field: f64) -> Result<(), EngineError> {
        self.field = field;
        for _ in 0..self.flips_per_step {
            let row = self.rng.gen_range(0..self.side);
            let col = self.rng.gen_range(0..self.side);
            let s = self.at(row, col) as f64;
            let delta_e = 2.0 * s * (J * self.neighbour_sum(row, col) + field);

            let accept = if delta_e <= 0.0 {
                true
            } else {
                self.rng.gen::<f64>() < (-delta_e / temperature).exp()
            };
            if accept {
                self.spins[row * self.side + col] *= -1;
            }
        }
        Ok(())
    }

    /// Per-site energy, each bond counted once (right and down neighbours).
    fn energy(&self) -> f64 {
        let n = self.side;
        let mut bonds = 0.0;
        let mut total_spin = 0.0;
        for row in 0..n {
            for col in 0..n {
                let s = self.at(row, col) as f64;
                let right = self.at(row, (col + 1) % n) as f64;
                let down = self.at((row + 1) % n, col) as f64;
                bonds += s * (right + down);
                total_spin += s;
            }
        }
        (-J * bonds - self.field * total_spin) / (n * n) as f64
    }

    fn magnetization(&self) -> f64 {
        let total: i64 = self.spins.iter().map(|&s| s as i64).sum();
        total as f64 / (self.side * self.side) as f64
    }

    /// ⟨s(i,j) s(i+d,j)⟩ averaged over both lattice axes, for each lag d.
    fn autocorrelation(&self) -> Vec<(usize, f64)> {
        let n = self.side;
        let sites = (n * n) as f64;
        (1..n / 2)
            .map(|d| {
                let mut sum = 0.0;
                for row in 0..n {
                    for col in 0..n {
                        let s = self.at(row, col) as f64;
                        let shifted_row = self.at((row + d) % n, col) as f64;
                        let shifted_col = self.at(row, (col + d) % n) as f64;
                        sum += s * (shifted_row + shifted_col);
                    }
                }
                (d, sum / (2.0 * sites))
            })
            .collect()
    }

    fn snapshot_spins(&self) -> SpinSnapshot {
        SpinSnapshot {
            side: self.side,
            spins: self.spins.clone(),
        }
    }

    fn release(&mut self) {
        if !self.released {
            self.spins = Vec::new();
            self.released = true;
        }
    }
}
