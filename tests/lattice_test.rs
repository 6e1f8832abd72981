//! Engine contract checks for the reference and optimized lattices.

use ising::engine::{LatticeEngine, SpinSnapshot};
use ising::lattice::IsingLattice;
#[cfg(feature = "fast-lattice")]
use ising::lattice_fast::FastLattice;

/// Per-site energy recomputed directly from a snapshot.
fn energy_from_spins(snap: &SpinSnapshot, field: f64) -> f64 {
    let n = snap.side;
    let at = |row: usize, col: usize| snap.spins[(row % n) * n + col % n] as f64;
    let mut bonds = 0.0;
    let mut total = 0.0;
    for row in 0..n {
        for col in 0..n {
            let s = at(row, col);
            bonds += s * (at(row, col + 1) + at(row + 1, col));
            total += s;
        }
    }
    (-bonds - field * total) / (n * n) as f64
}

fn magnetization_from_spins(snap: &SpinSnapshot) -> f64 {
    let total: i64 = snap.spins.iter().map(|&s| s as i64).sum();
    total as f64 / (snap.side * snap.side) as f64
}

fn check_contract(engine: &mut dyn LatticeEngine, side: usize) {
    for _ in 0..200 {
        engine.step(2.5, 0.3).unwrap();
    }

    let m = engine.magnetization();
    assert!((-1.0..=1.0).contains(&m), "magnetization {m} out of range");

    let corr = engine.autocorrelation();
    assert_eq!(corr.len(), side / 2 - 1);
    for (i, &(lag, value)) in corr.iter().enumerate() {
        assert_eq!(lag, i + 1);
        assert!((-1.0..=1.0).contains(&value), "autocorrelation {value} out of range");
    }

    let snap = engine.snapshot_spins();
    assert_eq!(snap.side, side);
    assert_eq!(snap.spins.len(), side * side);
    assert!(snap.spins.iter().all(|&s| s == 1 || s == -1));

    // Observables must agree with a direct recomputation from the spins.
    assert!((engine.energy() - energy_from_spins(&snap, 0.3)).abs() < 1e-9);
    assert!((engine.magnetization() - magnetization_from_spins(&snap)).abs() < 1e-12);
}

#[test]
fn test_reference_contract() {
    let mut lattice = IsingLattice::new(10, 0.1, 42);
    check_contract(&mut lattice, 10);
}

#[cfg(feature = "fast-lattice")]
#[test]
fn test_fast_contract() {
    let mut lattice = FastLattice::new(10, 0.1, 42);
    check_contract(&mut lattice, 10);
}

/// The fast engine's incremental bond/spin sums must stay exact over long
/// runs, including through field changes.
#[cfg(feature = "fast-lattice")]
#[test]
fn test_fast_incremental_bookkeeping_stays_exact() {
    let mut lattice = FastLattice::new(16, 0.25, 7);
    for step in 0..500 {
        let field = if step % 2 == 0 { 0.7 } else { -0.2 };
        lattice.step(2.2, field).unwrap();
        let snap = lattice.snapshot_spins();
        assert!((lattice.energy() - energy_from_spins(&snap, field)).abs() < 1e-9);
        assert!((lattice.magnetization() - magnetization_from_spins(&snap)).abs() < 1e-12);
    }
}

#[test]
fn test_same_seed_reproduces_run() {
    let run = |seed: u64| {
        let mut lattice = IsingLattice::new(8, 0.2, seed);
        for _ in 0..300 {
            lattice.step(2.0, 0.0).unwrap();
        }
        (lattice.energy(), lattice.magnetization(), lattice.snapshot_spins())
    };
    assert_eq!(run(0xDEADBEEF), run(0xDEADBEEF));
}

/// A strong field at low temperature aligns the lattice.
#[test]
fn test_field_alignment() {
    let mut lattice = IsingLattice::new(10, 0.5, 3);
    for _ in 0..2_000 {
        lattice.step(0.5, 3.0).unwrap();
    }
    assert!(lattice.magnetization() > 0.9);
}

#[test]
fn test_release_is_idempotent() {
    let mut lattice = IsingLattice::new(6, 0.1, 1);
    lattice.release();
    lattice.release();
}
