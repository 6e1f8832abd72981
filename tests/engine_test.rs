//! Engine variant selection and seed mixing.

use ising::config::RunConfig;
use ising::engine::{
    build, default_factory, fast_lattice_available, mix_seed, EngineKind,
};

#[test]
fn test_reference_always_selectable() {
    assert_eq!(EngineKind::select(false), EngineKind::Reference);
}

#[test]
fn test_fast_selection_follows_availability() {
    let expected = if fast_lattice_available() {
        EngineKind::Fast
    } else {
        EngineKind::Reference
    };
    assert_eq!(EngineKind::select(true), expected);
}

#[test]
fn test_built_engines_honour_side_length() {
    for kind in [EngineKind::Reference, EngineKind::Fast] {
        let mut engine = build(kind, 8, 0.1, 11);
        engine.step(2.0, 0.0).unwrap();
        assert_eq!(engine.snapshot_spins().side, 8);
        assert_eq!(engine.autocorrelation().len(), 3);
        engine.release();
    }
}

#[test]
fn test_default_factory_runs() {
    let cfg = RunConfig::default();
    let mut engine = default_factory(&cfg, 2.0, 7);
    engine.step(2.0, 0.0).unwrap();
    let m = engine.magnetization();
    assert!((-1.0..=1.0).contains(&m));
    engine.release();
}

#[test]
fn test_mix_seed_is_deterministic_and_disperses() {
    assert_eq!(mix_seed(99, 3), mix_seed(99, 3));
    let seeds: Vec<u64> = (0..32).map(|i| mix_seed(99, i)).collect();
    let mut unique = seeds.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), seeds.len());
}
