//! Schedule generation: phase lengths, ramp endpoints, hold values.

use ising::config::RunConfig;
use ising::error::ConfigError;
use ising::schedule::Schedule;

fn config(n_steps: usize, n_burnin: usize, n_analyze: usize) -> RunConfig {
    RunConfig {
        n_steps,
        n_burnin,
        n_analyze,
        t_top: 4.0,
        field: 1.5,
        ..RunConfig::default()
    }
}

#[test]
fn test_schedule_lengths_and_phases() {
    let cfg = config(100, 20, 30);
    let t_final = 2.0;
    let schedule = Schedule::build(&cfg, t_final).unwrap();

    assert_eq!(schedule.len(), 100);

    let n_anneal = 50;
    let temps = schedule.temperatures();
    let fields = schedule.fields();

    // Ramp endpoints.
    assert_eq!(temps[0], cfg.t_top);
    assert!((temps[n_anneal - 1] - t_final).abs() < 1e-12);
    assert_eq!(fields[0], cfg.field);
    assert!(fields[n_anneal - 1].abs() < 1e-12);

    // Ramps are monotone.
    for pair in temps[..n_anneal].windows(2) {
        assert!(pair[1] <= pair[0], "temperature ramp increased");
    }
    for pair in fields[..n_anneal].windows(2) {
        assert!(pair[1] <= pair[0], "field ramp increased");
    }

    // Burn-in and analyze hold at (t_final, 0).
    for step in n_anneal..100 {
        let (t, b) = schedule.at(step);
        assert_eq!(t, t_final);
        assert_eq!(b, 0.0);
    }
}

#[test]
fn test_empty_anneal_phase() {
    let cfg = config(50, 20, 30);
    let schedule = Schedule::build(&cfg, 1.8).unwrap();

    assert_eq!(schedule.len(), 50);
    for (t, b) in schedule.iter() {
        assert_eq!(t, 1.8);
        assert_eq!(b, 0.0);
    }
}

#[test]
fn test_single_point_anneal() {
    let cfg = config(51, 20, 30);
    let schedule = Schedule::build(&cfg, 1.8).unwrap();

    // A one-point ramp is the start value, as in numpy's linspace.
    assert_eq!(schedule.at(0), (cfg.t_top, cfg.field));
    assert_eq!(schedule.at(1), (1.8, 0.0));
}

#[test]
fn test_overcommitted_phases_fail() {
    let cfg = config(40, 30, 30);
    match Schedule::build(&cfg, 2.0) {
        Err(ConfigError::NegativeAnneal {
            n_steps,
            n_burnin,
            n_analyze,
        }) => {
            assert_eq!((n_steps, n_burnin, n_analyze), (40, 30, 30));
        }
        other => panic!("expected NegativeAnneal, got {other:?}"),
    }
}

#[test]
fn test_rebuild_reproduces_identical_schedule() {
    let cfg = config(200, 40, 60);
    let a = Schedule::build(&cfg, 2.3).unwrap();
    let b = Schedule::build(&cfg, 2.3).unwrap();

    assert_eq!(a.temperatures(), b.temperatures());
    assert_eq!(a.fields(), b.fields());
}

#[test]
fn test_temperature_array_semantics() {
    let mut cfg = RunConfig {
        t_min: 2.0,
        t_max: 2.5,
        t_step: 0.1,
        ..RunConfig::default()
    };
    let temps = cfg.temperatures();
    assert_eq!(temps.len(), 5);
    assert!((temps[0] - 2.0).abs() < 1e-12);
    assert!((temps[4] - 2.4).abs() < 1e-12);
    assert!(temps.iter().all(|&t| t < 2.5));

    // Degenerate range collapses to t_min alone.
    cfg.t_max = 2.0;
    assert_eq!(cfg.temperatures(), vec![2.0]);
    cfg.t_max = 1.0;
    assert_eq!(cfg.temperatures(), vec![2.0]);
}
