//! CSV report layout and file naming.

use std::fs;

use ising::config::RunConfig;
use ising::engine::SpinSnapshot;
use ising::report::write_results;
use ising::stats::TemperatureResult;
use ising::sweep::SweepResult;

fn result_at(temperature: f64, with_spins: bool) -> TemperatureResult {
    TemperatureResult {
        temperature,
        e_mean: -1.2,
        e_std: 0.1,
        m_mean: 0.4,
        m_std: 0.05,
        m_abs_mean: 0.45,
        m_abs_std: 0.04,
        autocorr_mean: vec![0.9, 0.5, 0.2],
        autocorr_std: vec![0.01, 0.02, 0.03],
        last_spins: with_spins.then(|| SpinSnapshot {
            side: 4,
            spins: vec![
                1, -1, 1, -1, //
                1, 1, -1, -1, //
                -1, 1, 1, 1, //
                -1, -1, 1, -1,
            ],
        }),
    }
}

fn sweep_of(results: Vec<TemperatureResult>) -> SweepResult {
    SweepResult {
        results,
        failures: Vec::new(),
    }
}

#[test]
fn test_observables_and_correlations_layout() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RunConfig {
        t_min: 2.15,
        t_max: 2.5,
        ..RunConfig::default()
    };
    let sweep = sweep_of(vec![result_at(2.15, false), result_at(2.2, false)]);

    let paths = write_results(dir.path(), "runA_", &cfg, &sweep).unwrap();
    assert!(paths
        .observables
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .eq("runA_2.15T2.50_EM_v0.csv"));
    assert!(paths.spins.is_none());

    let em = fs::read_to_string(&paths.observables).unwrap();
    let mut lines = em.lines();
    assert_eq!(lines.next().unwrap(), "N,n_steps,n_analyze,flip_perc");
    assert_eq!(lines.next().unwrap(), "10,9000,5000,0.1");
    assert_eq!(lines.next().unwrap(), "");
    assert_eq!(
        lines.next().unwrap(),
        "Temp,E_mean,E_std,M_mean,M_std,M_abs_mean,M_abs_std"
    );
    assert_eq!(em.lines().count(), 6);

    let sc = fs::read_to_string(&paths.correlations).unwrap();
    let header = sc.lines().nth(3).unwrap();
    assert_eq!(
        header,
        "Temp,R_mean_d=1,R_std_d=1,R_mean_d=2,R_std_d=2,R_mean_d=3,R_std_d=3"
    );
    let first_row = sc.lines().nth(4).unwrap();
    assert!(first_row.starts_with("2.15,0.9,0.01,"));
}

#[test]
fn test_version_number_bumps_instead_of_clobbering() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RunConfig {
        t_min: 2.0,
        t_max: 2.0,
        ..RunConfig::default()
    };
    let sweep = sweep_of(vec![result_at(2.0, false)]);

    let first = write_results(dir.path(), "", &cfg, &sweep).unwrap();
    let second = write_results(dir.path(), "", &cfg, &sweep).unwrap();

    assert!(first.observables.to_str().unwrap().ends_with("2.00_EM_v0.csv"));
    assert!(second.observables.to_str().unwrap().ends_with("2.00_EM_v1.csv"));
    assert!(first.observables.exists() && second.observables.exists());
}

#[test]
fn test_spin_matrix_written_for_coldest_temperature() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RunConfig {
        side: 4,
        t_min: 2.0,
        t_max: 2.0,
        snapshot_spins: true,
        ..RunConfig::default()
    };
    let sweep = sweep_of(vec![result_at(2.0, true)]);

    let paths = write_results(dir.path(), "", &cfg, &sweep).unwrap();
    let ls = fs::read_to_string(paths.spins.unwrap()).unwrap();

    let mut lines = ls.lines();
    assert_eq!(lines.next().unwrap(), "N,n_steps,n_analyze,flip_perc,T");
    assert_eq!(lines.next().unwrap(), "4,9000,5000,0.1,2");
    assert_eq!(lines.next().unwrap(), "");
    assert_eq!(lines.next().unwrap(), "1,-1,1,-1");
    assert_eq!(ls.lines().count(), 7);
}
