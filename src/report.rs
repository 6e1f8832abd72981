//! CSV reporting of sweep results.
//!
//! Three files per sweep, versioned so reruns never clobber earlier output:
//! `{prefix}{t_name}_EM_v{v}.csv` for energy/magnetization,
//! `{prefix}{t_name}_SC_v{v}.csv` for spin correlations, and
//! `{prefix}{t_name}_LS_v{v}.csv` for the coldest temperature's final spin
//! matrix when snapshotting was on.

use crate::config::RunConfig;
use crate::sweep::SweepResult;
use csv::WriterBuilder;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot prepare output directory {path}: {source}")]
    Dir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: csv::Error },
}

/// Files written for one sweep.
#[derive(Debug)]
pub struct ReportPaths {
    pub observables: PathBuf,
    pub correlations: PathBuf,
    pub spins: Option<PathBuf>,
}

/// `2.15` for a single temperature, `2.15T2.50` for a range.
fn temperature_tag(cfg: &RunConfig) -> String {
    if cfg.t_max <= cfg.t_min {
        format!("{:.2}", cfg.t_min)
    } else {
        format!("{:.2}T{:.2}", cfg.t_min, cfg.t_max)
    }
}

/// First version number whose EM and SC names are both free.
fn versioned_paths(dir_out: &Path, prefix: &str, tag: &str) -> (PathBuf, PathBuf, PathBuf) {
    let mut v = 0;
    loop {
        let em = dir_out.join(format!("{prefix}{tag}_EM_v{v}.csv"));
        let sc = dir_out.join(format!("{prefix}{tag}_SC_v{v}.csv"));
        let ls = dir_out.join(format!("{prefix}{tag}_LS_v{v}.csv"));
        if !em.exists() && !sc.exists() {
            return (em, sc, ls);
        }
        v += 1;
    }
}

fn writer(path: &Path) -> Result<csv::Writer<fs::File>, ReportError> {
    WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Emit a bare blank separator line. The `csv` writer quotes an empty record
/// as `""`, so flush and write the newline straight to the underlying file.
fn write_blank_line(wtr: &mut csv::Writer<fs::File>, path: &Path) -> Result<(), ReportError> {
    let fail = |source: std::io::Error| ReportError::Write {
        path: path.to_path_buf(),
        source: source.into(),
    };
    wtr.flush().map_err(fail)?;
    let mut file: &fs::File = wtr.get_ref();
    file.write_all(b"\n").map_err(fail)
}

fn write_param_header(
    wtr: &mut csv::Writer<fs::File>,
    path: &Path,
    cfg: &RunConfig,
) -> Result<(), ReportError> {
    let fail = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    wtr.write_record(["N", "n_steps", "n_analyze", "flip_perc"])
        .map_err(fail)?;
    wtr.write_record(&[
        cfg.side.to_string(),
        cfg.n_steps.to_string(),
        cfg.n_analyze.to_string(),
        cfg.flip_perc.to_string(),
    ])
    .map_err(fail)?;
    write_blank_line(wtr, path)?;
    Ok(())
}

/// Write the EM/SC/LS files for a finished sweep.
pub fn write_results(
    dir_out: &Path,
    prefix: &str,
    cfg: &RunConfig,
    sweep: &SweepResult,
) -> Result<ReportPaths, ReportError> {
    fs::create_dir_all(dir_out).map_err(|source| ReportError::Dir {
        path: dir_out.to_path_buf(),
        source,
    })?;

    let tag = temperature_tag(cfg);
    let (em_path, sc_path, ls_path) = versioned_paths(dir_out, prefix, &tag);

    write_observables(&em_path, cfg, sweep)?;
    write_correlations(&sc_path, cfg, sweep)?;

    // Only the coldest temperature's final configuration is kept, matching
    // the single LS matrix per sweep.
    let spins = match sweep.results.first().and_then(|r| r.last_spins.as_ref()) {
        Some(snapshot) => {
            write_spins(&ls_path, cfg, sweep.results[0].temperature, snapshot)?;
            Some(ls_path)
        }
        None => None,
    };

    Ok(ReportPaths {
        observables: em_path,
        correlations: sc_path,
        spins,
    })
}

fn write_observables(path: &Path, cfg: &RunConfig, sweep: &SweepResult) -> Result<(), ReportError> {
    let fail = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = writer(path)?;
    write_param_header(&mut wtr, path, cfg)?;

    wtr.write_record([
        "Temp",
        "E_mean",
        "E_std",
        "M_mean",
        "M_std",
        "M_abs_mean",
        "M_abs_std",
    ])
    .map_err(fail)?;

    for r in &sweep.results {
        wtr.write_record(&[
            r.temperature.to_string(),
            r.e_mean.to_string(),
            r.e_std.to_string(),
            r.m_mean.to_string(),
            r.m_std.to_string(),
            r.m_abs_mean.to_string(),
            r.m_abs_std.to_string(),
        ])
        .map_err(fail)?;
    }
    wtr.flush().map_err(|e| fail(e.into()))
}

fn write_correlations(path: &Path, cfg: &RunConfig, sweep: &SweepResult) -> Result<(), ReportError> {
    let fail = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = writer(path)?;
    write_param_header(&mut wtr, path, cfg)?;

    // Lag columns come from the first temperature; the aggregator has
    // already verified every run is lag-consistent.
    if let Some(first) = sweep.results.first() {
        let mut header = vec!["Temp".to_string()];
        for d in 1..=first.autocorr_mean.len() {
            header.push(format!("R_mean_d={d}"));
            header.push(format!("R_std_d={d}"));
        }
        wtr.write_record(&header).map_err(fail)?;

        for r in &sweep.results {
            let mut row = vec![r.temperature.to_string()];
            for (mean, std) in r.autocorr_mean.iter().zip(&r.autocorr_std) {
                row.push(mean.to_string());
                row.push(std.to_string());
            }
            wtr.write_record(&row).map_err(fail)?;
        }
    }
    wtr.flush().map_err(|e| fail(e.into()))
}

fn write_spins(
    path: &Path,
    cfg: &RunConfig,
    temperature: f64,
    snapshot: &crate::engine::SpinSnapshot,
) -> Result<(), ReportError> {
    let fail = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = writer(path)?;

    wtr.write_record(["N", "n_steps", "n_analyze", "flip_perc", "T"])
        .map_err(fail)?;
    wtr.write_record(&[
        cfg.side.to_string(),
        cfg.n_steps.to_string(),
        cfg.n_analyze.to_string(),
        cfg.flip_perc.to_string(),
        temperature.to_string(),
    ])
    .map_err(fail)?;
    write_blank_line(&mut wtr, path)?;

    for i in 0..snapshot.side {
        let row: Vec<String> = snapshot.row(i).iter().map(|s| s.to_string()).collect();
        wtr.write_record(&row).map_err(fail)?;
    }
    wtr.flush().map_err(|e| fail(e.into()))
}
