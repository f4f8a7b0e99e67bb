//! Materialization of produced files to caller-chosen destinations.
//!
//! Destination naming is deterministic across multi-output runs: a
//! destination that already carries the expected extension becomes a
//! `_<index>`-suffixed family in its directory; a directory-like destination
//! keeps each produced file's own base name with the expected extension.
//! Copies run concurrently and are joined before results are reported.
//! Failures surface per file; files already copied stay in place.

use crate::models::RunOutcome;
use crate::sarif::ReportBuilder;
use crate::xmlreport::{self, ConvertError};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DACPAC_EXT: &str = ".dacpac";
pub const XML_EXT: &str = ".xml";
pub const SARIF_EXT: &str = ".sarif";

#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("failed to create directory {path}: {source}")]
    Mkdir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy {src} to {dst}: {source}")]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {dst}: {source}")]
    Write {
        dst: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Compute the destination for the `index`-th produced file.
///
/// `expected_ext` includes the dot (`.sarif`). `produced_stem` is the
/// produced file's base name without extension, used for directory-like
/// destinations.
pub fn numbered_destination(
    dest: &Path,
    expected_ext: &str,
    index: usize,
    produced_stem: &str,
) -> PathBuf {
    let want = expected_ext.trim_start_matches('.');
    let has_expected_ext = dest
        .extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(want))
        .unwrap_or(false);
    if has_expected_ext {
        let stem = dest
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let name = format!("{}_{}{}", stem, index, expected_ext);
        dest.parent().unwrap_or_else(|| Path::new("")).join(name)
    } else {
        dest.join(format!("{}{}", produced_stem, expected_ext))
    }
}

fn ensure_parent(dst: &Path) -> Result<(), MaterializeError> {
    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| MaterializeError::Mkdir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string())
}

/// Copy every produced file to its computed destination, concurrently.
/// Returns materialized paths in produced order plus per-file errors.
pub fn copy_outputs(
    produced: &[PathBuf],
    dest: &Path,
    expected_ext: &str,
) -> (Vec<PathBuf>, Vec<MaterializeError>) {
    let outcomes: Vec<Result<PathBuf, MaterializeError>> = produced
        .par_iter()
        .enumerate()
        .map(|(i, src)| {
            let dst = numbered_destination(dest, expected_ext, i, &stem_of(src));
            ensure_parent(&dst)?;
            fs::copy(src, &dst).map_err(|source| MaterializeError::Copy {
                src: src.clone(),
                dst: dst.clone(),
                source,
            })?;
            Ok(dst)
        })
        .collect();
    split_outcomes(outcomes)
}

/// Convert every produced XML report to SARIF and write it to its computed
/// destination, concurrently. A conversion failure affects only its file.
pub fn write_reports(
    produced: &[PathBuf],
    dest: &Path,
) -> (Vec<PathBuf>, Vec<MaterializeError>) {
    let outcomes: Vec<Result<PathBuf, MaterializeError>> = produced
        .par_iter()
        .enumerate()
        .map(|(i, src)| {
            let log = xmlreport::convert_file(src, ReportBuilder::new())?;
            let dst = numbered_destination(dest, SARIF_EXT, i, &stem_of(src));
            ensure_parent(&dst)?;
            let body = serde_json::to_string(&log).expect("sarif serialization");
            fs::write(&dst, body).map_err(|source| MaterializeError::Write {
                dst: dst.clone(),
                source,
            })?;
            Ok(dst)
        })
        .collect();
    split_outcomes(outcomes)
}

/// Convert one report and write the SARIF document to an exact path
/// (no numbered naming). Used when the caller fixed the destination.
pub fn write_report_to(src: &Path, dst: &Path) -> Result<PathBuf, MaterializeError> {
    let log = xmlreport::convert_file(src, ReportBuilder::new())?;
    ensure_parent(dst)?;
    let body = serde_json::to_string(&log).expect("sarif serialization");
    fs::write(dst, body).map_err(|source| MaterializeError::Write {
        dst: dst.to_path_buf(),
        source,
    })?;
    Ok(dst.to_path_buf())
}

fn split_outcomes(
    outcomes: Vec<Result<PathBuf, MaterializeError>>,
) -> (Vec<PathBuf>, Vec<MaterializeError>) {
    let mut paths = Vec::new();
    let mut errors = Vec::new();
    for o in outcomes {
        match o {
            Ok(p) => paths.push(p),
            Err(e) => errors.push(e),
        }
    }
    (paths, errors)
}

/// Caller-chosen destinations for one run's produced files.
pub struct Destinations {
    pub artifact_dest: Option<PathBuf>,
    pub report_dest: Option<PathBuf>,
    /// Convert reports to SARIF instead of copying the raw XML.
    pub convert_reports: bool,
}

#[derive(Debug, Default)]
pub struct Materialized {
    pub artifact_paths: Vec<PathBuf>,
    pub report_paths: Vec<PathBuf>,
}

/// Materialize a run's outputs. A failed run materializes nothing; zero
/// produced files yield empty lists, which is not an error.
pub fn materialize(
    outcome: &RunOutcome,
    dests: &Destinations,
) -> (Materialized, Vec<MaterializeError>) {
    let mut done = Materialized::default();
    let mut errors = Vec::new();
    if !outcome.exit_succeeded {
        return (done, errors);
    }
    if let Some(dest) = dests.artifact_dest.as_deref() {
        let (paths, errs) = copy_outputs(&outcome.artifact_paths, dest, DACPAC_EXT);
        done.artifact_paths = paths;
        errors.extend(errs);
    }
    if let Some(dest) = dests.report_dest.as_deref() {
        let (paths, errs) = if dests.convert_reports {
            write_reports(&outcome.report_paths, dest)
        } else {
            copy_outputs(&outcome.report_paths, dest, XML_EXT)
        };
        done.report_paths = paths;
        errors.extend(errs);
    }
    (done, errors)
}
