//! Launching the build tool and pumping its output through a collector.
//!
//! The child's stdout is consumed chunk by chunk in arrival order; the
//! diagnostic pipeline only sees complete lines, and the run is sealed with
//! the process exit signal once the stream is drained. Stderr is left
//! attached to the caller's terminal.

use crate::aggregate::{process_stream, CollectorOptions};
use crate::models::RunOutcome;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read build output: {0}")]
    Stream(#[from] std::io::Error),
}

/// Run `tool` with `args`, classifying its stdout line by line.
///
/// Plain output lines reach `log` as they complete; the returned outcome
/// carries everything the run produced plus the binary exit signal.
pub fn run_tool(
    tool: &Path,
    args: &[String],
    opts: &CollectorOptions,
    log: &mut dyn FnMut(&str),
) -> Result<RunOutcome, RunError> {
    let mut child = Command::new(tool)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| RunError::Spawn {
            tool: tool.to_path_buf(),
            source,
        })?;
    let stdout = child.stdout.take().expect("stdout was piped");
    let collector = process_stream(stdout, opts, log)?;
    let status = child.wait()?;
    Ok(collector.finish(status.success(), log))
}

/// Compose the argument list for an MSBuild invocation: the project file
/// first, then the caller's raw extra arguments split on whitespace.
pub fn build_args(project: &Path, extra: Option<&str>) -> Vec<String> {
    let mut args = vec![project.to_string_lossy().to_string()];
    if let Some(extra) = extra {
        args.extend(extra.split_whitespace().map(|s| s.to_string()));
    }
    args
}
