//! Shared data models for collected diagnostics and run outcomes.

pub mod sarif;

use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
/// A structured warning extracted from one build-output line.
pub struct WarningRecord {
    pub rule_id: String,
    pub file_path: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub description: String,
    /// The location group exactly as it appeared, e.g. `10,2,10,2`.
    pub raw_location: String,
    pub raw_text: String,
}

impl WarningRecord {
    /// Identity key for first-occurrence de-duplication.
    pub fn identity(&self) -> (String, String, String) {
        (
            self.rule_id.clone(),
            self.file_path.clone(),
            self.raw_location.clone(),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
/// One normalized finding from the structured XML report.
pub struct DiagnosticRecord {
    pub rule_id: String,
    pub description: String,
    pub source_file: String,
    pub line: u32,
    pub column: u32,
    pub severity: Option<String>,
}

#[derive(Debug, Serialize)]
/// Everything one build invocation produced, read-only after stream end.
pub struct RunOutcome {
    pub artifact_paths: Vec<PathBuf>,
    pub report_paths: Vec<PathBuf>,
    pub warnings: Vec<WarningRecord>,
    pub exit_succeeded: bool,
}
