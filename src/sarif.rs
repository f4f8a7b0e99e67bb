//! SARIF report assembly.
//!
//! One `ReportBuilder` produces one document per run, regardless of whether
//! the diagnostics came from the text-log warning parser or the XML report
//! converter. Diagnostics are appended in stable input order; rules and
//! artifacts are interned on first reference and every result carries the
//! index the entry had at insertion time.
//!
//! The reported level is decided by a pluggable mapper. The default ignores
//! rule and severity and always answers `warning`.

use crate::models::sarif::{
    ArtifactLocation, Location, MessageText, PhysicalLocation, Region, SarifLog, SarifResult,
};
use crate::models::{DiagnosticRecord, WarningRecord};
use crate::registry::{ArtifactRegistry, RuleRegistry};
use crate::utils::file_uri;

/// Strategy mapping (rule id, severity) to a SARIF level.
pub type LevelMapper = fn(&str, Option<&str>) -> &'static str;

/// The observed behavior of the source tool: everything is a warning.
pub fn default_level(_rule_id: &str, _severity: Option<&str>) -> &'static str {
    "warning"
}

pub struct ReportBuilder {
    rules: RuleRegistry,
    artifacts: ArtifactRegistry,
    results: Vec<SarifResult>,
    level_for: LevelMapper,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::with_parts(RuleRegistry::new(), default_level)
    }

    /// Construct with a substitute rule catalog and/or level strategy.
    pub fn with_parts(rules: RuleRegistry, level_for: LevelMapper) -> Self {
        ReportBuilder {
            rules,
            artifacts: ArtifactRegistry::new(),
            results: Vec::new(),
            level_for,
        }
    }

    /// Append a result for a warning extracted from the text log.
    pub fn push_warning(&mut self, w: &WarningRecord) {
        self.push_entry(
            &w.rule_id,
            &w.description,
            &w.file_path,
            w.start_line,
            w.start_column,
            None,
        );
    }

    /// Append a result for a record converted from the XML report.
    pub fn push_diagnostic(&mut self, d: &DiagnosticRecord) {
        self.push_entry(
            &d.rule_id,
            &d.description,
            &d.source_file,
            d.line,
            d.column,
            d.severity.as_deref(),
        );
    }

    fn push_entry(
        &mut self,
        rule_id: &str,
        description: &str,
        source_file: &str,
        line: u32,
        column: u32,
        severity: Option<&str>,
    ) {
        let rule_index = self.rules.find_or_create(rule_id, Some(description));
        let uri = file_uri(source_file);
        let artifact_index = self.artifacts.find_or_create(&uri);
        self.results.push(SarifResult {
            level: (self.level_for)(rule_id, severity),
            message: MessageText {
                text: description.to_string(),
            },
            locations: vec![Location {
                physical_location: PhysicalLocation {
                    artifact_location: ArtifactLocation {
                        uri,
                        index: Some(artifact_index),
                    },
                    region: Region {
                        start_line: line,
                        start_column: column,
                    },
                },
            }],
            rule_id: rule_id.to_string(),
            rule_index,
        });
    }

    /// Assemble the whole document. No partial emission happens before this.
    pub fn finish(self) -> SarifLog {
        let mut log = SarifLog::empty();
        let run = &mut log.runs[0];
        run.tool.driver.rules = self.rules.into_rules();
        run.artifacts = self.artifacts.into_artifacts();
        run.results = self.results;
        log
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
