//! Per-line classification of build output.
//!
//! Ordered, mutually exclusive matching; the first rule that applies wins:
//! 1. static-analysis warning while hidden -> `Suppressed`
//! 2. contains `warning` while collection is on -> `WarningCandidate`
//! 3. `-> <path>.dacpac` arrow marker -> `ArtifactPath`
//! 4. `results are saved in <path>.xml` -> `ReportPath`
//! 5. anything else -> `Plain` (forwarded verbatim to the log sink)

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Hidden static-analysis warning; emitted to no sink.
    Suppressed,
    /// Candidate for structured warning extraction.
    WarningCandidate,
    /// Produced build artifact path captured from the arrow marker.
    ArtifactPath(String),
    /// Produced analysis report path.
    ReportPath(String),
    /// Ordinary output line.
    Plain,
}

pub struct LineClassifier {
    collect_warnings: bool,
    hide_static_analysis: bool,
    static_analysis: Regex,
    artifact: Regex,
    report: Regex,
}

impl LineClassifier {
    pub fn new(collect_warnings: bool, hide_static_analysis: bool) -> Self {
        LineClassifier {
            collect_warnings,
            hide_static_analysis,
            // SSDT static code analysis findings carry SR-prefixed rule ids.
            static_analysis: Regex::new(r"\):\s*[Ww]arning\s+SR\d+").unwrap(),
            artifact: Regex::new(r"->\s+(?P<path>.+\.(?i:dacpac))\s*$").unwrap(),
            report: Regex::new(r"(?i)results are saved in\s+(?P<path>.+\.xml)\s*$").unwrap(),
        }
    }

    /// Assign exactly one category; matching stops at the first success.
    pub fn classify(&self, line: &str) -> LineClass {
        if self.hide_static_analysis && self.static_analysis.is_match(line) {
            return LineClass::Suppressed;
        }
        if self.collect_warnings && line.contains("warning") {
            return LineClass::WarningCandidate;
        }
        if let Some(c) = self.artifact.captures(line) {
            return LineClass::ArtifactPath(c["path"].to_string());
        }
        if let Some(c) = self.report.captures(line) {
            return LineClass::ReportPath(c["path"].to_string());
        }
        LineClass::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WARNING_LINE: &str =
        r"1>C:\p\f.sql(10,2,10,2): warning SR0001: Avoid SELECT * in views ].";

    #[test]
    fn test_warning_candidate_when_collection_enabled() {
        let c = LineClassifier::new(true, false);
        assert_eq!(c.classify(WARNING_LINE), LineClass::WarningCandidate);
    }

    #[test]
    fn test_warning_line_is_plain_when_collection_disabled() {
        let c = LineClassifier::new(false, false);
        assert_eq!(c.classify(WARNING_LINE), LineClass::Plain);
    }

    #[test]
    fn test_hidden_static_analysis_is_suppressed_first() {
        // Suppression outranks warning collection.
        let c = LineClassifier::new(true, true);
        assert_eq!(c.classify(WARNING_LINE), LineClass::Suppressed);
    }

    #[test]
    fn test_non_sr_warning_still_collected_while_hiding() {
        let c = LineClassifier::new(true, true);
        let line = r"C:\p\a.sqlproj : warning MSB3245: could not resolve reference";
        assert_eq!(c.classify(line), LineClass::WarningCandidate);
    }

    #[test]
    fn test_artifact_arrow_capture() {
        let c = LineClassifier::new(true, false);
        let line = r"  SqlPrepareForRun: proj -> C:\out\db.dacpac";
        assert_eq!(
            c.classify(line),
            LineClass::ArtifactPath(r"C:\out\db.dacpac".to_string())
        );
    }

    #[test]
    fn test_report_path_capture() {
        let c = LineClassifier::new(true, false);
        let line = r"  The results are saved in C:\out\db.StaticCodeAnalysis.Results.xml";
        assert_eq!(
            c.classify(line),
            LineClass::ReportPath(r"C:\out\db.StaticCodeAnalysis.Results.xml".to_string())
        );
    }

    #[test]
    fn test_plain_output_fallthrough() {
        let c = LineClassifier::new(true, false);
        assert_eq!(c.classify("Build started."), LineClass::Plain);
    }
}
