//! Conversion of the static code analysis XML report.
//!
//! The report is a `Problems` root holding zero or more `Problem` entries.
//! The serde binding collects repeated `Problem` elements into a `Vec`, so a
//! single entry and many entries normalize the same way and iteration is
//! always total. Numeric fields are bound as text and parsed leniently: an
//! entry that fails validation is dropped without failing the conversion,
//! while a malformed document is a `ConvertError`.

use crate::models::DiagnosticRecord;
use crate::sarif::ReportBuilder;
use crate::models::sarif::SarifLog;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read analysis report {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("analysis report {path} is empty")]
    Empty { path: PathBuf },
    #[error("malformed analysis report {path}: {source}")]
    Xml {
        path: PathBuf,
        source: quick_xml::DeError,
    },
}

#[derive(Debug, Deserialize)]
struct ProblemsDoc {
    #[serde(rename = "Problem", default)]
    problems: Vec<ProblemEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProblemEntry {
    #[serde(rename = "Rule")]
    rule: String,
    #[serde(rename = "ProblemDescription")]
    problem_description: String,
    #[serde(rename = "SourceFile")]
    source_file: String,
    #[serde(rename = "Line")]
    line: String,
    #[serde(rename = "Column")]
    column: String,
    #[serde(rename = "Severity")]
    severity: Option<String>,
}

impl ProblemEntry {
    /// Validate into a record: rule and source file non-empty, line and
    /// column strictly positive. Anything else yields no record.
    fn into_record(self) -> Option<DiagnosticRecord> {
        if self.rule.is_empty() || self.source_file.is_empty() {
            return None;
        }
        let line: u32 = self.line.trim().parse().ok()?;
        let column: u32 = self.column.trim().parse().ok()?;
        if line == 0 || column == 0 {
            return None;
        }
        Some(DiagnosticRecord {
            rule_id: self.rule,
            description: self.problem_description,
            source_file: self.source_file,
            line,
            column,
            severity: self.severity,
        })
    }
}

/// Parse report text into validated records, dropping invalid entries.
pub fn parse_problems(xml: &str) -> Result<Vec<DiagnosticRecord>, quick_xml::DeError> {
    let doc: ProblemsDoc = quick_xml::de::from_str(xml)?;
    Ok(doc
        .problems
        .into_iter()
        .filter_map(ProblemEntry::into_record)
        .collect())
}

/// Read one report file and assemble a SARIF document from it.
pub fn convert_file(path: &Path, mut builder: ReportBuilder) -> Result<SarifLog, ConvertError> {
    let bytes = fs::read(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(ConvertError::Empty {
            path: path.to_path_buf(),
        });
    }
    let text = String::from_utf8_lossy(&bytes);
    let records = parse_problems(&text).map_err(|source| ConvertError::Xml {
        path: path.to_path_buf(),
        source,
    })?;
    for record in &records {
        builder.push_diagnostic(record);
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Problems>
  <Problem>
    <Rule>SR0001</Rule>
    <ProblemDescription>Avoid SELECT *</ProblemDescription>
    <SourceFile>C:\p\a.sql</SourceFile>
    <Line>4</Line>
    <Column>9</Column>
    <Severity>Warning</Severity>
  </Problem>
  <Problem>
    <Rule>SR0016</Rule>
    <ProblemDescription>sp_ prefix</ProblemDescription>
    <SourceFile>C:\p\b.sql</SourceFile>
    <Line>1</Line>
    <Column>1</Column>
    <Severity>Warning</Severity>
  </Problem>
</Problems>"#;

    #[test]
    fn test_parse_many_problems() {
        let recs = parse_problems(MANY).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].rule_id, "SR0001");
        assert_eq!(recs[1].source_file, r"C:\p\b.sql");
        assert_eq!(recs[0].severity.as_deref(), Some("Warning"));
    }

    #[test]
    fn test_single_problem_normalizes_to_one_element() {
        let xml = r#"<Problems>
  <Problem>
    <Rule>SR0008</Rule>
    <ProblemDescription>SCOPE_IDENTITY</ProblemDescription>
    <SourceFile>C:\p\c.sql</SourceFile>
    <Line>12</Line>
    <Column>3</Column>
    <Severity>Warning</Severity>
  </Problem>
</Problems>"#;
        let recs = parse_problems(xml).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!((recs[0].line, recs[0].column), (12, 3));
    }

    #[test]
    fn test_empty_problems_root_yields_no_records() {
        let recs = parse_problems("<Problems></Problems>").unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_invalid_entries_dropped_silently() {
        let xml = r#"<Problems>
  <Problem>
    <Rule>SR0001</Rule>
    <ProblemDescription>zero line</ProblemDescription>
    <SourceFile>C:\p\a.sql</SourceFile>
    <Line>0</Line>
    <Column>2</Column>
  </Problem>
  <Problem>
    <Rule></Rule>
    <ProblemDescription>empty rule</ProblemDescription>
    <SourceFile>C:\p\a.sql</SourceFile>
    <Line>3</Line>
    <Column>2</Column>
  </Problem>
  <Problem>
    <Rule>SR0004</Rule>
    <ProblemDescription>kept</ProblemDescription>
    <SourceFile>C:\p\a.sql</SourceFile>
    <Line>3</Line>
    <Column>2</Column>
  </Problem>
</Problems>"#;
        let recs = parse_problems(xml).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].rule_id, "SR0004");
    }

    #[test]
    fn test_missing_source_file_dropped() {
        let xml = r#"<Problems>
  <Problem>
    <Rule>SR0001</Rule>
    <ProblemDescription>no source</ProblemDescription>
    <Line>3</Line>
    <Column>2</Column>
  </Problem>
</Problems>"#;
        assert!(parse_problems(xml).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(parse_problems("<Problems><Problem></Problems>").is_err());
    }

    #[test]
    fn test_convert_file_builds_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.Results.xml");
        fs::write(&path, MANY).unwrap();
        let log = convert_file(&path, ReportBuilder::new()).unwrap();
        let run = &log.runs[0];
        assert_eq!(run.results.len(), 2);
        assert_eq!(run.tool.driver.rules.len(), 2);
        assert_eq!(run.results[0].level, "warning");
    }

    #[test]
    fn test_convert_file_empty_report_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xml");
        fs::write(&path, b"").unwrap();
        match convert_file(&path, ReportBuilder::new()) {
            Err(ConvertError::Empty { .. }) => {}
            other => panic!("expected Empty, got {:?}", other.map(|_| ())),
        }
    }
}
