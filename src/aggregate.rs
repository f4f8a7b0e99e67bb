//! Per-run accumulation of classified build output.
//!
//! One `ResultAggregator` exists per build invocation. It receives the
//! classified stream synchronously in delivery order, so accumulated paths
//! and warnings mirror the original output ordering exactly. After stream
//! end it is read-only and handed to the report/materialization stages.

use crate::classify::{LineClass, LineClassifier};
use crate::models::{RunOutcome, WarningRecord};
use crate::stream::LineSplitter;
use crate::warnings::WarningParser;
use encoding_rs::Encoding;
use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;

#[derive(Default)]
pub struct ResultAggregator {
    artifact_paths: Vec<PathBuf>,
    report_paths: Vec<PathBuf>,
    warnings: Vec<WarningRecord>,
    seen: HashSet<(String, String, String)>,
}

impl ResultAggregator {
    pub fn accept_artifact(&mut self, path: String) {
        self.artifact_paths.push(PathBuf::from(path));
    }

    pub fn accept_report(&mut self, path: String) {
        self.report_paths.push(PathBuf::from(path));
    }

    /// Keep the first occurrence of each (rule, file, location) identity;
    /// later duplicates are discarded without reordering.
    pub fn accept_warning(&mut self, w: WarningRecord) {
        if self.seen.insert(w.identity()) {
            self.warnings.push(w);
        }
    }

    pub fn into_outcome(self, exit_succeeded: bool) -> RunOutcome {
        RunOutcome {
            artifact_paths: self.artifact_paths,
            report_paths: self.report_paths,
            warnings: self.warnings,
            exit_succeeded,
        }
    }
}

/// Options governing stream decoding and classification for one run.
pub struct CollectorOptions {
    pub collect_warnings: bool,
    pub hide_static_analysis: bool,
    pub encoding: &'static Encoding,
    pub flush_trailing: bool,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        CollectorOptions {
            collect_warnings: true,
            hide_static_analysis: false,
            encoding: encoding_rs::UTF_8,
            flush_trailing: false,
        }
    }
}

/// Bundles the splitter, classifier, parser, and aggregator for one run.
pub struct RunCollector {
    splitter: LineSplitter,
    classifier: LineClassifier,
    parser: WarningParser,
    agg: ResultAggregator,
}

impl RunCollector {
    pub fn new(opts: &CollectorOptions) -> Self {
        RunCollector {
            splitter: LineSplitter::new(opts.encoding, opts.flush_trailing),
            classifier: LineClassifier::new(opts.collect_warnings, opts.hide_static_analysis),
            parser: WarningParser::new(),
            agg: ResultAggregator::default(),
        }
    }

    /// Feed one chunk; plain lines are forwarded to `log` verbatim.
    pub fn push_chunk(&mut self, chunk: &[u8], log: &mut dyn FnMut(&str)) {
        for line in self.splitter.push(chunk) {
            self.take_line(&line.text, log);
        }
    }

    fn take_line(&mut self, line: &str, log: &mut dyn FnMut(&str)) {
        match self.classifier.classify(line) {
            LineClass::Suppressed => {}
            LineClass::WarningCandidate => {
                if let Some(w) = self.parser.parse(line) {
                    self.agg.accept_warning(w);
                }
            }
            LineClass::ArtifactPath(p) => self.agg.accept_artifact(p),
            LineClass::ReportPath(p) => self.agg.accept_report(p),
            LineClass::Plain => log(line),
        }
    }

    /// End of stream: classify a flushed trailing fragment if configured,
    /// then seal the aggregator with the run's exit signal.
    pub fn finish(self, exit_succeeded: bool, log: &mut dyn FnMut(&str)) -> RunOutcome {
        let RunCollector {
            splitter,
            classifier,
            parser,
            mut agg,
        } = self;
        if let Some(tail) = splitter.finish() {
            match classifier.classify(&tail.text) {
                LineClass::Suppressed => {}
                LineClass::WarningCandidate => {
                    if let Some(w) = parser.parse(&tail.text) {
                        agg.accept_warning(w);
                    }
                }
                LineClass::ArtifactPath(p) => agg.accept_artifact(p),
                LineClass::ReportPath(p) => agg.accept_report(p),
                LineClass::Plain => log(&tail.text),
            }
        }
        agg.into_outcome(exit_succeeded)
    }
}

/// Drain `reader` chunk by chunk into a fresh collector.
pub fn process_stream<R: Read>(
    mut reader: R,
    opts: &CollectorOptions,
    log: &mut dyn FnMut(&str),
) -> std::io::Result<RunCollector> {
    let mut collector = RunCollector::new(opts);
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        collector.push_chunk(&buf[..n], log);
    }
    Ok(collector)
}

/// Single-entry run processing: drain the stream, then seal with the
/// exit signal. The log sink receives every `Plain` line in order.
pub fn process_run<R: Read>(
    reader: R,
    opts: &CollectorOptions,
    exit_succeeded: bool,
    log: &mut dyn FnMut(&str),
) -> std::io::Result<RunOutcome> {
    let collector = process_stream(reader, opts, log)?;
    Ok(collector.finish(exit_succeeded, log))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const OUTPUT: &str = "Build started.\r\n\
1>C:\\p\\f.sql(10,2,10,2): warning SR0001: Bad thing ].\r\n\
1>C:\\p\\f.sql(10,2,10,2): warning SR0001: Bad thing ].\r\n\
  SqlPrepareForRun: db -> C:\\out\\db.dacpac\r\n\
  The results are saved in C:\\out\\db.Results.xml\r\n\
Build succeeded.\r\n";

    #[test]
    fn test_run_collects_paths_and_deduped_warnings() {
        let mut plain = Vec::new();
        let outcome = process_run(
            Cursor::new(OUTPUT.as_bytes()),
            &CollectorOptions::default(),
            true,
            &mut |l: &str| plain.push(l.to_string()),
        )
        .unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].rule_id, "SR0001");
        assert_eq!(outcome.artifact_paths, vec![PathBuf::from(r"C:\out\db.dacpac")]);
        assert_eq!(
            outcome.report_paths,
            vec![PathBuf::from(r"C:\out\db.Results.xml")]
        );
        assert!(outcome.exit_succeeded);
        assert_eq!(plain, vec!["Build started.", "Build succeeded."]);
    }

    #[test]
    fn test_chunk_boundaries_do_not_change_the_outcome() {
        let whole = process_run(
            Cursor::new(OUTPUT.as_bytes()),
            &CollectorOptions::default(),
            true,
            &mut |_| {},
        )
        .unwrap();

        // Re-deliver the same bytes one at a time.
        let mut collector = RunCollector::new(&CollectorOptions::default());
        for b in OUTPUT.as_bytes() {
            collector.push_chunk(std::slice::from_ref(b), &mut |_| {});
        }
        let split = collector.finish(true, &mut |_| {});

        assert_eq!(split.warnings.len(), whole.warnings.len());
        assert_eq!(split.artifact_paths, whole.artifact_paths);
        assert_eq!(split.report_paths, whole.report_paths);
    }

    #[test]
    fn test_first_occurrence_order_preserved() {
        let mut agg = ResultAggregator::default();
        let parser = WarningParser::new();
        for line in [
            r"C:\p\a.sql(1,1,1,2): warning SR0008: a ].",
            r"C:\p\b.sql(2,1,2,2): warning SR0001: b ].",
            r"C:\p\a.sql(1,1,1,2): warning SR0008: a ].",
        ] {
            agg.accept_warning(parser.parse(line).unwrap());
        }
        let out = agg.into_outcome(true);
        let rules: Vec<&str> = out.warnings.iter().map(|w| w.rule_id.as_str()).collect();
        assert_eq!(rules, vec!["SR0008", "SR0001"]);
    }

    #[test]
    fn test_failed_exit_keeps_warnings_for_logging() {
        let outcome = process_run(
            Cursor::new(OUTPUT.as_bytes()),
            &CollectorOptions::default(),
            false,
            &mut |_| {},
        )
        .unwrap();
        assert!(!outcome.exit_succeeded);
        assert_eq!(outcome.warnings.len(), 1);
        // Paths remain visible in the outcome; materialization skips them.
        assert_eq!(outcome.artifact_paths.len(), 1);
    }
}
