//! Structured warning extraction from classified build-output lines.
//!
//! Shape: optional `N>` job prefix, file path, a parenthesized group of
//! exactly four comma-separated integers (start line, start column, end
//! line, end column), the `warning` token, a rule id, then a description
//! terminated by `].`. A line that misses any part yields no record; that
//! is a skip, not an error.

use crate::models::WarningRecord;
use regex::Regex;

pub struct WarningParser {
    re: Regex,
}

impl Default for WarningParser {
    fn default() -> Self {
        Self::new()
    }
}

impl WarningParser {
    pub fn new() -> Self {
        WarningParser {
            re: Regex::new(
                r"^(?:\d+>)?\s*(?P<file>.+?)\((?P<loc>[^)]*)\)\s*:\s*[Ww]arning\s+(?P<rule>[^\s:]+)\s*:\s*(?P<desc>.*)\]\.\s*$",
            )
            .unwrap(),
        }
    }

    /// Extract a record, or `None` when the line does not have the shape.
    pub fn parse(&self, line: &str) -> Option<WarningRecord> {
        let caps = self.re.captures(line)?;
        let raw_location = caps["loc"].to_string();
        let parts: Vec<&str> = raw_location.split(',').collect();
        if parts.len() != 4 {
            return None;
        }
        let mut nums = [0u32; 4];
        for (slot, part) in nums.iter_mut().zip(parts.iter()) {
            *slot = part.trim().parse().ok()?;
        }
        Some(WarningRecord {
            rule_id: caps["rule"].to_string(),
            file_path: caps["file"].trim().to_string(),
            start_line: nums[0],
            start_column: nums[1],
            end_line: nums[2],
            end_column: nums[3],
            description: caps["desc"].trim().to_string(),
            raw_location,
            raw_text: line.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_warning_line() {
        let p = WarningParser::new();
        let w = p
            .parse(r"1>C:\p\f.sql(10,2,10,2): warning SR0001: Bad thing ].")
            .unwrap();
        assert_eq!(w.rule_id, "SR0001");
        assert_eq!(w.file_path, r"C:\p\f.sql");
        assert_eq!(
            (w.start_line, w.start_column, w.end_line, w.end_column),
            (10, 2, 10, 2)
        );
        assert_eq!(w.description, "Bad thing");
        assert_eq!(w.raw_location, "10,2,10,2");
    }

    #[test]
    fn test_job_prefix_is_optional() {
        let p = WarningParser::new();
        let w = p
            .parse(r"C:\p\f.sql(1,1,1,5): warning SR0016: sp_ prefix ].")
            .unwrap();
        assert_eq!(w.rule_id, "SR0016");
    }

    #[test]
    fn test_three_component_location_rejected() {
        let p = WarningParser::new();
        assert!(p.parse(r"C:\p\f.sql(10,2,10): warning SR0001: x ].").is_none());
    }

    #[test]
    fn test_five_component_location_rejected() {
        let p = WarningParser::new();
        assert!(p
            .parse(r"C:\p\f.sql(10,2,10,2,9): warning SR0001: x ].")
            .is_none());
    }

    #[test]
    fn test_non_numeric_location_rejected() {
        let p = WarningParser::new();
        assert!(p.parse(r"C:\p\f.sql(10,2,ten,2): warning SR0001: x ].").is_none());
    }

    #[test]
    fn test_missing_terminator_rejected() {
        let p = WarningParser::new();
        assert!(p
            .parse(r"C:\p\f.sql(10,2,10,2): warning SR0001: no terminator")
            .is_none());
    }

    #[test]
    fn test_plain_line_rejected() {
        let p = WarningParser::new();
        assert!(p.parse("Build succeeded with warnings.").is_none());
    }
}
