//! SARIF 2.1.0 document schema (the subset this tool emits).
//!
//! Field names follow the SARIF property names via `camelCase` renames;
//! serialization order is declaration order, which keeps the emitted
//! document stable across runs.

use serde::Serialize;

pub const SARIF_VERSION: &str = "2.1.0";
pub const SARIF_SCHEMA: &str = "http://json.schemastore.org/sarif-2.1.0-rtm.4";
pub const TOOL_NAME: &str = "MSBuild";
pub const TOOL_INFORMATION_URI: &str =
    "https://docs.microsoft.com/en-us/visualstudio/msbuild/msbuild?view=vs-2022";

#[derive(Debug, Serialize)]
/// Top-level SARIF log with exactly one run.
pub struct SarifLog {
    pub version: &'static str,
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    pub runs: Vec<Run>,
}

#[derive(Debug, Serialize)]
pub struct Run {
    pub tool: Tool,
    pub artifacts: Vec<Artifact>,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
pub struct Tool {
    pub driver: ToolDriver,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDriver {
    pub name: &'static str,
    pub information_uri: &'static str,
    pub rules: Vec<ReportingDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// One interned rule. Position in `rules` is its stable index.
pub struct ReportingDescriptor {
    pub id: String,
    pub short_description: MessageText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_uri: Option<String>,
    pub properties: RuleProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleProperties {
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageText {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
/// One interned artifact. Position in `artifacts` is its stable index.
pub struct Artifact {
    pub location: ArtifactLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactLocation {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub level: &'static str,
    pub message: MessageText,
    pub locations: Vec<Location>,
    pub rule_id: String,
    pub rule_index: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub physical_location: PhysicalLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalLocation {
    pub artifact_location: ArtifactLocation,
    pub region: Region,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub start_line: u32,
    pub start_column: u32,
}

impl SarifLog {
    /// An empty document with the fixed schema and tool identity.
    pub fn empty() -> Self {
        SarifLog {
            version: SARIF_VERSION,
            schema: SARIF_SCHEMA,
            runs: vec![Run {
                tool: Tool {
                    driver: ToolDriver {
                        name: TOOL_NAME,
                        information_uri: TOOL_INFORMATION_URI,
                        rules: Vec::new(),
                    },
                },
                artifacts: Vec::new(),
                results: Vec::new(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_log_serializes_fixed_identity() {
        let log = SarifLog::empty();
        let v = serde_json::to_value(&log).unwrap();
        assert_eq!(v["version"], "2.1.0");
        assert_eq!(v["$schema"], SARIF_SCHEMA);
        assert_eq!(v["runs"][0]["tool"]["driver"]["name"], "MSBuild");
        assert!(v["runs"][0]["results"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_result_uses_camel_case_properties() {
        let res = SarifResult {
            level: "warning",
            message: MessageText {
                text: "msg".into(),
            },
            locations: vec![Location {
                physical_location: PhysicalLocation {
                    artifact_location: ArtifactLocation {
                        uri: "file:///tmp/a.sql".into(),
                        index: Some(0),
                    },
                    region: Region {
                        start_line: 3,
                        start_column: 7,
                    },
                },
            }],
            rule_id: "SR0001".into(),
            rule_index: 0,
        };
        let v = serde_json::to_value(&res).unwrap();
        assert_eq!(v["ruleId"], "SR0001");
        assert_eq!(v["ruleIndex"], 0);
        let loc = &v["locations"][0]["physicalLocation"];
        assert_eq!(loc["artifactLocation"]["index"], 0);
        assert_eq!(loc["region"]["startLine"], 3);
        assert_eq!(loc["region"]["startColumn"], 7);
    }
}
