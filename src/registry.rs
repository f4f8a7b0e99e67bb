//! Append-only interning tables for rules and artifacts.
//!
//! Both registries are arenas: entries are appended once, never reordered
//! or removed, and an entry's position is its stable index for the lifetime
//! of the report. Lookups are linear by exact key equality; the catalogs
//! involved are small enough that a hashed index would change nothing
//! observable.

use crate::models::sarif::{
    Artifact, ArtifactLocation, MessageText, ReportingDescriptor, RuleProperties,
};

/// Category assigned to rules synthesized outside the catalog.
const GENERIC_CATEGORY: &str = "Microsoft.Design";
const GENERIC_DESCRIPTION: &str = "No description available for this rule.";

const RULE_REFERENCE_URI: &str =
    "https://docs.microsoft.com/en-us/previous-versions/visualstudio/visual-studio-2010/dd172133(v=vs.100)";

#[derive(Debug, Clone, Copy)]
/// A well-known rule with a fixed human-readable description.
pub struct CatalogRule {
    pub id: &'static str,
    pub description: &'static str,
    pub help_uri: &'static str,
    pub category: &'static str,
}

/// The T-SQL static code analysis rule set shipped with DacFx.
pub const BUILTIN_CATALOG: &[CatalogRule] = &[
    CatalogRule {
        id: "SR0001",
        description: "Avoid SELECT * in stored procedures, views, and table-valued functions",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Design",
    },
    CatalogRule {
        id: "SR0004",
        description: "Avoid using columns that do not have indexes as test expressions in IN predicates",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Performance",
    },
    CatalogRule {
        id: "SR0005",
        description: "Avoid using patterns that start with \"%\" in LIKE predicates",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Performance",
    },
    CatalogRule {
        id: "SR0006",
        description: "Move a column reference to one side of a comparison operator to use a column index",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Performance",
    },
    CatalogRule {
        id: "SR0007",
        description: "Use ISNULL(column, default_value) on nullable columns in expressions",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Performance",
    },
    CatalogRule {
        id: "SR0008",
        description: "Consider using SCOPE_IDENTITY instead of @@IDENTITY",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Design",
    },
    CatalogRule {
        id: "SR0009",
        description: "Avoid using types of variable length that are size 1 or 2",
        help_uri: "https://docs.microsoft.com/en-us/previous-versions/visualstudio/visual-studio-2010/dd193263(v=vs.100)",
        category: "Microsoft.Design",
    },
    CatalogRule {
        id: "SR0010",
        description: "Avoid using deprecated syntax when you join tables or views",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Design",
    },
    CatalogRule {
        id: "SR0011",
        description: "Avoid using special characters in object names",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Naming",
    },
    CatalogRule {
        id: "SR0012",
        description: "Avoid using reserved words for type names",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Naming",
    },
    CatalogRule {
        id: "SR0013",
        description: "Output parameter is not populated in all code paths",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Design",
    },
    CatalogRule {
        id: "SR0014",
        description: "Data loss might occur when casting between data types",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Design",
    },
    CatalogRule {
        id: "SR0015",
        description: "Extract deterministic function calls from WHERE predicates",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Performance",
    },
    CatalogRule {
        id: "SR0016",
        description: "Avoid using sp_ as a prefix for stored procedures",
        help_uri: RULE_REFERENCE_URI,
        category: "Microsoft.Naming",
    },
];

/// Interning table from rule id to descriptor index.
pub struct RuleRegistry {
    catalog: Vec<CatalogRule>,
    rules: Vec<ReportingDescriptor>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::with_catalog(BUILTIN_CATALOG.to_vec())
    }

    /// Construct with a substitute catalog (tests inject a small one).
    pub fn with_catalog(catalog: Vec<CatalogRule>) -> Self {
        RuleRegistry {
            catalog,
            rules: Vec::new(),
        }
    }

    /// Return the index of `rule_id`, interning a descriptor on first use.
    ///
    /// The fallback consults the catalog; an unknown id gets a minimal
    /// descriptor built from `description_hint` (or a placeholder) and the
    /// generic category.
    pub fn find_or_create(&mut self, rule_id: &str, description_hint: Option<&str>) -> usize {
        if let Some(i) = self.rules.iter().position(|r| r.id == rule_id) {
            return i;
        }
        let descriptor = match self.catalog.iter().find(|c| c.id == rule_id) {
            Some(c) => ReportingDescriptor {
                id: rule_id.to_string(),
                short_description: MessageText {
                    text: c.description.to_string(),
                },
                help_uri: Some(c.help_uri.to_string()),
                properties: RuleProperties {
                    category: c.category.to_string(),
                },
            },
            None => ReportingDescriptor {
                id: rule_id.to_string(),
                short_description: MessageText {
                    text: description_hint
                        .filter(|s| !s.is_empty())
                        .unwrap_or(GENERIC_DESCRIPTION)
                        .to_string(),
                },
                help_uri: None,
                properties: RuleProperties {
                    category: GENERIC_CATEGORY.to_string(),
                },
            },
        };
        self.rules.push(descriptor);
        self.rules.len() - 1
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn into_rules(self) -> Vec<ReportingDescriptor> {
        self.rules
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Interning table from artifact URI to artifact index.
#[derive(Default)]
pub struct ArtifactRegistry {
    artifacts: Vec<Artifact>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_or_create(&mut self, uri: &str) -> usize {
        if let Some(i) = self.artifacts.iter().position(|a| a.location.uri == uri) {
            return i;
        }
        self.artifacts.push(Artifact {
            location: ArtifactLocation {
                uri: uri.to_string(),
                index: None,
            },
        });
        self.artifacts.len() - 1
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }
}
