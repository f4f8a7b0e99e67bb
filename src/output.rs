//! Output rendering for build, scan, and convert commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-item fields and a top-level summary.

use crate::materialize::Materialized;
use crate::models::RunOutcome;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::PathBuf;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print a run's collected warnings and materialized outputs.
pub fn print_run(res: &RunOutcome, done: &Materialized, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_run_json(res, done)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            for w in &res.warnings {
                let tag = if color {
                    "⟦warn⟧".yellow().bold().to_string()
                } else {
                    "⟦warn⟧".to_string()
                };
                let icon = if color {
                    "▲".yellow().to_string()
                } else {
                    "▲".to_string()
                };
                let file = if color {
                    format!("{}({})", w.file_path, w.raw_location)
                        .bold()
                        .to_string()
                } else {
                    format!("{}({})", w.file_path, w.raw_location)
                };
                println!("{} {} {} ❲{}❳ — {}", icon, tag, file, w.rule_id, w.description);
            }
            for p in &done.artifact_paths {
                if color {
                    println!("{} {}", "📦 copied:".green().bold(), crate::utils::rel_to_wd(p));
                } else {
                    println!("📦 copied: {}", crate::utils::rel_to_wd(p));
                }
            }
            for p in &done.report_paths {
                if color {
                    println!("{} {}", "🧾 report:".green().bold(), crate::utils::rel_to_wd(p));
                } else {
                    println!("🧾 report: {}", crate::utils::rel_to_wd(p));
                }
            }
            let status = if res.exit_succeeded {
                "succeeded"
            } else {
                "failed"
            };
            let summary = format!(
                "— Summary — warnings={} artifacts={} reports={} build={}",
                res.warnings.len(),
                res.artifact_paths.len(),
                res.report_paths.len(),
                status
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print conversion results for `convert` and `scan`.
pub fn print_generated(paths: &[PathBuf], output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_generated_json(paths)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            for p in paths {
                if color {
                    println!("{} {}", "🧾 generated:".green().bold(), crate::utils::rel_to_wd(p));
                } else {
                    println!("🧾 generated: {}", crate::utils::rel_to_wd(p));
                }
            }
        }
    }
}

/// Compose run JSON object (pure) for testing/snapshot purposes.
pub fn compose_run_json(res: &RunOutcome, done: &Materialized) -> JsonVal {
    json!({
        "warnings": serde_json::to_value(&res.warnings).unwrap(),
        "produced": {
            "artifacts": res.artifact_paths,
            "reports": res.report_paths,
        },
        "materialized": {
            "artifacts": done.artifact_paths,
            "reports": done.report_paths,
        },
        "summary": {
            "warnings": res.warnings.len(),
            "artifacts": res.artifact_paths.len(),
            "reports": res.report_paths.len(),
            "succeeded": res.exit_succeeded,
        }
    })
}

/// Compose generated-file JSON object (pure) for testing purposes.
pub fn compose_generated_json(paths: &[PathBuf]) -> JsonVal {
    json!({
        "generated": paths,
        "summary": { "total": paths.len() }
    })
}
