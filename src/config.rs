//! Configuration discovery and effective settings resolution.
//!
//! Dacscan reads `dacscan.toml|yaml|yml` from the project root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `output`: `human`
//! - `[build].collect_warnings`: false
//! - `[build].hide_static_analysis`: false
//! - `[stream].encoding`: `utf-8`
//! - `[stream].flush_trailing`: false
//! - `[tool].vs_version`: `latest`, `[tool].arch`: `x86`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::aggregate::CollectorOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Build-related configuration section under `[build]`.
pub struct BuildCfg {
    pub collect_warnings: Option<bool>,
    pub hide_static_analysis: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Output-stream decoding section under `[stream]`.
pub struct StreamCfg {
    /// Encoding label for the tool's stdout, e.g. `gbk` or `utf-8`.
    pub encoding: Option<String>,
    /// Emit a trailing unterminated line at end of stream.
    pub flush_trailing: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Toolchain discovery section under `[tool]`.
pub struct ToolCfg {
    pub vswhere: Option<String>,
    pub vs_version: Option<String>,
    pub arch: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `dacscan.toml|yaml`.
pub struct DacscanConfig {
    pub output: Option<String>,
    pub build: Option<BuildCfg>,
    pub stream: Option<StreamCfg>,
    pub tool: Option<ToolCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub output: String,
    pub collect_warnings: bool,
    pub hide_static_analysis: bool,
    pub encoding: String,
    pub flush_trailing: bool,
    pub vswhere: Option<PathBuf>,
    pub vs_version: String,
    pub arch: String,
}

impl Effective {
    /// Collector options for one run; an unknown encoding label is answered
    /// with `None` so the caller can surface it.
    pub fn collector_options(&self) -> Option<CollectorOptions> {
        let encoding = crate::stream::encoding_for_label(&self.encoding)?;
        Some(CollectorOptions {
            collect_warnings: self.collect_warnings,
            hide_static_analysis: self.hide_static_analysis,
            encoding,
            flush_trailing: self.flush_trailing,
        })
    }
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when a `dacscan.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("dacscan.toml").exists()
            || cur.join("dacscan.yaml").exists()
            || cur.join("dacscan.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `DacscanConfig` from `dacscan.toml` or `dacscan.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<DacscanConfig> {
    let toml_path = root.join("dacscan.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: DacscanConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["dacscan.yaml", "dacscan.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: DacscanConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_collect_warnings: Option<bool>,
    cli_hide_static_analysis: Option<bool>,
    cli_vswhere: Option<&str>,
    cli_vs_version: Option<&str>,
    cli_arch: Option<&str>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let collect_warnings = cli_collect_warnings
        .or_else(|| cfg.build.as_ref().and_then(|b| b.collect_warnings))
        .unwrap_or(false);
    let hide_static_analysis = cli_hide_static_analysis
        .or_else(|| cfg.build.as_ref().and_then(|b| b.hide_static_analysis))
        .unwrap_or(false);

    let encoding = cfg
        .stream
        .as_ref()
        .and_then(|s| s.encoding.clone())
        .unwrap_or_else(|| "utf-8".to_string());
    let flush_trailing = cfg
        .stream
        .as_ref()
        .and_then(|s| s.flush_trailing)
        .unwrap_or(false);

    let vswhere = cli_vswhere
        .map(|s| s.to_string())
        .or_else(|| cfg.tool.as_ref().and_then(|t| t.vswhere.clone()))
        .map(PathBuf::from);
    let vs_version = cli_vs_version
        .map(|s| s.to_string())
        .or_else(|| cfg.tool.as_ref().and_then(|t| t.vs_version.clone()))
        .unwrap_or_else(|| "latest".to_string());
    let arch = cli_arch
        .map(|s| s.to_string())
        .or_else(|| cfg.tool.as_ref().and_then(|t| t.arch.clone()))
        .unwrap_or_else(|| "x86".to_string());

    Effective {
        repo_root,
        output,
        collect_warnings,
        hide_static_analysis,
        encoding,
        flush_trailing,
        vswhere,
        vs_version,
        arch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("dacscan.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "json"
[build]
collect_warnings = true
[stream]
encoding = "gbk"
    "#
        )
        .unwrap();

        // Resolve using explicit repo_root to avoid global CWD races
        let eff = resolve_effective(root.to_str(), None, None, None, None, None, None);
        assert_eq!(eff.output, "json");
        assert!(eff.collect_warnings);
        assert_eq!(eff.encoding, "gbk");
        assert!(!eff.flush_trailing);
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("dacscan.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output: human
tool:
  vs_version: "17.0"
  arch: x64
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, None, None, None, None);
        assert_eq!(eff.output, "human");
        assert_eq!(eff.vs_version, "17.0");
        assert_eq!(eff.arch, "x64");
        // untouched sections fall back to defaults
        assert!(!eff.collect_warnings);
        assert_eq!(eff.encoding, "utf-8");
    }

    #[test]
    fn test_cli_precedence_over_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("dacscan.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "json"
[build]
collect_warnings = true
hide_static_analysis = true
[tool]
vs_version = "16.0"
            "#
        )
        .unwrap();

        let eff = resolve_effective(
            root.to_str(),
            Some("human"),
            Some(false),
            None,
            None,
            Some("latest"),
            None,
        );
        assert_eq!(eff.output, "human");
        assert!(!eff.collect_warnings);
        // CLI left hide_static_analysis alone; config wins
        assert!(eff.hide_static_analysis);
        assert_eq!(eff.vs_version, "latest");
    }

    #[test]
    fn test_collector_options_resolve_encoding() {
        let eff = Effective {
            repo_root: PathBuf::from("."),
            output: "human".into(),
            collect_warnings: true,
            hide_static_analysis: false,
            encoding: "gbk".into(),
            flush_trailing: true,
            vswhere: None,
            vs_version: "latest".into(),
            arch: "x86".into(),
        };
        let opts = eff.collector_options().unwrap();
        assert!(opts.collect_warnings);
        assert!(opts.flush_trailing);

        let bad = Effective {
            encoding: "no-such-encoding".into(),
            ..eff
        };
        assert!(bad.collector_options().is_none());
    }
}
