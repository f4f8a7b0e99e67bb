//! Discovery of the build toolchain on the host.
//!
//! `vswhere.exe` reports the Visual Studio installation path; the tool
//! binaries live at fixed offsets below it. SqlPackage additionally falls
//! back to the standalone DAC framework install under Program Files.
//! Discovery is Windows-only at runtime; other hosts get a typed error so
//! the rest of the pipeline stays portable.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("tool discovery requires a Windows host")]
    NotWindows,
    #[error("vswhere.exe not found at {0}")]
    VsWhereMissing(PathBuf),
    #[error("failed to run vswhere: {0}")]
    VsWhere(#[from] std::io::Error),
    #[error("vswhere reported no matching Visual Studio installation")]
    NoInstallation,
    #[error("{tool} not found under {root}")]
    ToolMissing { tool: &'static str, root: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    MsBuild,
    SqlPackage,
}

impl ToolKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "msbuild" => Some(ToolKind::MsBuild),
            "sqlpackage" => Some(ToolKind::SqlPackage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86,
    X64,
}

impl Arch {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x86" => Some(Arch::X86),
            "x64" => Some(Arch::X64),
            _ => None,
        }
    }
}

pub struct LocateOptions {
    pub vswhere: Option<PathBuf>,
    pub vs_version: String,
    pub tool: ToolKind,
    pub arch: Arch,
}

/// Find the requested tool binary, or a typed error explaining why not.
pub fn locate(opts: &LocateOptions) -> Result<PathBuf, LocateError> {
    if !cfg!(windows) {
        return Err(LocateError::NotWindows);
    }
    let vswhere = opts.vswhere.clone().unwrap_or_else(default_vswhere);
    if !vswhere.exists() {
        return Err(LocateError::VsWhereMissing(vswhere));
    }
    let installation = installation_path(&vswhere, &opts.vs_version)?;
    match opts.tool {
        ToolKind::MsBuild => {
            let path = msbuild_path(&installation, opts.arch);
            if path.exists() {
                Ok(path)
            } else {
                Err(LocateError::ToolMissing {
                    tool: "MSBuild.exe",
                    root: installation,
                })
            }
        }
        ToolKind::SqlPackage => {
            let path = sqlpackage_path(&installation);
            if path.exists() {
                return Ok(path);
            }
            if let Some(fallback) = sqlpackage_fallback() {
                return Ok(fallback);
            }
            Err(LocateError::ToolMissing {
                tool: "SqlPackage.exe",
                root: installation,
            })
        }
    }
}

fn default_vswhere() -> PathBuf {
    let pf86 = std::env::var_os("ProgramFiles(x86)")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Program Files (x86)"));
    pf86.join("Microsoft Visual Studio")
        .join("Installer")
        .join("vswhere.exe")
}

/// Ask vswhere for the installation path, honoring a pinned version.
fn installation_path(vswhere: &Path, vs_version: &str) -> Result<PathBuf, LocateError> {
    let mut cmd = Command::new(vswhere);
    cmd.args([
        "-products",
        "*",
        "-requires",
        "Microsoft.Component.MSBuild",
        "-property",
        "installationPath",
        "-latest",
    ]);
    if vs_version != "latest" {
        cmd.args(["-version", vs_version]);
    }
    let output = cmd.output()?;
    let reported = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if reported.is_empty() {
        return Err(LocateError::NoInstallation);
    }
    Ok(PathBuf::from(reported))
}

fn msbuild_path(installation: &Path, arch: Arch) -> PathBuf {
    match arch {
        Arch::X64 => installation.join(r"MSBuild\Current\Bin\amd64\MSBuild.exe"),
        Arch::X86 => installation.join(r"MSBuild\Current\Bin\MSBuild.exe"),
    }
}

fn sqlpackage_path(installation: &Path) -> PathBuf {
    installation.join(r"Common7\IDE\Extensions\Microsoft\SQLDB\DAC\SqlPackage.exe")
}

/// Probe the standalone DAC framework installs, newest version first.
fn sqlpackage_fallback() -> Option<PathBuf> {
    let pf = std::env::var_os("ProgramFiles")?;
    let pattern = format!(
        "{}/Microsoft SQL Server/*/DAC/SqlPackage.exe",
        PathBuf::from(pf).to_string_lossy()
    );
    glob::glob(&pattern)
        .ok()?
        .filter_map(|e| e.ok())
        .max()
        .filter(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msbuild_path_per_arch() {
        let base = Path::new(r"C:\VS");
        assert!(msbuild_path(base, Arch::X64)
            .to_string_lossy()
            .contains("amd64"));
        assert!(!msbuild_path(base, Arch::X86)
            .to_string_lossy()
            .contains("amd64"));
    }

    #[test]
    fn test_tool_and_arch_parsing() {
        assert_eq!(ToolKind::parse("MSBuild"), Some(ToolKind::MsBuild));
        assert_eq!(ToolKind::parse("sqlpackage"), Some(ToolKind::SqlPackage));
        assert_eq!(ToolKind::parse("sqlcmd"), None);
        assert_eq!(Arch::parse("X64"), Some(Arch::X64));
        assert_eq!(Arch::parse("arm64"), None);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_locate_rejects_non_windows_host() {
        let err = locate(&LocateOptions {
            vswhere: None,
            vs_version: "latest".into(),
            tool: ToolKind::MsBuild,
            arch: Arch::X86,
        })
        .unwrap_err();
        assert!(matches!(err, LocateError::NotWindows));
    }
}
