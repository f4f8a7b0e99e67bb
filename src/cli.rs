//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dacscan",
    version,
    about = "Dacscan (DacFx sqlproj analysis)",
    long_about = "Dacscan — build and scan DacFx .sqlproj projects and convert static code analysis results to SARIF.\n\nConfiguration precedence: CLI > dacscan.toml > defaults.",
    after_help = "Examples:\n  dacscan build --source-path db/db.sqlproj --outfile-path out/db.dacpac\n  dacscan scan --source-path db/db.sqlproj --outfile-path out/report.sarif\n  dacscan convert --source-path out/db.StaticCodeAnalysis.Results.xml\n  dacscan where --target msbuild --arch x64",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for building, scanning, and converting.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current dacscan version.")]
    Version,
    /// Find MSBuild.exe or SqlPackage.exe (Windows with SSDT)
    #[command(
        about = "Locate toolchain binaries",
        long_about = "Find msbuild.exe or sqlpackage.exe via vswhere. The host must be Windows with Visual Studio and SSDT installed.",
        after_help = "Examples:\n  dacscan where\n  dacscan where --target sqlpackage --arch x64"
    )]
    Where {
        #[arg(long, help = "Path to vswhere.exe (default: VS installer location)")]
        vswhere: Option<String>,
        #[arg(long, help = "Visual Studio version (default: latest)")]
        vs_version: Option<String>,
        #[arg(long, help = "Target application: msbuild|sqlpackage (default: msbuild)")]
        target: Option<String>,
        #[arg(long, help = "Application architecture: x86|x64 (default: x86)")]
        arch: Option<String>,
    },
    /// Build a .sqlproj with MSBuild and collect diagnostics
    #[command(
        about = "Build a .sqlproj",
        long_about = "Build the project with MSBuild, classify its output, and copy the produced .dacpac (and optionally the analysis result XML) to the requested destinations.",
        after_help = "Examples:\n  dacscan build --source-path db/db.sqlproj\n  dacscan build --source-path db/db.sqlproj --collect-warnings --outfile-path out/"
    )]
    Build {
        #[arg(long, help = "*.sqlproj file path (required)")]
        source_path: String,
        #[arg(long, help = "Extra MSBuild arguments, without the project file")]
        arguments: Option<String>,
        #[arg(long, help = "Destination for the produced .dacpac (file or directory)")]
        outfile_path: Option<String>,
        #[arg(long, help = "Destination for the static analysis result XML")]
        analysis_result_path: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Collect warnings into the run record")]
        collect_warnings: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Hide static code analysis warnings from the log")]
        hide_static_analysis: bool,
        #[arg(long, help = "Visual Studio version (default: latest)")]
        vs_version: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Build, then convert analysis results to SARIF
    #[command(
        about = "Scan a .sqlproj",
        long_about = "Build the project, then convert every produced static code analysis XML report to SARIF at the requested destination.",
        after_help = "Examples:\n  dacscan scan --source-path db/db.sqlproj\n  dacscan scan --source-path db/db.sqlproj --outfile-path out/report.sarif"
    )]
    Scan {
        #[arg(long, help = "*.sqlproj file path (required)")]
        source_path: String,
        #[arg(long, help = "Extra MSBuild arguments, without the project file")]
        arguments: Option<String>,
        #[arg(long, help = "Destination for the SARIF report(s) (file or directory)")]
        outfile_path: Option<String>,
        #[arg(long, help = "Visual Studio version (default: latest)")]
        vs_version: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Convert an analysis result XML to SARIF
    #[command(
        about = "Convert XML to SARIF",
        long_about = "Convert a DacFx static code analysis result XML file to a SARIF 2.1.0 document. Only the msbuild source format is supported.",
        after_help = "Examples:\n  dacscan convert --source-path results.xml\n  dacscan convert --source-path results.xml --outfile-path report.sarif"
    )]
    Convert {
        #[arg(long, help = "Source XML file path (required)")]
        source_path: String,
        #[arg(long, help = "Target .sarif path (default: sibling of the source)")]
        outfile_path: Option<String>,
        #[arg(long, help = "Source format (only msbuild)")]
        source_format: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
