//! Dacscan CLI binary entry point.
//! Delegates to modules for build/scan/convert/where and prints results.

mod aggregate;
mod classify;
mod cli;
mod config;
mod locate;
mod materialize;
mod models;
mod output;
mod registry;
mod runner;
mod sarif;
mod stream;
mod utils;
mod warnings;
mod xmlreport;

use clap::Parser;
use cli::{Cli, Commands};
use materialize::Destinations;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Where {
            vswhere,
            vs_version,
            target,
            arch,
        } => {
            let eff = config::resolve_effective(
                None,
                None,
                None,
                None,
                vswhere.as_deref(),
                vs_version.as_deref(),
                arch.as_deref(),
            );
            let tool = match locate::ToolKind::parse(target.as_deref().unwrap_or("msbuild")) {
                Some(t) => t,
                None => {
                    eprintln!(
                        "{} {}",
                        utils::error_prefix(),
                        "only msbuild or sqlpackage can be located"
                    );
                    std::process::exit(2);
                }
            };
            let arch = match locate::Arch::parse(&eff.arch) {
                Some(a) => a,
                None => {
                    eprintln!("{} {}", utils::error_prefix(), "only x86 or x64 are supported");
                    std::process::exit(2);
                }
            };
            match locate::locate(&locate::LocateOptions {
                vswhere: eff.vswhere.clone(),
                vs_version: eff.vs_version.clone(),
                tool,
                arch,
            }) {
                Ok(path) => println!("{}", path.to_string_lossy()),
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            }
        }
        Commands::Build {
            source_path,
            arguments,
            outfile_path,
            analysis_result_path,
            collect_warnings,
            hide_static_analysis,
            vs_version,
            output,
        } => {
            let eff = config::resolve_effective(
                None,
                output.as_deref(),
                if collect_warnings { Some(true) } else { None },
                if hide_static_analysis { Some(true) } else { None },
                None,
                vs_version.as_deref(),
                None,
            );
            if config::load_config(&eff.repo_root).is_none() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No dacscan.toml found; using defaults."
                );
            }
            let source = check_source(&source_path, "sqlproj");
            let opts = collector_options(&eff);
            let tool = locate_msbuild(&eff);
            let args = runner::build_args(&source, arguments.as_deref());
            let outcome = match runner::run_tool(&tool, &args, &opts, &mut |l| println!("{}", l)) {
                Ok(o) => o,
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            };
            let dests = Destinations {
                artifact_dest: outfile_path.as_deref().map(absolutize),
                report_dest: analysis_result_path.as_deref().map(absolutize),
                convert_reports: false,
            };
            let (done, errors) = materialize::materialize(&outcome, &dests);
            output::print_run(&outcome, &done, &eff.output);
            if outfile_path.is_none() {
                for p in &outcome.artifact_paths {
                    eprintln!(
                        "{} the dacpac file path: {}",
                        utils::info_prefix(),
                        p.to_string_lossy()
                    );
                }
            }
            for e in &errors {
                eprintln!("{} {}", utils::error_prefix(), e);
            }
            if !outcome.exit_succeeded {
                eprintln!("{} {}", utils::error_prefix(), "the build failed");
                std::process::exit(1);
            }
            if !errors.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Scan {
            source_path,
            arguments,
            outfile_path,
            vs_version,
            output,
        } => {
            let eff = config::resolve_effective(
                None,
                output.as_deref(),
                None,
                None,
                None,
                vs_version.as_deref(),
                None,
            );
            let source = check_source(&source_path, "sqlproj");
            // Scan never records warnings; the SARIF report carries them.
            let mut opts = collector_options(&eff);
            opts.collect_warnings = false;
            let tool = locate_msbuild(&eff);
            let args = runner::build_args(&source, arguments.as_deref());
            let outcome = match runner::run_tool(&tool, &args, &opts, &mut |l| println!("{}", l)) {
                Ok(o) => o,
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            };
            if !outcome.exit_succeeded {
                eprintln!("{} {}", utils::error_prefix(), "the build failed");
                std::process::exit(1);
            }
            if outcome.report_paths.is_empty() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "the static analysis result file was not produced"
                );
                return;
            }
            let (generated, errors) = match outfile_path.as_deref() {
                Some(dest) => {
                    let dests = Destinations {
                        artifact_dest: None,
                        report_dest: Some(absolutize(dest)),
                        convert_reports: true,
                    };
                    let (done, errors) = materialize::materialize(&outcome, &dests);
                    (done.report_paths, errors)
                }
                None => {
                    // No destination: each report converts next to itself.
                    let mut paths = Vec::new();
                    let mut errors = Vec::new();
                    for src in &outcome.report_paths {
                        let dst = src.with_extension("sarif");
                        match materialize::write_report_to(src, &dst) {
                            Ok(p) => paths.push(p),
                            Err(e) => errors.push(e),
                        }
                    }
                    (paths, errors)
                }
            };
            output::print_generated(&generated, &eff.output);
            for e in &errors {
                eprintln!("{} {}", utils::error_prefix(), e);
            }
            if !errors.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Convert {
            source_path,
            outfile_path,
            source_format,
            output,
        } => {
            let eff = config::resolve_effective(None, output.as_deref(), None, None, None, None, None);
            let format = source_format.unwrap_or_else(|| "msbuild".to_string());
            if !format.eq_ignore_ascii_case("msbuild") {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    format!("{} is not a supported source format", format)
                );
                std::process::exit(2);
            }
            let source = check_source(&source_path, "xml");
            let target = match outfile_path.as_deref() {
                Some(t) => {
                    let p = absolutize(t);
                    let is_sarif = p
                        .extension()
                        .map(|e| e.to_string_lossy().eq_ignore_ascii_case("sarif"))
                        .unwrap_or(false);
                    if !is_sarif {
                        eprintln!(
                            "{} {}",
                            utils::error_prefix(),
                            format!("{} extension is not .sarif", t)
                        );
                        std::process::exit(2);
                    }
                    p
                }
                None => source.with_extension("sarif"),
            };
            // Regenerate from scratch; a stale document must not survive.
            let _ = std::fs::remove_file(&target);
            match materialize::write_report_to(&source, &target) {
                Ok(p) => output::print_generated(&[p], &eff.output),
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Validate a source path: extension (case-insensitive, without dot),
/// absolutized, and present on disk. Exits with code 2 otherwise.
fn check_source(path: &str, ext: &str) -> PathBuf {
    let p = PathBuf::from(path);
    let matches = p
        .extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
        .unwrap_or(false);
    if !matches {
        eprintln!(
            "{} {}",
            utils::error_prefix(),
            format!("{} extension is not .{}", path, ext)
        );
        std::process::exit(2);
    }
    let abs = absolutize(path);
    if !abs.exists() {
        eprintln!(
            "{} {}",
            utils::error_prefix(),
            format!("{} does not exist", abs.to_string_lossy())
        );
        std::process::exit(2);
    }
    abs
}

fn absolutize(path: &str) -> PathBuf {
    let p = PathBuf::from(path);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir().unwrap_or_default().join(p)
    }
}

fn collector_options(eff: &config::Effective) -> aggregate::CollectorOptions {
    match eff.collector_options() {
        Some(o) => o,
        None => {
            eprintln!(
                "{} {}",
                utils::error_prefix(),
                format!("unknown stream encoding: {}", eff.encoding)
            );
            std::process::exit(2);
        }
    }
}

fn locate_msbuild(eff: &config::Effective) -> PathBuf {
    let arch = locate::Arch::parse(&eff.arch).unwrap_or(locate::Arch::X86);
    match locate::locate(&locate::LocateOptions {
        vswhere: eff.vswhere.clone(),
        vs_version: eff.vs_version.clone(),
        tool: locate::ToolKind::MsBuild,
        arch,
    }) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            std::process::exit(2);
        }
    }
}
