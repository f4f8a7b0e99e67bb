//! Dacscan core library.
//!
//! This crate exposes programmatic APIs for running an MSBuild build over a
//! DacFx `.sqlproj`, classifying its output stream, converting static code
//! analysis XML reports to SARIF, and materializing produced files.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `stream`: Incremental line splitting over chunked, encoded bytes.
//! - `classify`: Ordered per-line classification of build output.
//! - `warnings`: Structured warning extraction and identity.
//! - `aggregate`: Per-run accumulation and the stream-processing entry.
//! - `registry`: Append-only rule/artifact interning with the SR catalog.
//! - `sarif`: SARIF report assembly with a pluggable level strategy.
//! - `xmlreport`: Analysis-report XML parsing and validation.
//! - `materialize`: Deterministic output naming and concurrent copies.
//! - `runner`: Process launching and output pumping.
//! - `locate`: vswhere-based toolchain discovery.
//! - `output`: Human/JSON printers for run and conversion results.
//! - `models`: Data models for diagnostics, outcomes, and the SARIF schema.
//! - `utils`: Supporting helpers.
pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod config;
pub mod locate;
pub mod materialize;
pub mod models;
pub mod output;
pub mod registry;
pub mod runner;
pub mod sarif;
pub mod stream;
pub mod utils;
pub mod warnings;
pub mod xmlreport;
