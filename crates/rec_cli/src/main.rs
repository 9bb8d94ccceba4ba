// crates/rec_cli/src/main.rs
//
// Wires up: exit codes, typed error mapping, logging, CLI parsing, the
// validate-only short-circuit, the run path and artifact writing.
// Stdout carries only machine-readable JSON; logs and errors go to stderr.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const SELF_VERIFY: i32 = 3;
    pub const IO: i32 = 4;
    pub const SPEC: i32 = 5;
}

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use serde_json::json;
use tracing_subscriber::EnvFilter;

use args::{parse_and_validate as parse_cli, Command, RecommendArgs};

use rec_core::variables::Params;
use rec_io::{canonical_json, loader, IoError};
use rec_pipeline::{PipelineError, PipelineOutputs, ValidationReport};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Schema / JSON shape / semantic checks / parameter domains
    Validation(String),
    /// Determinism re-run mismatch
    SelfVerify(String),
    /// I/O errors (read/write/path/limits)
    Io(String),
    /// Allocation failures and broken invariants
    Spec(String),
}

impl fmt::Display for MainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::SelfVerify(m) => write!(f, "self-verify: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Spec(m) => write!(f, "allocation: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let cli = match parse_cli() {
        Ok(c) => c,
        // clap exits with 2 on usage errors itself; what reaches here is a path problem
        Err(e) => {
            eprintln!("rec: error: {e}");
            return ExitCode::from(exitcodes::IO as u8);
        }
    };

    let rc = match &cli.command {
        Command::Health => match health() {
            Ok(()) => exitcodes::OK,
            Err(e) => report(&e),
        },
        Command::Recommend(a) => {
            init_tracing(a.quiet);
            match recommend(a) {
                Ok(()) => exitcodes::OK,
                Err(e) => report(&e),
            }
        }
    };

    ExitCode::from(rc as u8)
}

/// `REC_LOG` wins unless `--quiet`; default `rec=info`. Everything goes to stderr.
fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("rec=warn")
    } else {
        EnvFilter::try_from_env("REC_LOG").unwrap_or_else(|_| EnvFilter::new("rec=info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn report(e: &MainError) -> i32 {
    eprintln!("rec: error: {e}");
    map_error(e)
}

/// Map typed errors to the exit-code table.
fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::SelfVerify(_) => SELF_VERIFY,
        MainError::Io(_) => IO,
        MainError::Spec(_) => SPEC,
    }
}

fn health() -> Result<(), MainError> {
    let doc = json!({
        "service": "recommendation-service",
        "status": "healthy",
        "version": rec_pipeline::engine_identifiers().version,
    });
    print_canonical(&doc)
}

fn recommend(a: &RecommendArgs) -> Result<(), MainError> {
    let params = resolve_params(a)?;
    let request = loader::load_request(&a.request).map_err(map_io_err)?;

    if a.validate_only {
        let report = rec_pipeline::validate_request(&request, &params);
        print_canonical(&report)?;
        return if report.pass {
            Ok(())
        } else {
            Err(validation_failure(&report))
        };
    }

    let outs = if a.verify_determinism {
        rec_pipeline::run_verified(&request, &params)
    } else {
        rec_pipeline::run(&request, &params)
    }
    .map_err(map_pipeline_err)?;

    if let Some(dir) = &a.out {
        write_artifacts(dir, &outs)?;
    }
    print_canonical(&outs.response)
}

/// Params file (or defaults) with CLI overrides applied, domains re-checked.
fn resolve_params(a: &RecommendArgs) -> Result<Params, MainError> {
    let mut params = match &a.params {
        Some(p) => loader::load_params(p).map_err(map_io_err)?,
        None => Params::default(),
    };
    if let Some(w) = a.weighting {
        params.weighting = w;
    }
    if let Some(f) = a.mastery_floor {
        params.mastery_floor_ppm = f.get();
    }
    params.validate_domains().map_err(|e| MainError::Validation(e.to_string()))?;
    Ok(params)
}

fn write_artifacts(out_dir: &Path, outs: &PipelineOutputs) -> Result<(), MainError> {
    let to_value = |v: serde_json::Result<serde_json::Value>| v.map_err(|e| MainError::Spec(e.to_string()));

    let rec_path = out_dir.join("recommendation.json");
    canonical_json::write_canonical_file(&rec_path, &to_value(serde_json::to_value(&outs.response))?)
        .map_err(map_io_err)?;

    let run_path = out_dir.join("run_record.json");
    canonical_json::write_canonical_file(&run_path, &to_value(serde_json::to_value(&outs.run_record))?)
        .map_err(map_io_err)?;

    tracing::info!(dir = %out_dir.display(), "artifacts written");
    Ok(())
}

fn print_canonical<T: serde::Serialize>(v: &T) -> Result<(), MainError> {
    let bytes = canonical_json::to_canonical_bytes(v).map_err(map_io_err)?;
    let mut out = std::io::stdout().lock();
    out.write_all(&bytes)
        .and_then(|_| out.write_all(b"\n"))
        .and_then(|_| out.flush())
        .map_err(|e| MainError::Io(format!("stdout: {e}")))
}

fn validation_failure(report: &ValidationReport) -> MainError {
    for i in report.errors() {
        eprintln!("rec: {} {:?}: {}", i.code, i.where_, i.message);
    }
    MainError::Validation(format!("{} error(s)", report.error_count()))
}

/// Translate rec_io::IoError into MainError buckets for exit-code mapping.
fn map_io_err(e: IoError) -> MainError {
    use IoError::*;
    match e {
        Schema { pointer, msg } => MainError::Validation(format!("schema {pointer}: {msg}")),
        Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        Domain(m) => MainError::Validation(format!("params: {m}")),

        Read(m) => MainError::Io(format!("read: {m}")),
        Write(m) => MainError::Io(format!("write: {m}")),
        Path(m) => MainError::Io(format!("path: {m}")),
        Limit(m) => MainError::Io(format!("limit: {m}")),
    }
}

/// Translate rec_pipeline::PipelineError into MainError buckets.
fn map_pipeline_err(e: PipelineError) -> MainError {
    use PipelineError::*;
    match e {
        Validation(report) => validation_failure(&report),
        Invalid(m) => MainError::Validation(m),
        Io(e) => map_io_err(e),
        SelfVerify(m) => MainError::SelfVerify(m),
        e @ (Allocate(_) | Invariant(_)) => MainError::Spec(e.to_string()),
    }
}
