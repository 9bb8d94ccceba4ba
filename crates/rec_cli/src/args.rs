// crates/rec_cli/src/args.rs
//
// Deterministic, offline CLI argument parsing.
//
// - No networked paths (reject any scheme:// like http/https/file)
// - `recommend` needs --request; --params, --out and the overrides are optional
// - --mastery-floor is a plain decimal in (0, 1], converted to ppm without floats
// - --validate-only runs schema + semantic checks without allocating

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use rec_core::variables::WeightingRule;
use rec_core::Ppm;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "rec",
    version,
    disable_help_subcommand = true,
    about = "Offline, deterministic question recommendation engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Allocate a question budget across topics and levels.
    Recommend(RecommendArgs),
    /// Print a liveness document and exit.
    Health,
}

#[derive(Debug, Args, Clone)]
pub struct RecommendArgs {
    /// Recommendation request JSON path.
    #[arg(long)]
    pub request: PathBuf,

    /// Parameter JSON path (weighting, mastery_floor_ppm, max_budget).
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Weighting rule override: mastery | availability | even.
    #[arg(long, value_parser = parse_weighting)]
    pub weighting: Option<WeightingRule>,

    /// Mastery floor override as a decimal in (0, 1], e.g. 0.25.
    #[arg(long, value_parser = parse_mastery_floor)]
    pub mastery_floor: Option<Ppm>,

    /// Directory for recommendation.json and run_record.json.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Validate inputs only (schema + semantic checks), do not allocate.
    #[arg(long)]
    pub validate_only: bool,

    /// Run the allocation twice and require byte-identical outputs.
    #[arg(long)]
    pub verify_determinism: bool,

    /// Only log warnings and errors.
    #[arg(long)]
    pub quiet: bool,
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
    NotAFile(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            NotAFile(p) => write!(f, "not a regular file: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

pub fn parse_weighting(s: &str) -> Result<WeightingRule, String> {
    s.trim().parse::<WeightingRule>()
}

/// Decimal in (0, 1] → ppm. Zero is refused here so the allocator never sees it.
pub fn parse_mastery_floor(s: &str) -> Result<Ppm, String> {
    let p = Ppm::parse_decimal(s).map_err(|e| e.to_string())?;
    if p == Ppm::ZERO {
        return Err("mastery floor must be greater than 0".into());
    }
    Ok(p)
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

/// Ensure a path is local (no scheme) and exists as a regular file.
fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotAFile(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Cli, CliError> {
    let cli = Cli::parse();
    if let Command::Recommend(a) = &cli.command {
        validate_recommend(a)?;
    }
    Ok(cli)
}

fn validate_recommend(a: &RecommendArgs) -> Result<(), CliError> {
    ensure_local_exists(&a.request, "--request")?;
    if let Some(p) = &a.params {
        ensure_local_exists(p, "--params")?;
    }
    if let Some(out) = &a.out {
        ensure_local_path(out)?;
    }
    Ok(())
}
