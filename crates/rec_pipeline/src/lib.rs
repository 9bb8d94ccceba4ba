//! rec_pipeline — deterministic pipeline surface (validate → load → allocate → build result → build run record).
//! This crate stays I/O-free and delegates JSON/hashing to `rec_io` and math to `rec_algo`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use rec_algo::{AllocError, Allocator, LargestRemainderAllocator};
use rec_core::variables::Params;
use rec_io::canonical_json;
use rec_io::wire::{RecommendationRequest, RecommendationResponse};
use rec_io::IoError;

pub mod allocate;
pub mod build_result;
pub mod build_run_record;
pub mod load;
pub mod validate;

pub use build_run_record::RunRecordDoc;
pub use validate::{Severity, ValidationIssue, ValidationReport};

/// Engine identifiers recorded in every run record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        vendor: "rec".to_string(),
        name: "recommendation-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: "dev".to_string(),
    }
}

/// Single error surface for the pipeline orchestration.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Semantic validation failed; the report lists every issue.
    #[error("validation failed with {} error(s)", .0.error_count())]
    Validation(ValidationReport),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("allocation failed: {0}")]
    Allocate(#[from] AllocError),

    /// The allocator returned something that breaks its contract.
    #[error("allocation invariant violated: {0}")]
    Invariant(String),

    /// Two runs over identical inputs disagreed.
    #[error("self-verification failed: {0}")]
    SelfVerify(String),
}

/// Top-level pipeline outputs.
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub response: RecommendationResponse,
    pub result_id: String,
    pub run_record: RunRecordDoc,
    pub report: ValidationReport,
}

// -------------------------------------- Public API --------------------------------------

/// Semantic checks only; never allocates.
pub fn validate_request(req: &RecommendationRequest, params: &Params) -> ValidationReport {
    let report = validate::validate(req, params);
    for w in report.warnings() {
        warn!(code = w.code, message = %w.message, "validation warning");
    }
    report
}

/// Run the whole pipeline once with the allocator described by `params`.
pub fn run(req: &RecommendationRequest, params: &Params) -> Result<PipelineOutputs, PipelineError> {
    let allocator = LargestRemainderAllocator::from_params(params)?;
    run_with(&allocator, req, params)
}

/// Run with an explicit allocator (any `Allocator` implementation).
pub fn run_with(
    allocator: &dyn Allocator,
    req: &RecommendationRequest,
    params: &Params,
) -> Result<PipelineOutputs, PipelineError> {
    info!(
        user_id = req.user_id,
        budget = req.total_questions,
        topics = req.user_topics.len(),
        weighting = params.weighting.as_token(),
        "request received"
    );

    // VALIDATE
    let report = validate_request(req, params);
    if !report.pass {
        return Err(PipelineError::Validation(report));
    }

    // LOAD
    let input = load::normalize(req)?;

    // ALLOCATE
    let allocation = allocate::allocate_stage(allocator, &input)?;

    // BUILD_RESULT
    let result = build_result::build_result(&allocation)?;

    // BUILD_RUN_RECORD
    let run_record = build_run_record::build_run_record(build_run_record::RunRecordInputs {
        engine: &engine_identifiers(),
        allocator: allocator.name(),
        request: req,
        params,
        input: &input,
        result: &result,
    })?;

    Ok(PipelineOutputs {
        response: result.response,
        result_id: result.id,
        run_record,
        report,
    })
}

/// Run twice and require byte-identical canonical outputs.
pub fn run_verified(req: &RecommendationRequest, params: &Params) -> Result<PipelineOutputs, PipelineError> {
    let first = run(req, params)?;
    let second = run(req, params)?;

    let same_response = canonical_json::to_canonical_bytes(&first.response)?
        == canonical_json::to_canonical_bytes(&second.response)?;
    let same_record = canonical_json::to_canonical_bytes(&first.run_record)?
        == canonical_json::to_canonical_bytes(&second.run_record)?;

    if !same_response {
        return Err(PipelineError::SelfVerify("recommendation bytes differ between runs".into()));
    }
    if !same_record {
        return Err(PipelineError::SelfVerify("run record bytes differ between runs".into()));
    }
    info!(result_id = %first.result_id, "determinism verified");
    Ok(first)
}
