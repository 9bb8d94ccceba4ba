// crates/rec_pipeline/src/build_run_record.rs
//
// RunRecord: a small provenance document for one run.
//
// - Request / params digests are SHA-256 over their canonical JSON.
// - Result digest is the same one behind the `REC:` id.
// - Run ID = SHA-256 of the canonical record **without** its `id` field.
// - No wall-clock timestamp, so re-running identical inputs reproduces the
//   record byte for byte.

use serde::{Deserialize, Serialize};

use rec_core::variables::Params;
use rec_io::hasher;
use rec_io::wire::RecommendationRequest;

use crate::build_result::ResultArtifact;
use crate::load::NormalizedInput;
use crate::{EngineMeta, PipelineError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecordDoc {
    pub id: String,
    #[serde(flatten)]
    pub body: RunRecordBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecordBody {
    pub engine: EngineMeta,
    pub allocator: String,
    pub weighting: String,
    pub mastery_floor_ppm: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    pub inputs: RunInputs,
    pub outputs: RunOutputs,
    pub totals: RunTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInputs {
    pub request_sha256: String,
    pub params_sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutputs {
    pub recommendation_id: String,
    pub recommendation_sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub budget: u64,
    /// String so totals above 2^53 survive JSON readers that use doubles.
    pub available: String,
    pub recommended: u64,
    pub topics: usize,
    pub entries: usize,
}

pub struct RunRecordInputs<'a> {
    pub engine: &'a EngineMeta,
    pub allocator: &'a str,
    pub request: &'a RecommendationRequest,
    pub params: &'a Params,
    pub input: &'a NormalizedInput,
    pub result: &'a ResultArtifact,
}

pub fn build_run_record(src: RunRecordInputs<'_>) -> Result<RunRecordDoc, PipelineError> {
    let body = RunRecordBody {
        engine: src.engine.clone(),
        allocator: src.allocator.to_string(),
        weighting: src.params.weighting.as_token().to_string(),
        mastery_floor_ppm: src.params.mastery_floor_ppm,
        user_id: src.input.user_id,
        inputs: RunInputs {
            request_sha256: hasher::sha256_canonical(src.request)?,
            params_sha256: hasher::sha256_canonical(src.params)?,
        },
        outputs: RunOutputs {
            recommendation_id: src.result.id.clone(),
            recommendation_sha256: src.result.sha256.clone(),
        },
        totals: RunTotals {
            budget: src.input.budget,
            available: src.input.inventory.total_available().to_string(),
            recommended: src.result.response.total_recommended,
            topics: src.input.inventory.topic_count(),
            entries: src.input.inventory.entry_count(),
        },
    };
    let id = hasher::run_id_from_canonical(&body)?;
    Ok(RunRecordDoc { id, body })
}
