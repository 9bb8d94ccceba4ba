//! BUILD_RESULT: wire response plus its content-derived ID.

use rec_core::entities::Allocation;
use rec_io::hasher;
use rec_io::wire::RecommendationResponse;

use crate::PipelineError;

/// The response together with its digest (`REC:<hex>` and bare hex).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultArtifact {
    pub id: String,
    pub sha256: String,
    pub response: RecommendationResponse,
}

pub fn build_result(allocation: &Allocation) -> Result<ResultArtifact, PipelineError> {
    let response = RecommendationResponse::from(allocation);
    let id = hasher::rec_id_from_canonical(&response)?;
    let sha256 = id.strip_prefix(hasher::REC_ID_PREFIX).unwrap_or(&id).to_string();
    Ok(ResultArtifact { id, sha256, response })
}
