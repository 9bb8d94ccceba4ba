//! LOAD stage: turn a validated wire request into domain values.
//!
//! Runs only after `validate` passed, so name and duplicate problems cannot
//! occur here; if they do, the conversion still fails cleanly.

use rec_core::entities::{Inventory, LevelProgress, Progress};
use rec_core::{Level, TopicName};
use rec_io::wire::RecommendationRequest;

use crate::PipelineError;

/// Domain view of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    pub budget: u64,
    pub inventory: Inventory,
    /// `None` when the request carried no progress entries at all.
    pub progress: Option<Progress>,
    pub user_id: Option<u64>,
}

pub fn normalize(req: &RecommendationRequest) -> Result<NormalizedInput, PipelineError> {
    let mut inventory = Inventory::new();
    for t in &req.user_topics {
        let topic = topic_name(&t.topic)?;
        inventory.add_topic(topic.clone());
        for l in &t.available {
            inventory.insert(topic.clone(), Level(l.level), l.count);
        }
    }

    let mut progress = Progress::new();
    for tp in req.progress() {
        let topic = topic_name(&tp.topic)?;
        for rec in &tp.progress_by_level {
            let lp = LevelProgress::new(rec.solved, rec.attempted)
                .map_err(|e| PipelineError::Invalid(format!("{}/{}: {e}", tp.topic, rec.level)))?;
            progress.insert(topic.clone(), Level(rec.level), lp);
        }
    }

    Ok(NormalizedInput {
        budget: req.total_questions,
        inventory,
        progress: if progress.is_empty() { None } else { Some(progress) },
        user_id: req.user_id,
    })
}

fn topic_name(s: &str) -> Result<TopicName, PipelineError> {
    TopicName::new(s).map_err(|e| PipelineError::Invalid(e.to_string()))
}
