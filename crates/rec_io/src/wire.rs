//! Wire format of the recommendation service.
//!
//! Field names are camelCase on the wire. Request types keep raw strings so
//! the pipeline can report empty or duplicate topic names as validation
//! issues instead of parse failures; conversion to `rec_core` types happens
//! after those checks.

use serde::{Deserialize, Serialize};

use rec_core::entities::Allocation;

// ----------------------------- Request -----------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Opaque caller id; only echoed into logs and the run record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    pub total_questions: u64,
    pub user_topics: Vec<TopicAvailability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_progress: Option<Vec<TopicProgress>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicAvailability {
    pub topic: String,
    pub available: Vec<LevelAvailability>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelAvailability {
    pub level: u32,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
    pub topic: String,
    pub progress_by_level: Vec<LevelProgressRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgressRecord {
    pub level: u32,
    pub solved: u64,
    pub attempted: u64,
}

impl RecommendationRequest {
    /// Progress entries, empty when the field was omitted.
    pub fn progress(&self) -> &[TopicProgress] {
        self.user_progress.as_deref().unwrap_or(&[])
    }
}

// ----------------------------- Response -----------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub topics: Vec<TopicRecommendation>,
    pub total_recommended: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRecommendation {
    pub name: String,
    pub recommendations: Vec<LevelRecommendation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRecommendation {
    pub level: u32,
    pub count: u64,
}

impl From<&Allocation> for RecommendationResponse {
    /// Topics ascending by name, levels ascending; zero counts are kept.
    fn from(a: &Allocation) -> Self {
        let topics = a
            .topics()
            .map(|(name, levels)| TopicRecommendation {
                name: name.to_string(),
                recommendations: levels
                    .iter()
                    .map(|(l, &count)| LevelRecommendation { level: l.get(), count })
                    .collect(),
            })
            .collect();
        Self { topics, total_recommended: a.total() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use rec_core::{Level, TopicName};
    use serde_json::json;

    #[test]
    fn request_reads_camel_case_and_optional_progress() {
        let req: RecommendationRequest = serde_json::from_value(json!({
            "userId": 7,
            "totalQuestions": 10,
            "userTopics": [{"topic": "Math", "available": [{"level": 1, "count": 20}]}]
        }))
        .unwrap();
        assert_eq!(req.user_id, Some(7));
        assert_eq!(req.total_questions, 10);
        assert!(req.progress().is_empty());
        assert_eq!(req.user_topics[0].available[0], LevelAvailability { level: 1, count: 20 });
    }

    #[test]
    fn negative_counts_do_not_parse() {
        let r = serde_json::from_value::<RecommendationRequest>(json!({
            "totalQuestions": -1,
            "userTopics": []
        }));
        assert!(r.is_err());
    }

    #[test]
    fn response_shape() {
        let t = |s: &str| s.parse::<TopicName>().unwrap();
        let mut a = Allocation::default();
        a.set(&t("Math"), Level(2), 3);
        a.set(&t("Math"), Level(1), 5);
        a.set(&t("Art"), Level(1), 0);

        let resp = RecommendationResponse::from(&a);
        assert_json_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({
                "topics": [
                    {"name": "Art", "recommendations": [{"level": 1, "count": 0}]},
                    {"name": "Math", "recommendations": [
                        {"level": 1, "count": 5},
                        {"level": 2, "count": 3}
                    ]}
                ],
                "totalRecommended": 8
            })
        );
    }
}
