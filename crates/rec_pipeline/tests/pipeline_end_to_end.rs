use rec_core::variables::{Params, WeightingRule};
use rec_io::loader::parse_request_bytes;
use rec_pipeline::{run, run_verified, validate_request, PipelineError, Severity};
use serde_json::json;

fn request(v: serde_json::Value) -> rec_io::wire::RecommendationRequest {
    parse_request_bytes(v.to_string().as_bytes()).unwrap()
}

#[test]
fn recommends_by_mastery() {
    let req = request(json!({
        "userId": 1,
        "totalQuestions": 10,
        "userTopics": [
            {"topic": "Math", "available": [{"level": 1, "count": 20}, {"level": 2, "count": 15}]},
            {"topic": "Biology", "available": [{"level": 1, "count": 10}]}
        ],
        "userProgress": [
            {"topic": "Math", "progressByLevel": [{"level": 1, "solved": 9, "attempted": 10}]}
        ]
    }));
    let out = run(&req, &Params::default()).unwrap();
    assert_eq!(out.response.total_recommended, 10);

    let names: Vec<&str> = out.response.topics.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Biology", "Math"]);

    // weights: Biology 10, Math/1 20 × 0.1 = 2, Math/2 15 → 10 × {10, 2, 15}/27
    let counts: Vec<u64> = out
        .response
        .topics
        .iter()
        .flat_map(|t| t.recommendations.iter().map(|r| r.count))
        .collect();
    assert_eq!(counts, vec![4, 1, 5]);
    assert!(out.result_id.starts_with("REC:"));
    assert!(out.run_record.id.starts_with("RUN:"));
    assert_eq!(out.run_record.body.user_id, Some(1));
}

#[test]
fn validation_errors_stop_the_run() {
    let req = request(json!({
        "totalQuestions": 5,
        "userTopics": [
            {"topic": "Math", "available": [{"level": 1, "count": 2}]},
            {"topic": "Math", "available": [{"level": 2, "count": 2}]}
        ]
    }));
    match run(&req, &Params::default()) {
        Err(PipelineError::Validation(report)) => {
            assert!(!report.pass);
            assert!(report.errors().any(|i| i.code == "Topic.Duplicate"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn warnings_do_not_block() {
    let req = request(json!({"totalQuestions": 0, "userTopics": []}));
    let report = validate_request(&req, &Params::default());
    assert!(report.pass);
    assert!(report.issues.iter().all(|i| i.severity == Severity::Warning));

    let out = run(&req, &Params::default()).unwrap();
    assert_eq!(out.response.total_recommended, 0);
    assert!(out.response.topics.is_empty());
}

#[test]
fn weighting_changes_outcome_and_record() {
    let req = request(json!({
        "totalQuestions": 4,
        "userTopics": [{"topic": "Math", "available": [{"level": 1, "count": 30}, {"level": 2, "count": 2}]}]
    }));
    let even = Params { weighting: WeightingRule::Even, ..Params::default() };
    let out = run(&req, &even).unwrap();
    let counts: Vec<u64> = out.response.topics[0].recommendations.iter().map(|r| r.count).collect();
    assert_eq!(counts, vec![2, 2]);
    assert_eq!(out.run_record.body.weighting, "even");

    let plain = run(&req, &Params::default()).unwrap();
    assert_ne!(plain.run_record.id, out.run_record.id);
}

#[test]
fn verified_run_matches_single_run() {
    let req = request(json!({
        "totalQuestions": 11,
        "userTopics": [
            {"topic": "Physics", "available": [{"level": 1, "count": 10}]},
            {"topic": "Chemistry", "available": [{"level": 1, "count": 10}]}
        ]
    }));
    let a = run_verified(&req, &Params::default()).unwrap();
    let b = run(&req, &Params::default()).unwrap();
    assert_eq!(a.response, b.response);
    assert_eq!(a.run_record, b.run_record);
    assert_eq!(a.response.topics[0].name, "Chemistry");
    assert_eq!(a.response.topics[0].recommendations[0].count, 6);
}

#[test]
fn oversized_budget_is_rejected_before_allocation() {
    let req = request(json!({
        "totalQuestions": 18446744073709551615u64,
        "userTopics": [{"topic": "Math", "available": [{"level": 1, "count": 18446744073709551615u64}]}]
    }));
    assert!(matches!(run(&req, &Params::default()), Err(PipelineError::Validation(_))));
}
