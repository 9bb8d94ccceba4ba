//! crates/rec_pipeline/src/validate.rs
//! Semantic validation of a shape-valid request before any computation.
//! Deterministic outputs; pure integer reasoning.
//!
//! Runs on the raw wire strings so that bad names surface as report issues
//! rather than conversion failures. Errors block the run; warnings are only
//! logged.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use rec_core::ids::TOPIC_NAME_MAX_LEN;
use rec_core::variables::Params;
use rec_io::wire::{RecommendationRequest, TopicAvailability, TopicProgress};

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Where the issue occurred (kept small & deterministic).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityRef {
    Root,
    Budget,
    Topic { topic: String },
    Level { topic: String, level: u32 },
    ProgressTopic { topic: String },
    ProgressLevel { topic: String, level: u32 },
}

/// One validation finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    #[serde(rename = "where")]
    pub where_: EntityRef,
}

/// Deterministic report: pass = (no Error); ordering of issues is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize { self.errors().count() }
}

/// Top-level entry point.
pub fn validate(req: &RecommendationRequest, params: &Params) -> ValidationReport {
    let mut issues: Vec<ValidationIssue> = Vec::new();

    issues.extend(check_budget(req, params));
    issues.extend(check_topics(&req.user_topics));
    issues.extend(check_progress(&req.user_topics, req.progress()));

    sort_issues_stably(&mut issues);

    ValidationReport {
        pass: !issues.iter().any(|i| i.severity == Severity::Error),
        issues,
    }
}

// ------------------------------------------------------------------------------------------------
// Checks
// ------------------------------------------------------------------------------------------------

fn issue(severity: Severity, code: &'static str, message: String, where_: EntityRef) -> ValidationIssue {
    ValidationIssue { severity, code, message, where_ }
}

/// Errors:
/// - "Budget.TooLarge" when `totalQuestions > max_budget`
/// Warnings:
/// - "Request.ZeroBudget", "Request.NoTopics"
fn check_budget(req: &RecommendationRequest, params: &Params) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if req.total_questions > params.max_budget {
        issues.push(issue(
            Severity::Error,
            "Budget.TooLarge",
            format!("totalQuestions {} exceeds max_budget {}", req.total_questions, params.max_budget),
            EntityRef::Budget,
        ));
    }
    if req.total_questions == 0 {
        issues.push(issue(
            Severity::Warning,
            "Request.ZeroBudget",
            "totalQuestions is 0; every count will be 0".into(),
            EntityRef::Budget,
        ));
    }
    if req.user_topics.is_empty() {
        issues.push(issue(
            Severity::Warning,
            "Request.NoTopics",
            "userTopics is empty".into(),
            EntityRef::Root,
        ));
    }
    issues
}

/// Name rules shared by availability and progress topics.
fn check_name(name: &str, where_: EntityRef) -> Option<ValidationIssue> {
    if name.trim().is_empty() {
        return Some(issue(Severity::Error, "Topic.EmptyName", "topic name is empty".into(), where_));
    }
    if name.len() > TOPIC_NAME_MAX_LEN {
        return Some(issue(
            Severity::Error,
            "Topic.NameTooLong",
            format!("topic name is {} bytes (max {TOPIC_NAME_MAX_LEN})", name.len()),
            where_,
        ));
    }
    if name.chars().any(char::is_control) {
        return Some(issue(
            Severity::Error,
            "Topic.InvalidName",
            "topic name contains control characters".into(),
            where_,
        ));
    }
    None
}

/// Errors:
/// - "Topic.EmptyName", "Topic.NameTooLong", "Topic.InvalidName", "Topic.Duplicate", "Level.Duplicate"
/// Warnings:
/// - "Topic.NoLevels", "Topic.NoAvailability"
fn check_topics(topics: &[TopicAvailability]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen_topics = BTreeSet::<&str>::new();

    for t in topics {
        let at_topic = || EntityRef::Topic { topic: t.topic.clone() };
        issues.extend(check_name(&t.topic, at_topic()));

        if !seen_topics.insert(t.topic.as_str()) {
            issues.push(issue(
                Severity::Error,
                "Topic.Duplicate",
                format!("topic {:?} is listed more than once", t.topic),
                at_topic(),
            ));
        }

        if t.available.is_empty() {
            issues.push(issue(Severity::Warning, "Topic.NoLevels", "topic has no levels".into(), at_topic()));
            continue;
        }

        let mut seen_levels = BTreeSet::<u32>::new();
        for l in &t.available {
            if !seen_levels.insert(l.level) {
                issues.push(issue(
                    Severity::Error,
                    "Level.Duplicate",
                    format!("level {} is listed more than once", l.level),
                    EntityRef::Level { topic: t.topic.clone(), level: l.level },
                ));
            }
        }

        if t.available.iter().all(|l| l.count == 0) {
            issues.push(issue(
                Severity::Warning,
                "Topic.NoAvailability",
                "every level has 0 available questions".into(),
                at_topic(),
            ));
        }
    }
    issues
}

/// Errors:
/// - "Progress.Duplicate", "Progress.SolvedExceedsAttempted", plus the name rules
/// Warnings:
/// - "Progress.UnknownTopic", "Progress.UnknownLevel"
fn check_progress(topics: &[TopicAvailability], progress: &[TopicProgress]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let known: BTreeMap<&str, BTreeSet<u32>> = topics
        .iter()
        .map(|t| (t.topic.as_str(), t.available.iter().map(|l| l.level).collect()))
        .collect();

    let mut seen = BTreeSet::<(&str, u32)>::new();
    for tp in progress {
        let at_topic = || EntityRef::ProgressTopic { topic: tp.topic.clone() };
        issues.extend(check_name(&tp.topic, at_topic()));

        let levels = known.get(tp.topic.as_str());
        if levels.is_none() {
            issues.push(issue(
                Severity::Warning,
                "Progress.UnknownTopic",
                format!("progress for topic {:?} which has no availability; ignored", tp.topic),
                at_topic(),
            ));
        }

        for rec in &tp.progress_by_level {
            let at_level = || EntityRef::ProgressLevel { topic: tp.topic.clone(), level: rec.level };
            if !seen.insert((tp.topic.as_str(), rec.level)) {
                issues.push(issue(
                    Severity::Error,
                    "Progress.Duplicate",
                    format!("progress for level {} is listed more than once", rec.level),
                    at_level(),
                ));
            }
            if rec.solved > rec.attempted {
                issues.push(issue(
                    Severity::Error,
                    "Progress.SolvedExceedsAttempted",
                    format!("solved ({}) exceeds attempted ({})", rec.solved, rec.attempted),
                    at_level(),
                ));
            }
            if let Some(lv) = levels {
                if !lv.contains(&rec.level) {
                    issues.push(issue(
                        Severity::Warning,
                        "Progress.UnknownLevel",
                        format!("progress for level {} which has no availability; ignored", rec.level),
                        at_level(),
                    ));
                }
            }
        }
    }
    issues
}

// ------------------------------------------------------------------------------------------------
// Utilities
// ------------------------------------------------------------------------------------------------

fn sort_issues_stably(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| {
        a.code
            .cmp(b.code)
            .then_with(|| a.where_.cmp(&b.where_))
            .then_with(|| a.message.cmp(&b.message))
    });
}
