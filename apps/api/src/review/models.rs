//! Review request/response data model.
//!
//! `ReviewResult` is built from the interpreted JSON by presence checks
//! only: the producer is an instructed LLM, not a schema-enforced boundary,
//! so every missing or mistyped field degrades to an empty default rather
//! than failing the whole review.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::ModelChoice;

/// One review invocation. Created fresh per user action, discarded after
/// rendering; no persistence, no cross-request state.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub resume_text: String,
    #[serde(default)]
    pub target_role: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub model: ModelChoice,
}

/// Scores for the five rubric criteria, nominally 1–10. `None` when the
/// model omitted the key or returned something that is not an integer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RubricScores {
    pub keyword_match: Option<i64>,
    pub impact_and_metrics: Option<i64>,
    pub clarity_and_structure: Option<i64>,
    pub relevance: Option<i64>,
    pub language_and_tone: Option<i64>,
}

impl RubricScores {
    fn from_value(value: Option<&Value>) -> Self {
        let get = |key: &str| value.and_then(|v| v.get(key)).and_then(Value::as_i64);
        Self {
            keyword_match: get("keyword_match"),
            impact_and_metrics: get("impact_and_metrics"),
            clarity_and_structure: get("clarity_and_structure"),
            relevance: get("relevance"),
            language_and_tone: get("language_and_tone"),
        }
    }
}

/// Free-text feedback per resume section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionFeedback {
    pub summary: Option<String>,
    pub experience: Option<String>,
    pub projects: Option<String>,
    pub skills: Option<String>,
    pub education: Option<String>,
}

impl SectionFeedback {
    fn from_value(value: Option<&Value>) -> Self {
        let get = |key: &str| {
            value
                .and_then(|v| v.get(key))
                .and_then(Value::as_str)
                .map(String::from)
        };
        Self {
            summary: get("summary"),
            experience: get("experience"),
            projects: get("projects"),
            skills: get("skills"),
            education: get("education"),
        }
    }
}

/// A weak bullet and its outcome-oriented rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletSuggestion {
    pub original: String,
    pub improved: String,
}

/// The parsed review. Fields the model omitted come back empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub scores: RubricScores,
    pub top_missing_keywords: Vec<String>,
    pub section_feedback: SectionFeedback,
    pub bullet_suggestions: Vec<BulletSuggestion>,
    pub final_resume_markdown: String,
}

impl ReviewResult {
    /// Maps an interpreted JSON object onto the review shape, tolerating
    /// absent or mistyped fields everywhere.
    pub fn from_value(value: &Value) -> Self {
        Self {
            scores: RubricScores::from_value(value.get("scores")),
            top_missing_keywords: string_array(value.get("top_missing_keywords")),
            section_feedback: SectionFeedback::from_value(value.get("section_feedback")),
            bullet_suggestions: bullet_array(value.get("bullet_suggestions")),
            final_resume_markdown: value
                .get("final_resume_markdown")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn bullet_array(value: Option<&Value>) -> Vec<BulletSuggestion> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|item| {
                    let text = |key: &str| {
                        item.get(key)
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string()
                    };
                    let suggestion = BulletSuggestion {
                        original: text("original"),
                        improved: text("improved"),
                    };
                    // An entry with neither side carries no information
                    (!suggestion.original.is_empty() || !suggestion.improved.is_empty())
                        .then_some(suggestion)
                })
                .collect()
        })
        .unwrap_or_default()
}
