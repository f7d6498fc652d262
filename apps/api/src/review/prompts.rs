//! Prompt construction for the review pipeline.
//!
//! The expected output structure is embedded in the user prompt as a
//! serialized JSON Schema. The completion service only offers a weak
//! "return a JSON object" mode, so structure is a matter of instruction
//! following — which is why the interpreter stays defensive.

use serde_json::{json, Map, Value};

/// Resume text is truncated to this many characters before it is embedded
/// in the prompt, to bound token cost.
pub const MAX_RESUME_CHARS: usize = 12_000;

/// Sentinel embedded when the target role is blank.
pub const UNKNOWN_ROLE: &str = "Unknown";
/// Sentinel embedded when the job description is blank.
pub const NO_JOB_DESCRIPTION: &str = "(none)";

/// System prompt — persona and style constraints. Static configuration.
pub const SYSTEM_PROMPT: &str = "You are an ATS-savvy resume coach. \
    Be concise, specific, and data-driven. \
    Always prefer bullet points with metrics (%, $, time saved, throughput). \
    Follow early-career norms when appropriate (1 page, clear sections).";

/// The five scoring criteria, in order. The keys double as the required
/// properties of the response's `scores` object.
pub const SCORING_RUBRIC: [(&str, &str); 5] = [
    (
        "keyword_match",
        "Measures how well resume covers skills / keywords from target JD.",
    ),
    (
        "impact_and_metrics",
        "Use of numbers (%, $, time) and outcomes.",
    ),
    (
        "clarity_and_structure",
        "Readable sections, bullet quality, no fluff.",
    ),
    (
        "relevance",
        "Content aligned with target role and domain.",
    ),
    (
        "language_and_tone",
        "Concise, professional, action verbs, tense consistency.",
    ),
];

/// User prompt template. Replace `{schema}`, `{role}`, `{jd}`, `{resume}`
/// before sending.
pub const USER_PROMPT_TEMPLATE: &str = r#"You will review a resume against a target job role and optional job description.

Return STRICT JSON that validates this JSON Schema: {schema}.

Scoring: 1 (poor) to 10 (excellent).

Input:
TARGET ROLE: {role}

JOB DESCRIPTION (optional):
{jd}

RESUME TEXT:
{resume}

Instructions:
1) Fill 'scores' for keyword_match, impact_and_metrics, clarity_and_structure, relevance, language_and_tone.
2) 'top_missing_keywords': 8-15 ATS keywords missing or weak.
3) 'section_feedback': crisp suggestions per section.
4) 'bullet_suggestions': rewrite 4-8 weakest bullets using STAR and metrics.
5) 'final_resume_markdown': produce a role-tailored resume in clean Markdown with sections: SUMMARY, SKILLS, EXPERIENCE, PROJECTS, EDUCATION, CERTIFICATIONS (if any). Use impactful, quantified bullets.
"#;

/// JSON Schema describing the expected review object. Serialized into the
/// prompt text — not structurally enforced anywhere.
pub fn response_schema() -> Value {
    let score_keys: Vec<&str> = SCORING_RUBRIC.iter().map(|(k, _)| *k).collect();
    let mut score_props = Map::new();
    for key in &score_keys {
        score_props.insert((*key).to_string(), json!({"type": "integer"}));
    }

    json!({
        "type": "object",
        "properties": {
            "scores": {
                "type": "object",
                "properties": score_props,
                "required": score_keys
            },
            "top_missing_keywords": {
                "type": "array",
                "items": {"type": "string"}
            },
            "section_feedback": {
                "type": "object",
                "properties": {
                    "summary": {"type": "string"},
                    "experience": {"type": "string"},
                    "projects": {"type": "string"},
                    "skills": {"type": "string"},
                    "education": {"type": "string"}
                }
            },
            "bullet_suggestions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "original": {"type": "string"},
                        "improved": {"type": "string"}
                    }
                }
            },
            "final_resume_markdown": {"type": "string"}
        },
        "required": ["scores", "top_missing_keywords", "section_feedback", "final_resume_markdown"]
    })
}

/// Builds the user prompt from the per-request variables.
///
/// Blank inputs fall back to the sentinels; the resume is trimmed and
/// truncated to `MAX_RESUME_CHARS` characters before embedding.
pub fn build_user_prompt(role: &str, job_description: &str, resume_text: &str) -> String {
    let role = non_blank_or(role, UNKNOWN_ROLE);
    let jd = non_blank_or(job_description, NO_JOB_DESCRIPTION);
    let resume = truncate_chars(resume_text.trim(), MAX_RESUME_CHARS);

    USER_PROMPT_TEMPLATE
        .replace("{schema}", &response_schema().to_string())
        .replace("{role}", role)
        .replace("{jd}", jd)
        .replace("{resume}", resume)
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

/// Truncates to at most `max` characters, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_long_resume_to_exact_limit() {
        let resume = "x".repeat(MAX_RESUME_CHARS + 500);
        let truncated = truncate_chars(&resume, MAX_RESUME_CHARS);
        assert_eq!(truncated.chars().count(), MAX_RESUME_CHARS);
    }

    #[test]
    fn test_truncate_short_resume_untouched() {
        assert_eq!(truncate_chars("short resume", MAX_RESUME_CHARS), "short resume");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        // é is two bytes in UTF-8; a byte-indexed slice at 3 would panic
        let text = "ééééé";
        let truncated = truncate_chars(text, 3);
        assert_eq!(truncated, "ééé");
    }

    #[test]
    fn test_blank_role_uses_unknown_sentinel() {
        let prompt = build_user_prompt("   ", "some JD", "resume body");
        assert!(prompt.contains("TARGET ROLE: Unknown"));
    }

    #[test]
    fn test_blank_jd_uses_none_sentinel() {
        let prompt = build_user_prompt("Backend Engineer", "", "resume body");
        assert!(prompt.contains("(none)"));
    }

    #[test]
    fn test_request_variables_embedded_verbatim() {
        let prompt = build_user_prompt(
            "Backend Engineer",
            "",
            "5 years Python, built APIs",
        );
        assert!(prompt.contains("Backend Engineer"));
        assert!(prompt.contains("(none)"));
        assert!(prompt.contains("5 years Python, built APIs"));
    }

    #[test]
    fn test_prompt_embeds_serialized_schema() {
        let prompt = build_user_prompt("SRE", "jd", "resume");
        assert!(prompt.contains(r#""final_resume_markdown""#));
        assert!(prompt.contains(r#""top_missing_keywords""#));
        assert!(!prompt.contains("{schema}"));
    }

    #[test]
    fn test_no_placeholders_survive_substitution() {
        let prompt = build_user_prompt("SRE", "jd", "resume");
        for placeholder in ["{role}", "{jd}", "{resume}"] {
            assert!(!prompt.contains(placeholder), "{placeholder} left in prompt");
        }
    }

    #[test]
    fn test_oversized_resume_is_cut_in_prompt() {
        let resume = "a".repeat(MAX_RESUME_CHARS + 1);
        let prompt = build_user_prompt("SRE", "jd", &resume);
        assert!(!prompt.contains(&resume));
        assert!(prompt.contains(&"a".repeat(MAX_RESUME_CHARS)));
    }

    #[test]
    fn test_schema_requires_all_rubric_keys() {
        let schema = response_schema();
        let required = schema["properties"]["scores"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(required.len(), SCORING_RUBRIC.len());
        for (key, _) in SCORING_RUBRIC {
            assert!(required.iter().any(|v| v == key), "missing rubric key {key}");
        }
    }

    #[test]
    fn test_schema_top_level_required_fields() {
        let schema = response_schema();
        let required = schema["required"].as_array().unwrap();
        for field in [
            "scores",
            "top_missing_keywords",
            "section_feedback",
            "final_resume_markdown",
        ] {
            assert!(required.iter().any(|v| v == field), "missing {field}");
        }
    }
}
