//! Axum route handlers for the review API.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::review::models::{ReviewRequest, ReviewResult};
use crate::review::reviewer::review_resume;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub review: ReviewResult,
    /// Suggested filename for saving `review.final_resume_markdown`.
    pub download_filename: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub target_role: String,
    pub markdown: String,
}

/// POST /api/v1/review
///
/// Runs one synchronous review of the supplied resume text. The caller is
/// expected to disable re-triggering until this returns.
pub async fn handle_review(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }

    let llm = state.llm.as_ref().ok_or(AppError::ClientUnavailable)?;

    let review = review_resume(&request, llm.as_ref()).await?;

    Ok(Json(ReviewResponse {
        download_filename: resume_filename(&request.target_role),
        review,
    }))
}

/// POST /api/v1/review/extract
///
/// Accepts a multipart upload with a `file` field carrying PDF bytes and
/// returns the normalized plain text. Pasted resume text skips this
/// endpoint entirely.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let extractor = state
        .extractor
        .as_ref()
        .ok_or(AppError::ExtractionUnavailable)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::Validation("uploaded file is empty".to_string()));
        }
        let text = extractor
            .extract(&bytes)
            .map_err(|e| AppError::ExtractionFailed(e.to_string()))?;
        return Ok(Json(ExtractResponse { text }));
    }

    Err(AppError::Validation(
        "multipart body must contain a 'file' field".to_string(),
    ))
}

/// POST /api/v1/review/download
///
/// Echoes the tailored resume back as a Markdown attachment. Nothing is
/// persisted between requests, so the client supplies the content it wants
/// to save and gets the conventional filename in return.
pub async fn handle_download(Json(request): Json<DownloadRequest>) -> impl IntoResponse {
    let filename = resume_filename(&request.target_role);
    (
        [
            (
                header::CONTENT_TYPE,
                "text/markdown; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        request.markdown,
    )
}

/// Download filename for a tailored resume: role lower-cased, spaces
/// replaced with underscores, anything unsafe for a filename dropped.
pub fn resume_filename(target_role: &str) -> String {
    let slug: String = target_role
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    format!("resume_{slug}.md")
}
