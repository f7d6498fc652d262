//! Review orchestration — the one place the pipeline is wired together:
//! build prompts, one completion call, defensive interpretation.

use crate::errors::AppError;
use crate::llm_client::CompletionBackend;
use crate::review::interpreter::interpret;
use crate::review::models::{ReviewRequest, ReviewResult};
use crate::review::prompts::{build_user_prompt, SYSTEM_PROMPT};

/// Runs one resume review against the completion backend.
///
/// Blocks the calling request until the remote service responds or errors;
/// there is no retry and no cancellation.
pub async fn review_resume(
    request: &ReviewRequest,
    llm: &dyn CompletionBackend,
) -> Result<ReviewResult, AppError> {
    let user_prompt = build_user_prompt(
        &request.target_role,
        &request.job_description,
        &request.resume_text,
    );

    tracing::debug!(
        "reviewing resume ({} bytes) for role '{}'",
        request.resume_text.len(),
        request.target_role
    );

    let raw = llm
        .complete(SYSTEM_PROMPT, &user_prompt, request.model, true)
        .await?;

    let value = interpret(&raw)?;
    Ok(ReviewResult::from_value(&value))
}
