use axum::{extract::State, Json};
use serde_json::Value;

use crate::errors::AppError;
use crate::matching::jd_match::{apply_match_scores, MatchJdRequest};
use crate::state::AppState;

/// POST /match-jd
pub async fn handle_match_jd(
    State(state): State<AppState>,
    req: Option<Json<MatchJdRequest>>,
) -> Result<Json<Vec<Value>>, AppError> {
    let (mut resumes, jd_text) = match req {
        Some(Json(MatchJdRequest { resumes, jd_text }))
            if !resumes.is_empty() && !jd_text.is_empty() =>
        {
            (resumes, jd_text)
        }
        _ => return Err(AppError::Validation("Missing data".to_string())),
    };

    apply_match_scores(&mut resumes, &jd_text, state.fit_scorer.as_ref());
    Ok(Json(resumes))
}
