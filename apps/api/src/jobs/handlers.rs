use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::status::JobState;
use crate::jobs::worker::submit;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Serialize)]
pub struct UploadAccepted {
    pub task_id: Uuid,
}

/// POST /upload
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadAccepted>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .and_then(safe_file_name)
            .ok_or_else(|| AppError::Validation("No selected file".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        tokio::fs::create_dir_all(&state.config.upload_dir).await?;
        let path = state
            .config
            .upload_dir
            .join(format!("{}_{file_name}", Uuid::new_v4()));
        tokio::fs::write(&path, &bytes).await?;
        info!("Saved upload {} ({} bytes)", path.display(), bytes.len());

        let task_id = submit(Arc::clone(&state.jobs), state.pipeline.clone(), path).await?;
        return Ok((StatusCode::ACCEPTED, Json(UploadAccepted { task_id })));
    }

    Err(AppError::Validation("No file part".to_string()))
}

/// Final path component of a client-supplied name, if any.
fn safe_file_name(name: &str) -> Option<String> {
    FsPath::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// GET /status/:task_id
/// Ids the store has never seen report as pending, malformed ones included.
pub async fn handle_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<JobState>, AppError> {
    let Ok(id) = Uuid::parse_str(&task_id) else {
        return Ok(Json(JobState::pending()));
    };
    let job = state.jobs.get(id).await?.unwrap_or_else(JobState::pending);
    Ok(Json(job))
}

/// POST /reset
/// Wipes every uploaded file, including ones still waiting to be processed.
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let dir = &state.config.upload_dir;
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    tokio::fs::create_dir_all(dir).await?;
    info!("Upload directory {} cleared", dir.display());
    Ok(Json(json!({"status": "cleared"})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name_strips_directories() {
        assert_eq!(safe_file_name("cv.pdf").as_deref(), Some("cv.pdf"));
        assert_eq!(safe_file_name("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(safe_file_name("dir/Résumé.docx").as_deref(), Some("Résumé.docx"));
        assert_eq!(safe_file_name(""), None);
        assert_eq!(safe_file_name(".."), None);
    }
}
