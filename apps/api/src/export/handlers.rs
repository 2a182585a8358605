use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::AppError;
use crate::export::writer::{build_csv, ExportEntry};

pub const EXPORT_FILE_NAME: &str = "resumes_export.csv";

/// POST /download-csv
pub async fn handle_download_csv(
    entries: Option<Json<Vec<ExportEntry>>>,
) -> Result<Response, AppError> {
    let entries = match entries {
        Some(Json(entries)) if !entries.is_empty() => entries,
        _ => return Err(AppError::Validation("No data to export".to_string())),
    };

    let csv = build_csv(&entries)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={EXPORT_FILE_NAME}"),
            ),
        ],
        csv,
    )
        .into_response())
}
