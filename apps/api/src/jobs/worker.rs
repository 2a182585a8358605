//! Background job dispatch. Each upload runs on its own tokio task; the job
//! store is the only thing the HTTP side and the workers share.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use super::status::JobState;
use super::store::{JobStore, JobStoreError};
use crate::extraction::router::ProcessingPipeline;
use crate::models::resume::FileResult;

pub const FILE_NOT_FOUND: &str = "File not found";

/// Records the job as pending and starts processing `path` in the background.
pub async fn submit(
    jobs: Arc<dyn JobStore>,
    pipeline: ProcessingPipeline,
    path: PathBuf,
) -> Result<Uuid, JobStoreError> {
    let id = Uuid::new_v4();
    jobs.put(id, &JobState::pending()).await?;

    tokio::spawn(run_job(jobs, pipeline, id, path));
    Ok(id)
}

/// Runs one job to completion and stores its final state. The processing
/// itself runs on an inner task so a panic surfaces as `FAILURE` instead of
/// leaving the job pending forever.
pub async fn run_job(
    jobs: Arc<dyn JobStore>,
    pipeline: ProcessingPipeline,
    id: Uuid,
    path: PathBuf,
) {
    let task_path = path.clone();
    let handle = tokio::spawn(async move { process_file_task(&pipeline, &task_path).await });

    let state = match handle.await {
        Ok(result) => JobState::Success { result },
        Err(e) => {
            error!("Job {id} crashed: {e}");
            remove_upload(&path).await;
            JobState::Failure {
                error: e.to_string(),
            }
        }
    };

    info!("Job {id} finished: {}", state.as_str());
    if let Err(e) = jobs.put(id, &state).await {
        error!("Failed to store result for job {id}: {e}");
    }
}

/// Processes one uploaded file and removes it afterwards.
pub async fn process_file_task(pipeline: &ProcessingPipeline, path: &Path) -> FileResult {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return FileResult::failed(FILE_NOT_FOUND);
    }

    let result = pipeline.handle_upload(path).await;
    remove_upload(path).await;
    result
}

async fn remove_upload(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove upload {}: {e}", path.display()),
    }
}
