pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::export::handlers as export;
use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::state::AppState;

/// Largest accepted request body (uploads included).
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Upload jobs
        .route("/upload", post(jobs::handle_upload))
        .route("/status/:task_id", get(jobs::handle_status))
        .route("/reset", post(jobs::handle_reset))
        // Client-held results
        .route("/download-csv", post(export::handle_download_csv))
        .route("/match-jd", post(matching::handle_match_jd))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::cleaning::Lexicon;
    use crate::config::Config;
    use crate::extraction::router::{ProcessingPipeline, UNSUPPORTED_FORMAT};
    use crate::jobs::status::JobState;
    use crate::jobs::store::InMemoryJobStore;
    use crate::matching::fit_scoring::KeywordOverlapScorer;

    const BOUNDARY: &str = "X-TEST-BOUNDARY";

    fn test_state(upload_dir: &std::path::Path) -> AppState {
        AppState {
            config: Config {
                gemini_api_key: None,
                redis_url: "redis://localhost:6379/0".to_string(),
                upload_dir: upload_dir.to_path_buf(),
                dictionary_path: None,
                blind_mode: false,
                job_ttl_secs: 60,
                port: 0,
                rust_log: "info".to_string(),
            },
            pipeline: ProcessingPipeline::new(Arc::new(Lexicon::standard()), None, false),
            jobs: Arc::new(InMemoryJobStore::new()),
            fit_scorer: Arc::new(KeywordOverlapScorer::default()),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(field: &str, file_name: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::post("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(test_state(dir.path()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "cv-extractor");
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(test_state(dir.path()))
            .oneshot(multipart_request("attachment", "cv.pdf", "x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["message"], "No file part");
    }

    #[tokio::test]
    async fn test_upload_with_empty_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(test_state(dir.path()))
            .oneshot(multipart_request("file", "", "x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "No selected file"
        );
    }

    #[tokio::test]
    async fn test_upload_then_poll_status() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let jobs = Arc::clone(&state.jobs);
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(multipart_request("file", "notes.txt", "hello"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let task_id = body_json(response).await["task_id"]
            .as_str()
            .unwrap()
            .to_string();
        let id = Uuid::parse_str(&task_id).unwrap();

        for _ in 0..50 {
            if jobs.get(id).await.unwrap().is_some_and(|s| s.is_finished()) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        let response = app
            .oneshot(
                Request::get(format!("/status/{task_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"state": "SUCCESS", "result": {"error": UNSUPPORTED_FORMAT}})
        );
        // The worker removes the saved upload.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_task_is_pending() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(test_state(dir.path()))
            .oneshot(
                Request::get(format!("/status/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            body_json(response).await,
            json!({"state": "PENDING", "status": "Processing..."})
        );
    }

    #[tokio::test]
    async fn test_stored_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let id = Uuid::new_v4();
        state
            .jobs
            .put(
                id,
                &JobState::Failure {
                    error: "worker crashed".to_string(),
                },
            )
            .await
            .unwrap();

        let response = build_router(state)
            .oneshot(
                Request::get(format!("/status/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            json!({"state": "FAILURE", "error": "worker crashed"})
        );
    }

    #[tokio::test]
    async fn test_malformed_task_id_is_pending() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(test_state(dir.path()))
            .oneshot(Request::get("/status/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"state": "PENDING", "status": "Processing..."})
        );
    }

    #[tokio::test]
    async fn test_download_csv() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(test_state(dir.path()))
            .oneshot(json_request(
                "/download-csv",
                json!([
                    {"file_name": "a.pdf", "data": {"metadata": {"name": "Ada"}, "content": {}}},
                    {"file_name": "b.txt", "data": {"error": "bad"}}
                ]),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=resumes_export.csv"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("File Name,Name,Email,Phone,Detected Skills,"));
        assert!(text.contains("a.pdf,Ada,,,,\r\n"));
        assert!(text.contains("b.txt,ERROR: bad,,,,\r\n"));
    }

    #[tokio::test]
    async fn test_download_csv_without_data() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));

        let response = app
            .clone()
            .oneshot(json_request("/download-csv", json!([])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "No data to export"
        );

        let response = app
            .oneshot(Request::post("/download-csv").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_match_jd_injects_scores() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(test_state(dir.path()))
            .oneshot(json_request(
                "/match-jd",
                json!({
                    "jd_text": "python java rust go",
                    "resumes": [
                        {"file_name": "a.pdf", "data": {"content": {"experience": ["Python"]}}},
                        {"file_name": "b.pdf"}
                    ]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["data"]["metadata"]["match_score"], 75);
        assert_eq!(body[1], json!({"file_name": "b.pdf"}));
    }

    #[tokio::test]
    async fn test_match_jd_missing_data() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));

        for body in [
            json!({"jd_text": "python"}),
            json!({"resumes": [{"data": {}}], "jd_text": ""}),
        ] {
            let response = app
                .clone()
                .oneshot(json_request("/match-jd", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["error"]["message"], "Missing data");
        }
    }

    #[tokio::test]
    async fn test_reset_clears_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("uploads");
        std::fs::create_dir_all(&uploads).unwrap();
        std::fs::write(uploads.join("old.pdf"), b"x").unwrap();

        let response = build_router(test_state(&uploads))
            .oneshot(Request::post("/reset").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "cleared"}));
        assert!(uploads.is_dir());
        assert_eq!(std::fs::read_dir(&uploads).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_reset_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("never-created");

        let response = build_router(test_state(&uploads))
            .oneshot(Request::post("/reset").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(uploads.is_dir());
    }
}
