//! Upload routing: picks the extractor for a file, cleans its text and hands
//! the result to the AI extraction boundary.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use crate::cleaning::{clean_text, Lexicon};
use crate::extraction::intelligence::{extract_entities, ExtractionInput, ResumeExtractor};
use crate::extraction::sources::{process_pdf, process_word, SourceKind, IMAGE_MODE_SENTINEL};
use crate::models::resume::FileResult;

pub const UNSUPPORTED_FORMAT: &str = "Unsupported File Format. Please use PDF, DOCX, or JPG/PNG.";
pub const EMPTY_TEXT: &str = "Failed to extract text or empty file.";

/// Everything a worker needs to turn an uploaded file into a `FileResult`.
#[derive(Clone)]
pub struct ProcessingPipeline {
    pub lexicon: Arc<Lexicon>,
    /// `None` when no model API key is configured.
    pub extractor: Option<Arc<dyn ResumeExtractor>>,
    pub blind_mode: bool,
}

impl ProcessingPipeline {
    pub fn new(
        lexicon: Arc<Lexicon>,
        extractor: Option<Arc<dyn ResumeExtractor>>,
        blind_mode: bool,
    ) -> Self {
        Self {
            lexicon,
            extractor,
            blind_mode,
        }
    }

    /// Processes one file. Never fails: every problem becomes an inline
    /// `{"error": ...}` result.
    pub async fn handle_upload(&self, path: &Path) -> FileResult {
        let Some(kind) = SourceKind::from_path(path) else {
            return FileResult::failed(UNSUPPORTED_FORMAT);
        };

        match self.build_input(path, kind).await {
            Ok(Some(input)) => {
                let record = extract_entities(
                    self.extractor.as_deref(),
                    &input,
                    self.blind_mode,
                )
                .await;
                FileResult::Extracted(record)
            }
            Ok(None) => FileResult::failed(EMPTY_TEXT),
            Err(detail) => {
                error!("Processing {} failed: {detail}", path.display());
                FileResult::failed(format!("Processing Error: {detail}"))
            }
        }
    }

    /// Extraction input for the file, or `None` when no text came out.
    async fn build_input(
        &self,
        path: &Path,
        kind: SourceKind,
    ) -> Result<Option<ExtractionInput>, String> {
        if let SourceKind::Image { mime_type } = kind {
            info!("Image upload ({IMAGE_MODE_SENTINEL}): {}", path.display());
            let bytes = tokio::fs::read(path).await.map_err(|e| e.to_string())?;
            return Ok(Some(ExtractionInput::Image {
                bytes,
                mime_type: mime_type.to_string(),
            }));
        }

        // Parsing and cleaning are CPU-bound; keep them off the async executor.
        let owned_path = path.to_path_buf();
        let lexicon = Arc::clone(&self.lexicon);
        let cleaned = tokio::task::spawn_blocking(move || {
            let raw = match kind {
                SourceKind::Pdf => process_pdf(&owned_path),
                _ => process_word(&owned_path),
            };
            if raw.trim().is_empty() {
                return None;
            }
            Some(clean_text(raw.as_str(), &lexicon))
        })
        .await
        .map_err(|e| format!("text extraction task failed: {e}"))?;

        Ok(cleaned.map(ExtractionInput::Text))
    }
}
