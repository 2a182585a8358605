//! AI extraction — turns cleaned resume text (or a resume image) into a
//! structured `ResumeRecord` via the hosted model.
//!
//! The model sits behind the `ResumeExtractor` trait so the deterministic
//! parts of the pipeline can be exercised without network access.
//! Failures never propagate: they land in `metadata.warnings` and the record
//! keeps its placeholder values.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use crate::extraction::prompts::{IMAGE_EXTRACTION_PROMPT, RESPONSE_SCHEMA, TEXT_EXTRACTION_PROMPT};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError, PromptPart};
use crate::models::resume::{ResumeContent, ResumeMetadata, ResumeRecord};

/// Text beyond this many characters is not sent to the model.
pub const MAX_PROMPT_CHARS: usize = 20_000;

pub const REDACTED: &str = "[REDACTED]";
pub const MISSING_KEY_WARNING: &str = "Missing GEMINI_API_KEY. AI extraction skipped.";

/// What the model gets to look at.
#[derive(Debug, Clone)]
pub enum ExtractionInput {
    Text(String),
    Image { bytes: Vec<u8>, mime_type: String },
}

/// Model-facing shape, mirrored by `RESPONSE_SCHEMA`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedResume {
    #[serde(default)]
    pub metadata: ExtractedMetadata,
    #[serde(default)]
    pub content: ExtractedContent,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedMetadata {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub links: Option<Vec<String>>,
    #[serde(default)]
    pub detected_skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedContent {
    pub summary: Option<String>,
    #[serde(default)]
    pub work_experience: Option<Vec<String>>,
    #[serde(default)]
    pub education: Option<Vec<String>>,
    #[serde(default)]
    pub projects: Option<Vec<String>>,
    #[serde(default)]
    pub certifications: Option<Vec<String>>,
}

/// Structured-extraction capability. Implement this to swap the model
/// backend (or stub it in tests) without touching the pipeline.
#[async_trait]
pub trait ResumeExtractor: Send + Sync {
    async fn extract(&self, input: &ExtractionInput) -> Result<ExtractedResume, LlmError>;
}

/// Gemini-backed extractor.
pub struct GeminiExtractor {
    llm: LlmClient,
}

impl GeminiExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeExtractor for GeminiExtractor {
    async fn extract(&self, input: &ExtractionInput) -> Result<ExtractedResume, LlmError> {
        match input {
            ExtractionInput::Text(text) => {
                let prompt = build_text_prompt(text);
                self.llm
                    .call_json(&[PromptPart::Text(&prompt)], &RESPONSE_SCHEMA)
                    .await
            }
            ExtractionInput::Image { bytes, mime_type } => {
                info!("Vision mode: sending {} image bytes", bytes.len());
                let prompt = format!("{IMAGE_EXTRACTION_PROMPT}\n{JSON_ONLY_INSTRUCTION}");
                self.llm
                    .call_json(
                        &[
                            PromptPart::Text(&prompt),
                            PromptPart::Image {
                                mime_type,
                                bytes,
                            },
                        ],
                        &RESPONSE_SCHEMA,
                    )
                    .await
            }
        }
    }
}

fn build_text_prompt(text: &str) -> String {
    let truncated: String = text.chars().take(MAX_PROMPT_CHARS).collect();
    format!(
        "{}\n{JSON_ONLY_INSTRUCTION}",
        TEXT_EXTRACTION_PROMPT.replace("{resume_text}", &truncated)
    )
}

/// Runs the extractor and maps its output onto a `ResumeRecord`.
/// `extractor` is `None` when no API key is configured.
pub async fn extract_entities(
    extractor: Option<&dyn ResumeExtractor>,
    input: &ExtractionInput,
    blind_mode: bool,
) -> ResumeRecord {
    let mut record = ResumeRecord::default();

    let Some(extractor) = extractor else {
        record
            .metadata
            .warnings
            .push(MISSING_KEY_WARNING.to_string());
        return record;
    };

    match extractor.extract(input).await {
        Ok(extracted) => apply_extracted(&mut record, extracted),
        Err(e) => {
            let message = format!("AI Extraction Error: {e}");
            error!("{message}");
            record.metadata.warnings.push(message);
        }
    }

    if blind_mode {
        redact(&mut record.metadata);
    }

    record
}

fn apply_extracted(record: &mut ResumeRecord, extracted: ExtractedResume) {
    let meta = extracted.metadata;
    let content = extracted.content;

    record.metadata.name = meta.name;
    record.metadata.email = meta.email;
    record.metadata.phone = meta.phone;
    record.metadata.links = meta.links.unwrap_or_default();
    record.metadata.detected_skills = meta.detected_skills.unwrap_or_default();

    record.content = ResumeContent {
        professional_summary: content.summary.unwrap_or_default(),
        experience: content.work_experience.unwrap_or_default(),
        education: content.education.unwrap_or_default(),
        projects: content.projects.unwrap_or_default(),
        certifications: content.certifications.unwrap_or_default(),
    };
}

/// Blind mode: strip contact details and links.
pub fn redact(metadata: &mut ResumeMetadata) {
    metadata.name = Some(REDACTED.to_string());
    metadata.email = Some(REDACTED.to_string());
    metadata.phone = Some(REDACTED.to_string());
    metadata.links = vec![REDACTED.to_string()];
}
