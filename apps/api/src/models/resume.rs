use serde::{Deserialize, Serialize};

/// Structured resume produced by the extraction step. Serialized field names
/// are the ones the export and match endpoints read back from clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub metadata: ResumeMetadata,
    #[serde(default)]
    pub content: ResumeContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeMetadata {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub detected_skills: Vec<String>,
    /// Non-fatal problems hit while extracting (missing key, model errors).
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Filled in on demand by the JD matcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u32>,
}

impl Default for ResumeMetadata {
    fn default() -> Self {
        Self {
            name: Some("Unknown".to_string()),
            email: None,
            phone: None,
            links: Vec::new(),
            detected_skills: Vec::new(),
            warnings: Vec::new(),
            match_score: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeContent {
    #[serde(rename = "professional summary", default)]
    pub professional_summary: String,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

/// Outcome of processing one uploaded file: either a record or an inline
/// error. Serializes as the record itself or as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileResult {
    Failed { error: String },
    Extracted(ResumeRecord),
}

impl FileResult {
    pub fn failed(error: impl Into<String>) -> Self {
        FileResult::Failed {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_record_shape() {
        let value = serde_json::to_value(ResumeRecord::default()).unwrap();
        assert_eq!(value["metadata"]["name"], "Unknown");
        assert!(value["metadata"]["email"].is_null());
        assert_eq!(value["metadata"]["warnings"], json!([]));
        assert!(value["metadata"].get("match_score").is_none());
        assert_eq!(value["content"]["professional summary"], "");
    }

    #[test]
    fn test_file_result_error_serializes_flat() {
        let value = serde_json::to_value(FileResult::failed("File not found")).unwrap();
        assert_eq!(value, json!({"error": "File not found"}));
    }

    #[test]
    fn test_file_result_round_trips_both_variants() {
        let failed: FileResult = serde_json::from_value(json!({"error": "boom"})).unwrap();
        assert_eq!(failed, FileResult::failed("boom"));

        let extracted: FileResult = serde_json::from_value(json!({
            "metadata": {"name": "Ada", "email": null, "phone": null},
            "content": {"professional summary": "Engineer", "experience": ["A", "B"]}
        }))
        .unwrap();
        match extracted {
            FileResult::Extracted(record) => {
                assert_eq!(record.metadata.name.as_deref(), Some("Ada"));
                assert_eq!(record.content.experience.len(), 2);
            }
            other => panic!("expected a record, got {other:?}"),
        }
    }
}
