// Resume extraction prompt templates and the structured response schema.

use std::sync::LazyLock;

use serde_json::{json, Value};

/// Text mode: `{resume_text}` is replaced with the cleaned resume text.
pub const TEXT_EXTRACTION_PROMPT: &str = r#"You are an expert HR Resume Parser. Extract data from the text below into strict JSON.

RESUME TEXT:
{resume_text}
"#;

/// Vision mode: sent together with the resume image.
pub const IMAGE_EXTRACTION_PROMPT: &str = "\
Analyze this resume image. Extract data into strict JSON.
CRITICAL INSTRUCTION: The Candidate Name is almost always the largest text at the very top. Find it first.

Rules:
1. Extract Name, Email, Phone (look at the header and margins).
2. Summarize work experience items.
3. Extract technical skills.
";

/// Schema the model must follow. Field names here are the model-facing ones;
/// `intelligence` maps them onto `ResumeRecord`.
pub static RESPONSE_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    let string_list = json!({"type": "ARRAY", "items": {"type": "STRING"}});
    json!({
        "type": "OBJECT",
        "properties": {
            "metadata": {
                "type": "OBJECT",
                "properties": {
                    "name": {"type": "STRING"},
                    "email": {"type": "STRING"},
                    "phone": {"type": "STRING"},
                    "links": string_list,
                    "detected_skills": string_list
                }
            },
            "content": {
                "type": "OBJECT",
                "properties": {
                    "summary": {"type": "STRING"},
                    "work_experience": string_list,
                    "education": string_list,
                    "projects": string_list,
                    "certifications": string_list
                }
            }
        }
    })
});
