//! JD matching over client-held extraction results.
//!
//! Resumes arrive exactly as `/status` returned them (`{file_name, data}`), so
//! they are handled as loose JSON rather than typed records: a failed file has
//! no `content`, and clients may have added their own fields.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::fit_scoring::FitScorer;

#[derive(Debug, Deserialize)]
pub struct MatchJdRequest {
    #[serde(default)]
    pub resumes: Vec<Value>,
    #[serde(default)]
    pub jd_text: String,
}

/// Scores every resume against the JD and writes the result to
/// `data.metadata.match_score`. Entries without a `data` object are left
/// untouched.
pub fn apply_match_scores(resumes: &mut [Value], jd_text: &str, scorer: &dyn FitScorer) {
    for resume in resumes.iter_mut() {
        let Some(data) = resume.get_mut("data").and_then(Value::as_object_mut) else {
            continue;
        };

        let resume_text = data.get("content").map(flatten_content).unwrap_or_default();
        let score = scorer.score(&resume_text, jd_text);

        let metadata = data
            .entry("metadata")
            .or_insert_with(|| Value::Object(Map::new()));
        if !metadata.is_object() {
            *metadata = Value::Object(Map::new());
        }
        if let Some(metadata) = metadata.as_object_mut() {
            metadata.insert("match_score".to_string(), Value::from(score));
        }
    }
}

/// Space-joins every value of the content object. List items are always
/// included; scalar values only when truthy.
pub fn flatten_content(content: &Value) -> String {
    let Some(fields) = content.as_object() else {
        return String::new();
    };

    let mut parts = Vec::new();
    for value in fields.values() {
        match value {
            Value::Array(items) => parts.extend(items.iter().map(stringify)),
            other if is_truthy(other) => parts.push(stringify(other)),
            _ => {}
        }
    }
    parts.join(" ")
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
