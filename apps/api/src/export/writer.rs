//! CSV export of extraction results.
//!
//! Entries come back from the client exactly as `/status` delivered them, so
//! `data` is read as loose JSON: either a resume record or `{"error": ...}`.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const HEADERS: [&str; 6] = [
    "File Name",
    "Name",
    "Email",
    "Phone",
    "Detected Skills",
    "Summary/Experience Snippet",
];

/// Characters of summary/experience text kept in the snippet column.
pub const SNIPPET_CHARS: usize = 300;

/// Content fields tried in order for the snippet column.
const SNIPPET_SOURCES: [&str; 3] = ["professional summary", "summary", "experience"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportEntry {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// Renders the export table, header row first.
pub fn build_csv(entries: &[ExportEntry]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for entry in entries {
        writer.write_record(entry_row(entry))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn entry_row(entry: &ExportEntry) -> [String; 6] {
    let file_name = entry.file_name.as_deref().unwrap_or("Unknown").to_string();

    if let Some(error) = entry.data.get("error") {
        return [
            file_name,
            format!("ERROR: {}", stringify(error)),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ];
    }

    let meta = entry.data.get("metadata");
    let content = entry.data.get("content");

    let skills = meta
        .and_then(|m| m.get("detected_skills"))
        .and_then(Value::as_array)
        .map(|skills| skills.iter().map(stringify).collect::<Vec<_>>().join(", "))
        .unwrap_or_default();

    [
        file_name,
        meta_field(meta, "name"),
        meta_field(meta, "email"),
        meta_field(meta, "phone"),
        skills,
        snippet(content),
    ]
}

fn meta_field(meta: Option<&Value>, key: &str) -> String {
    match meta.and_then(|m| m.get(key)) {
        None | Some(Value::Null) => String::new(),
        Some(value) => stringify(value),
    }
}

/// First non-empty snippet source, cut to `SNIPPET_CHARS` with newlines
/// flattened. `...` marks a cut.
fn snippet(content: Option<&Value>) -> String {
    let Some(content) = content else {
        return String::new();
    };

    let text = SNIPPET_SOURCES
        .iter()
        .filter_map(|key| content.get(*key))
        .map(|value| match value {
            Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(" "),
            Value::Null => String::new(),
            other => stringify(other),
        })
        .find(|text| !text.is_empty())
        .unwrap_or_default();

    let mut chars = text.chars();
    let head: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    let head = head.replace('\n', " ");
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
