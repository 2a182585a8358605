//! File-format extractors: PDF and DOCX to raw text; images are passed to
//! the model as bytes and only need their MIME type resolved here.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::warn;
use zip::ZipArchive;

/// Placeholder text for image uploads; the image itself goes to the model.
pub const IMAGE_MODE_SENTINEL: &str = "IMAGE_MODE";

const DOCX_BODY: &str = "word/document.xml";

static DOCX_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*)?/>|<w:p(?:\s[^>]*)?>.*?</w:p>").unwrap()
});
static DOCX_RUN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab/>|<w:br(?:\s[^>]*)?/>").unwrap()
});
static XML_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|[a-z]+);").unwrap());

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Not a Word document: missing {0}")]
    MissingPart(&'static str),
}

/// Upload formats the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Docx,
    Image { mime_type: &'static str },
}

impl SourceKind {
    /// Resolves the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(SourceKind::Pdf),
            "docx" => Some(SourceKind::Docx),
            "jpg" | "jpeg" => Some(SourceKind::Image {
                mime_type: "image/jpeg",
            }),
            "png" => Some(SourceKind::Image {
                mime_type: "image/png",
            }),
            _ => None,
        }
    }
}

/// pdf-extract panics on some malformed documents; those become errors too.
pub fn extract_pdf_text(path: &Path) -> Result<String, SourceError> {
    std::panic::catch_unwind(|| pdf_extract::extract_text(path))
        .map_err(|_| SourceError::Pdf("parser panicked".to_string()))?
        .map_err(|e| SourceError::Pdf(e.to_string()))
}

/// PDF text, or an empty string when the file cannot be read.
pub fn process_pdf(path: &Path) -> String {
    extract_pdf_text(path).unwrap_or_else(|e| {
        warn!("Error reading PDF {}: {e}", path.display());
        String::new()
    })
}

pub fn extract_docx_text(path: &Path) -> Result<String, SourceError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut body = archive
        .by_name(DOCX_BODY)
        .map_err(|_| SourceError::MissingPart(DOCX_BODY))?;

    let mut xml = String::new();
    body.read_to_string(&mut xml)?;
    Ok(document_xml_to_text(&xml))
}

/// Word document text, or an empty string when the file cannot be read.
pub fn process_word(path: &Path) -> String {
    extract_docx_text(path).unwrap_or_else(|e| {
        warn!("Error reading Word document {}: {e}", path.display());
        String::new()
    })
}

/// Flattens WordprocessingML into text: one paragraph per `<w:p>`, each
/// followed by a blank line.
pub fn document_xml_to_text(xml: &str) -> String {
    let mut text = String::new();
    for paragraph in DOCX_PARAGRAPH.find_iter(xml) {
        for run in DOCX_RUN_TEXT.captures_iter(paragraph.as_str()) {
            match run.get(1) {
                Some(content) => text.push_str(&decode_xml_entities(content.as_str())),
                None if run[0].starts_with("<w:tab") => text.push('\t'),
                None => text.push('\n'),
            }
        }
        text.push_str("\n\n");
    }
    text
}

fn decode_xml_entities(raw: &str) -> String {
    XML_ENTITY
        .replace_all(raw, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_source_kind_from_extension() {
        assert_eq!(SourceKind::from_path(Path::new("cv.PDF")), Some(SourceKind::Pdf));
        assert_eq!(SourceKind::from_path(Path::new("cv.docx")), Some(SourceKind::Docx));
        assert_eq!(
            SourceKind::from_path(Path::new("scan.JPeG")),
            Some(SourceKind::Image {
                mime_type: "image/jpeg"
            })
        );
        assert_eq!(
            SourceKind::from_path(Path::new("scan.png")),
            Some(SourceKind::Image {
                mime_type: "image/png"
            })
        );
        assert_eq!(SourceKind::from_path(Path::new("cv.doc")), None);
        assert_eq!(SourceKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_document_xml_paragraphs_and_runs() {
        let xml = r#"<w:document><w:body>
            <w:p w:rsidR="00A1"><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Ada</w:t></w:r><w:r><w:t xml:space="preserve"> Lovelace</w:t></w:r></w:p>
            <w:p/>
            <w:p><w:r><w:t>R&amp;D</w:t><w:tab/><w:t>2019</w:t><w:br/><w:t>&#233;cole &lt;x&gt;</w:t></w:r></w:p>
        </w:body></w:document>"#;

        assert_eq!(
            document_xml_to_text(xml),
            "Ada Lovelace\n\n\n\nR&D\t2019\n\u{e9}cole <x>\n\n"
        );
    }

    #[test]
    fn test_tables_and_tab_stops_do_not_leak_markup() {
        let xml = r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Skills</w:t></w:r></w:p>"#;
        assert_eq!(document_xml_to_text(xml), "Skills\n\n");
    }

    #[test]
    fn test_unknown_entities_are_kept() {
        assert_eq!(decode_xml_entities("a &nbsp; b &#x41;"), "a &nbsp; b A");
    }

    fn write_docx(dir: &Path, document_xml: Option<&str>) -> PathBuf {
        let path = dir.join("resume.docx");
        let file = File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(b"<Types/>").unwrap();
        if let Some(xml) = document_xml {
            zip.start_file(DOCX_BODY, options).unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        path
    }

    #[test]
    fn test_extract_docx_from_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(
            dir.path(),
            Some("<w:document><w:body><w:p><w:r><w:t>Hello</w:t></w:r></w:p></w:body></w:document>"),
        );
        assert_eq!(extract_docx_text(&path).unwrap(), "Hello\n\n");
    }

    #[test]
    fn test_docx_without_body_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(dir.path(), None);
        assert!(matches!(
            extract_docx_text(&path),
            Err(SourceError::MissingPart(_))
        ));
        assert_eq!(process_word(&path), "");
    }

    #[test]
    fn test_unreadable_files_yield_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();
        assert_eq!(process_pdf(&path), "");
        assert_eq!(process_word(&path), "");
    }
}
