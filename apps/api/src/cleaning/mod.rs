// Text cleaning: bullet normalization, character sanitization, OCR shape
// fixes, conservative spellchecking and whitespace normalization.
// Everything here is pure and synchronous; the Lexicon is the only input
// besides the text itself.

pub mod casing;
pub mod lexicon;
pub mod ocr;
pub mod spellcheck;

use std::sync::LazyLock;

use regex::Regex;

pub use lexicon::Lexicon;
pub use ocr::fix_ocr_shapes;
pub use spellcheck::fix_typos_smart;

static BULLETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{2022}\u{2023}\u{25E6}\u{2043}\u{2219}*+>|]").unwrap());
static NON_ASCII: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\x00-\x7F]+").unwrap());
static HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Master cleaning pipeline. Accepts `&str` or `Option<&str>`; missing or
/// empty input yields an empty string. Never fails.
///
/// Non-ASCII characters are dropped entirely, including legitimate accented
/// letters in names.
pub fn clean_text<'a>(raw: impl Into<Option<&'a str>>, lexicon: &Lexicon) -> String {
    let raw = match raw.into() {
        Some(raw) if !raw.is_empty() => raw,
        _ => return String::new(),
    };

    // 1. bullet glyphs become line breaks
    let text = BULLETS.replace_all(raw, "\n");
    // 2. strip anything outside ASCII
    let text = NON_ASCII.replace_all(&text, " ");
    // 3. visual OCR confusions
    let text = fix_ocr_shapes(&text);
    // 4. spelling
    let text = fix_typos_smart(&text, lexicon);
    // 5. spacing
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    let text = BLANK_LINES.replace_all(&text, "\n");

    text.trim().to_string()
}
