//! OCR shape fixer — repairs tokens the OCR engine misread because the
//! glyphs look alike ("rn" vs "m", "vv" vs "w"), before spellchecking runs.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::casing::{is_all_upper, is_title, title_case};

/// Punctuation-stripped lowercase token → corrected lowercase form.
pub const OCR_SHAPE_FIXES: &[(&str, &str)] = &[
    ("avs", "aws"),        // V vs W
    ("lwo", "two"),        // l vs t
    ("iy", "ly"),          // I vs l
    ("rn", "m"),           // rn vs m
    ("vv", "w"),           // vv vs w
    ("clod", "cloud"),     // o vs ou
    ("fer", "for"),        // e vs o
    ("cops", "cgpa"),      // CGPA read as "Cops"
    ("redst", "redshift"),
    ("sol", "sql"),        // S-O-L vs S-Q-L
    ("finch", "fintech"),  // autocorrect hallucinations below
    ("ape", "app"),
    ("map", "mvp"),
    ("clip", "cli"),
];

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

/// Looks up the correction for a token, ignoring case and non-letters.
pub fn lookup(token: &str) -> Option<&'static str> {
    let key: String = token
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect();
    OCR_SHAPE_FIXES
        .iter()
        .find(|(confused, _)| *confused == key)
        .map(|(_, fixed)| *fixed)
}

/// Replaces every whitespace-delimited token found in the confusion map,
/// restoring the token's case pattern. Whitespace between tokens is kept
/// as-is so line structure survives.
pub fn fix_ocr_shapes(text: &str) -> String {
    TOKEN
        .replace_all(text, |caps: &Captures| fix_token(&caps[0]).into_owned())
        .into_owned()
}

fn fix_token(token: &str) -> Cow<'_, str> {
    let Some(correction) = lookup(token) else {
        return Cow::Borrowed(token);
    };

    if is_all_upper(token) {
        Cow::Owned(correction.to_uppercase())
    } else if is_title(token) {
        Cow::Owned(title_case(correction))
    } else {
        Cow::Borrowed(correction)
    }
}
