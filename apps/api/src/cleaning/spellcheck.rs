//! Conservative spellchecker.
//!
//! Only corrects words that are definitely wrong and definitely not technical
//! terms. Every token first runs through an ordered list of shields; the
//! first shield that holds lets the token through untouched and no
//! correction lookup happens. A correction is only accepted when it is itself
//! a known word, otherwise the original token is kept.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::casing::{is_all_upper, is_mixed_case, title_case};
use super::lexicon::Lexicon;

/// Runs of non-whitespace. Tabs and carriage returns separate tokens just
/// like spaces and line breaks do.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

/// Tokens this short are never corrected.
const SHORT_WORD_MAX_LEN: usize = 3;

/// Guard conditions that force a token through unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shield {
    /// All caps, longer than one letter ("SQL", "AWS").
    Acronym,
    /// Both upper and lower case letters ("GitHub", "PowerBI").
    MixedCase,
    /// Clean form of at most three characters ("Git", "App").
    ShortWord,
    /// Whitelisted or in the general dictionary.
    Dictionary,
    /// Contains a digit, or the raw token contains '@'.
    Data,
}

/// Evaluation order. Earlier shields win.
pub const SHIELD_ORDER: [Shield; 5] = [
    Shield::Acronym,
    Shield::MixedCase,
    Shield::ShortWord,
    Shield::Dictionary,
    Shield::Data,
];

/// A token plus its clean form: letters, digits and `+ # - . /` only.
#[derive(Debug)]
pub struct TokenView<'a> {
    pub raw: &'a str,
    pub clean: String,
    pub clean_lower: String,
}

impl<'a> TokenView<'a> {
    pub fn new(raw: &'a str) -> Self {
        let clean: String = raw.chars().filter(|c| is_clean_char(*c)).collect();
        let clean_lower = clean.to_lowercase();
        Self {
            raw,
            clean,
            clean_lower,
        }
    }
}

fn is_clean_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '.' | '/')
}

impl Shield {
    pub fn protects(self, token: &TokenView<'_>, lexicon: &Lexicon) -> bool {
        match self {
            Shield::Acronym => is_all_upper(&token.clean) && token.clean.chars().count() > 1,
            Shield::MixedCase => is_mixed_case(&token.clean),
            Shield::ShortWord => token.clean.chars().count() <= SHORT_WORD_MAX_LEN,
            Shield::Dictionary => lexicon.is_known(&token.clean_lower),
            Shield::Data => {
                token.clean.chars().any(|c| c.is_ascii_digit()) || token.raw.contains('@')
            }
        }
    }
}

/// First shield in `SHIELD_ORDER` protecting the token, if any.
pub fn shield_for(token: &TokenView<'_>, lexicon: &Lexicon) -> Option<Shield> {
    SHIELD_ORDER
        .into_iter()
        .find(|shield| shield.protects(token, lexicon))
}

/// Spellchecks text token by token. Only the tokens are rewritten; every
/// space, tab and line break between them is preserved exactly.
pub fn fix_typos_smart(text: &str, lexicon: &Lexicon) -> String {
    TOKEN
        .replace_all(text, |caps: &Captures| {
            correct_token(&caps[0], lexicon).into_owned()
        })
        .into_owned()
}

/// Corrects a single token, or returns it unchanged.
pub fn correct_token<'a>(token: &'a str, lexicon: &Lexicon) -> Cow<'a, str> {
    let view = TokenView::new(token);

    if view.clean.is_empty() || shield_for(&view, lexicon).is_some() {
        return Cow::Borrowed(token);
    }

    match lexicon.dictionary().correction(&view.clean_lower) {
        Some(correction) if !correction.is_empty() && lexicon.is_known(&correction) => {
            if token.chars().next().is_some_and(char::is_uppercase) {
                Cow::Owned(title_case(&correction))
            } else {
                Cow::Owned(correction)
            }
        }
        // Better a typo than a wrong word.
        _ => Cow::Borrowed(token),
    }
}
