//! Case-pattern predicates shared by the OCR fixer and the spellchecker.
//!
//! Letters are "cased" when they have an upper/lower form; digits and
//! punctuation are uncased and act as word boundaries for title-casing.

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase()
}

/// True when the text has at least one cased letter and none of them are lowercase.
pub fn is_all_upper(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// True when every cased run starts with an uppercase letter followed only by
/// lowercase letters ("Avs", "Co-Founder"), and at least one cased letter exists.
pub fn is_title(text: &str) -> bool {
    let mut has_cased = false;
    let mut previous_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            has_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            has_cased = true;
        } else {
            previous_cased = false;
        }
    }
    has_cased
}

/// Uppercases the first letter of every cased run and lowercases the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_cased = false;
    for c in text.chars() {
        if is_cased(c) {
            if previous_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_cased = true;
        } else {
            out.push(c);
            previous_cased = false;
        }
    }
    out
}

/// True when the text contains both an uppercase and a lowercase letter.
pub fn is_mixed_case(text: &str) -> bool {
    text.chars().any(char::is_lowercase) && text.chars().any(char::is_uppercase)
}
