//! Fit Scoring — pluggable, trait-based scorer that measures a resume's text
//! against a job description.
//!
//! Default: `KeywordOverlapScorer` (pure-Rust, fast, deterministic, fully testable).
//!
//! `AppState` holds an `Arc<dyn FitScorer>`, chosen at startup.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Multiplier applied to the raw overlap percentage. Keyword overlap between
/// a resume and a JD rarely exceeds a third, so 25% already reads as strong.
pub const DEFAULT_BOOST: f64 = 3.0;
pub const DEFAULT_CAP: u32 = 100;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// The fit scorer trait. Implement this to swap backends without touching
/// the endpoint or handler code.
///
/// Carried in `AppState` as `Arc<dyn FitScorer>`.
pub trait FitScorer: Send + Sync {
    /// Score in `0..=100`. Empty inputs score 0.
    fn score(&self, resume_text: &str, jd_text: &str) -> u32;
}

/// Token-set overlap scorer.
///
/// Algorithm:
/// 1. Lowercase both texts and collect the distinct `\w+` runs of each.
/// 2. raw = |resume ∩ jd| / |jd| × 100
/// 3. score = min(cap, trunc(raw × boost))
#[derive(Debug, Clone, Copy)]
pub struct KeywordOverlapScorer {
    pub boost: f64,
    pub cap: u32,
}

impl Default for KeywordOverlapScorer {
    fn default() -> Self {
        Self {
            boost: DEFAULT_BOOST,
            cap: DEFAULT_CAP,
        }
    }
}

impl FitScorer for KeywordOverlapScorer {
    fn score(&self, resume_text: &str, jd_text: &str) -> u32 {
        if resume_text.is_empty() || jd_text.is_empty() {
            return 0;
        }

        let jd_tokens = tokenize(jd_text);
        if jd_tokens.is_empty() {
            return 0;
        }
        let resume_tokens = tokenize(resume_text);

        let shared = jd_tokens.intersection(&resume_tokens).count();
        let raw = shared as f64 / jd_tokens.len() as f64 * 100.0;

        // `as` truncates toward zero and saturates, so huge boosts stay in range.
        ((raw * self.boost) as u32).min(self.cap)
    }
}

/// Scores with the default boost and cap.
pub fn calculate_match_score(resume_text: &str, jd_text: &str) -> u32 {
    KeywordOverlapScorer::default().score(resume_text, jd_text)
}

fn tokenize(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}
