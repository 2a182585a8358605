//! Lexicon — the word knowledge the cleaner consults.
//!
//! A `Lexicon` pairs a general-language frequency `Dictionary` with a
//! whitelist of technical/business terms that must never be "corrected".
//! It is built once at startup and shared read-only (`Arc<Lexicon>`), so
//! tests can construct their own instances with different word sets.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::info;

/// Embedded English word list, most frequent first.
const ENGLISH_WORDS: &str = include_str!("../../data/english_words.txt");

/// Words longer than this skip the distance-2 candidate search.
const MAX_EDIT2_LEN: usize = 30;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Technical and business terms treated as correct even when a general
/// English dictionary disagrees.
pub const TECH_TERMS: &[&str] = &[
    // Roles & titles
    "manager", "management", "developer", "development", "engineer", "engineering",
    "analyst", "analysis", "analytics", "consultant", "specialist", "architect",
    "associate", "director", "president", "partner", "founder", "co-founder",
    "admin", "administrator", "intern", "internship", "freelancer", "executive",
    // Core tech
    "python", "java", "javascript", "typescript", "react", "angular", "vue",
    "html", "css", "django", "flask", "fastapi", "kubernetes", "docker",
    "aws", "azure", "linux", "unix", "mysql", "postgresql", "mongodb",
    "redis", "elasticsearch", "git", "github", "gitlab", "jenkins",
    "tensorflow", "pytorch", "pandas", "numpy", "scikit-learn", "tableau",
    "powerbi", "excel", "agile", "scrum", "jira", "confluence",
    "c++", "c#", ".net", "php", "ruby", "golang", "swift", "kotlin", "scala",
    "node", "nodejs", "express", "spring", "boot", "hibernate", "jpa",
    "ios", "android", "mobile", "web", "cloud", "data", "code", "stack",
    // Industry acronyms & jargon
    "sql", "nosql", "api", "rest", "restful", "soap", "graphql",
    "ci/cd", "devops", "mlops", "saas", "paas", "iaas", "fintech", "edtech",
    "medtech", "adtech", "martech", "mvp", "poc", "kpi", "okr", "roi",
    "b2b", "b2c", "seo", "sem", "crm", "erp", "cms", "lms", "ats",
    "ui", "ux", "gui", "cli", "ide", "sdk", "npm", "pip",
    "gcp", "s3", "ec2", "lambda", "rds", "vpc", "iam",
    "ma", "ms", "ba", "bs", "phd", "mba", "gpa", "btech", "mtech",
    "gamification", "scalability", "latency", "throughput", "bandwidth",
    "underserved", "onboarding", "lifecycle", "stakeholder", "roadmap",
    "backend", "frontend", "serverless", "microservices", "workflow", "pipeline",
    // "App" must not drift to "Ape"
    "app", "apps",
];

// ────────────────────────────────────────────────────────────────────────────
// Dictionary
// ────────────────────────────────────────────────────────────────────────────

/// Lowercase word → occurrence count. Counts only matter for ranking
/// correction candidates.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashMap<String, u64>,
}

impl Dictionary {
    /// Parses a word list. Each non-comment line is either `word count` or a
    /// bare `word`; bare words get a count derived from their rank so earlier
    /// lines outrank later ones. Repeated words keep their first count.
    pub fn from_word_list(text: &str) -> Self {
        let entries: Vec<(String, Option<u64>)> = parse_word_list(text).collect();
        let total = entries.len() as u64;

        let mut words = HashMap::with_capacity(entries.len());
        for (rank, (word, count)) in entries.into_iter().enumerate() {
            let count = count.unwrap_or(total - rank as u64);
            words.entry(word).or_insert(count);
        }
        Self { words }
    }

    /// The embedded English dictionary.
    pub fn english() -> Self {
        Self::from_word_list(ENGLISH_WORDS)
    }

    /// Merges another word list file into this dictionary, adding counts.
    /// Returns the number of entries read.
    pub fn extend_from_file(&mut self, path: &Path) -> std::io::Result<usize> {
        let text = std::fs::read_to_string(path)?;
        let extra = Self::from_word_list(&text);
        let read = extra.len();
        for (word, count) in extra.words {
            *self.words.entry(word).or_insert(0) += count;
        }
        Ok(read)
    }

    /// Adds one occurrence of each word.
    pub fn add_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            *self.words.entry(word.as_ref().to_lowercase()).or_insert(0) += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Case-insensitive membership.
    pub fn contains(&self, word: &str) -> bool {
        self.frequency(word) > 0
    }

    pub fn frequency(&self, word: &str) -> u64 {
        match self.words.get(word) {
            Some(count) => *count,
            None => self
                .words
                .get(&word.to_lowercase())
                .copied()
                .unwrap_or(0),
        }
    }

    /// Most probable spelling of `word`: the word itself when known, else the
    /// most frequent known word one edit away, else two edits away.
    /// Ties go to the lexicographically smallest candidate.
    pub fn correction(&self, word: &str) -> Option<String> {
        let word = word.to_lowercase();
        if word.is_empty() {
            return None;
        }
        if self.contains(&word) {
            return Some(word);
        }

        let first_edits = edits1(&word);
        if let Some(best) = self.most_frequent(first_edits.iter().map(String::as_str)) {
            return Some(best);
        }

        if word.chars().count() > MAX_EDIT2_LEN {
            return None;
        }

        let mut best: Option<(u64, String)> = None;
        for edit in &first_edits {
            for candidate in edits1(edit) {
                let frequency = self.frequency(&candidate);
                if frequency == 0 {
                    continue;
                }
                if is_better(frequency, &candidate, best.as_ref()) {
                    best = Some((frequency, candidate));
                }
            }
        }
        best.map(|(_, word)| word)
    }

    fn most_frequent<'a>(&self, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
        candidates
            .filter_map(|c| {
                let frequency = self.frequency(c);
                (frequency > 0).then_some((frequency, Reverse(c)))
            })
            .max()
            .map(|(_, Reverse(word))| word.to_string())
    }
}

fn is_better(frequency: u64, candidate: &str, current: Option<&(u64, String)>) -> bool {
    match current {
        None => true,
        Some((best_frequency, best_word)) => {
            frequency > *best_frequency
                || (frequency == *best_frequency && candidate < best_word.as_str())
        }
    }
}

fn parse_word_list(text: &str) -> impl Iterator<Item = (String, Option<u64>)> + '_ {
    text.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let mut parts = line.split_whitespace();
        let word = parts.next()?.to_lowercase();
        let count = parts.next().and_then(|c| c.parse::<u64>().ok());
        Some((word, count))
    })
}

/// All strings one delete, transpose, replace or insert away from `word`.
fn edits1(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut edits = Vec::with_capacity(54 * n + 25);

    for i in 0..=n {
        let (left, right) = chars.split_at(i);
        let left: String = left.iter().collect();

        if !right.is_empty() {
            // delete
            edits.push(format!("{left}{}", right[1..].iter().collect::<String>()));
        }
        if right.len() > 1 {
            // transpose
            edits.push(format!(
                "{left}{}{}{}",
                right[1],
                right[0],
                right[2..].iter().collect::<String>()
            ));
        }
        for c in ALPHABET.chars() {
            if !right.is_empty() {
                // replace
                edits.push(format!("{left}{c}{}", right[1..].iter().collect::<String>()));
            }
            // insert
            edits.push(format!("{left}{c}{}", right.iter().collect::<String>()));
        }
    }
    edits
}

// ────────────────────────────────────────────────────────────────────────────
// Lexicon
// ────────────────────────────────────────────────────────────────────────────

/// Immutable word knowledge passed into the cleaning pipeline.
#[derive(Debug, Clone)]
pub struct Lexicon {
    dictionary: Dictionary,
    whitelist: HashSet<String>,
}

impl Lexicon {
    /// Builds a lexicon; whitelist terms are also loaded into the dictionary
    /// so they can be offered as corrections.
    pub fn new<I, S>(mut dictionary: Dictionary, whitelist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let whitelist: HashSet<String> = whitelist
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        dictionary.add_words(&whitelist);
        Self {
            dictionary,
            whitelist,
        }
    }

    /// Embedded English dictionary plus the default technical whitelist.
    pub fn standard() -> Self {
        Self::new(Dictionary::english(), TECH_TERMS.iter().copied())
    }

    /// Standard lexicon, optionally extended with an extra word list file.
    pub fn load(extra_words: Option<&Path>) -> std::io::Result<Self> {
        let mut dictionary = Dictionary::english();
        if let Some(path) = extra_words {
            let read = dictionary.extend_from_file(path)?;
            info!("Loaded {read} extra dictionary words from {}", path.display());
        }
        let lexicon = Self::new(dictionary, TECH_TERMS.iter().copied());
        info!(
            "Lexicon ready: {} dictionary words, {} whitelisted terms",
            lexicon.dictionary.len(),
            lexicon.whitelist.len()
        );
        Ok(lexicon)
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Expects a lowercase term.
    pub fn is_whitelisted(&self, term: &str) -> bool {
        self.whitelist.contains(term)
    }

    /// Whitelisted or present in the general dictionary.
    pub fn is_known(&self, word: &str) -> bool {
        self.is_whitelisted(word) || self.dictionary.contains(word)
    }
}
