//! Term-frequency cosine similarity for short titles and descriptions.
//!
//! No stemming and no inverse-document-frequency weighting: two texts are
//! compared purely on the counts of the terms that survive stop-word removal.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

/// Standard English stop words.
const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren", "as", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "couldn", "d", "did", "didn", "do", "does", "doesn", "doing", "don", "down",
    "during", "each", "few", "for", "from", "further", "had", "hadn", "has", "hasn", "have",
    "haven", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i",
    "if", "in", "into", "is", "isn", "it", "its", "itself", "just", "ll", "m", "me", "mightn",
    "more", "most", "mustn", "my", "myself", "needn", "no", "nor", "not", "now", "o", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "re",
    "s", "same", "shan", "she", "should", "shouldn", "so", "some", "such", "t", "than", "that",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "ve", "very", "was", "wasn", "we",
    "were", "weren", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "won", "wouldn", "y", "you", "your", "yours", "yourself", "yourselves",
];

/// Words that appear in nearly every listing and carry no signal.
const DOMAIN_STOPWORDS: &[&str] = &["found", "lost", "in", "at", "on"];

static STOPWORDS: LazyLock<BTreeSet<&'static str>> = LazyLock::new(|| {
    ENGLISH_STOPWORDS
        .iter()
        .chain(DOMAIN_STOPWORDS)
        .copied()
        .collect()
});

static TERM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap_or_else(|_| unreachable!()));

/// Splits `text` into lowercase terms, dropping stop words.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TERM_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|term| !STOPWORDS.contains(*term))
        .map(str::to_string)
        .collect()
}

fn term_frequencies(terms: &[String]) -> BTreeMap<&str, u32> {
    let mut counts = BTreeMap::new();
    for term in terms {
        let count: &mut u32 = counts.entry(term.as_str()).or_default();
        *count = count.saturating_add(1);
    }
    counts
}

/// Cosine similarity of the term-frequency vectors of two texts, in `[0, 1]`.
///
/// Returns `0.0` when either text has no terms left after stop-word removal.
#[must_use]
pub fn cosine_similarity(text1: &str, text2: &str) -> f64 {
    let terms1 = tokenize(text1);
    let terms2 = tokenize(text2);
    let tf1 = term_frequencies(&terms1);
    let tf2 = term_frequencies(&terms2);

    let vocabulary: BTreeSet<&str> = tf1.keys().chain(tf2.keys()).copied().collect();

    let mut dot = 0.0;
    let mut sum_sq1 = 0.0;
    let mut sum_sq2 = 0.0;
    for term in vocabulary {
        let v1 = f64::from(tf1.get(term).copied().unwrap_or(0));
        let v2 = f64::from(tf2.get(term).copied().unwrap_or(0));
        dot += v1 * v2;
        sum_sq1 += v1 * v1;
        sum_sq2 += v2 * v2;
    }

    if sum_sq1 <= 0.0 || sum_sq2 <= 0.0 {
        return 0.0;
    }

    (dot / (sum_sq1 * sum_sq2).sqrt()).clamp(0.0, 1.0)
}
