//! Dataset search.
//!
//! A linear scan over the index with normalized matching: number prefix
//! matches rank above title matches, which rank above content matches.
//! Normalization is NFC plus case folding; with the `stemming` feature the
//! same Snowball English stemmer is applied to both query and document
//! tokens. Datasets are a few thousand nodes at most, so no inverted index
//! is kept.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::{index::RuleIndex, rule::RuleId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: RuleId,
    pub number: String,
    pub title: String,
    pub score: u32,
}

const SCORE_ID_EXACT: u32 = 120;
const SCORE_NUMBER_PREFIX: u32 = 100;
const SCORE_TITLE_SUBSTRING: u32 = 25;
const SCORE_TITLE_TOKEN: u32 = 10;
const SCORE_CONTENT_TOKEN: u32 = 3;

/// Rank rules matching `query`, best first, at most `limit` hits.
///
/// Ordering is deterministic: score descending, then number, then id.
pub fn search(index: &RuleIndex, query: &str, limit: usize) -> Vec<SearchHit> {
    let normalized_query = normalize(query.trim());
    if normalized_query.is_empty() || limit == 0 {
        return Vec::new();
    }
    let query_tokens: Vec<String> = tokenize(&normalized_query);

    let mut hits: Vec<SearchHit> = index
        .iter()
        .filter_map(|node| {
            let mut score = 0;
            if normalize(node.id.as_str()) == normalized_query {
                score += SCORE_ID_EXACT;
            }
            if !node.number.is_empty() && normalize(&node.number).starts_with(&normalized_query) {
                score += SCORE_NUMBER_PREFIX;
            }
            let title = normalize(&node.title);
            if !title.is_empty() && title.contains(&normalized_query) {
                score += SCORE_TITLE_SUBSTRING;
            }
            let title_tokens: HashSet<String> = tokenize(&title).into_iter().collect();
            let content_tokens: HashSet<String> =
                tokenize(&normalize(&node.content)).into_iter().collect();
            for token in &query_tokens {
                if title_tokens.contains(token) {
                    score += SCORE_TITLE_TOKEN;
                }
                if content_tokens.contains(token) {
                    score += SCORE_CONTENT_TOKEN;
                }
            }
            (score > 0).then(|| SearchHit {
                id: node.id.clone(),
                number: node.number.clone(),
                title: node.title.clone(),
                score,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.number.cmp(&b.number))
            .then_with(|| a.id.cmp(&b.id))
    });
    hits.truncate(limit);
    hits
}

fn normalize(text: &str) -> String {
    text.nfc().flat_map(char::to_lowercase).collect()
}

fn tokenize(normalized: &str) -> Vec<String> {
    normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(stem)
        .collect()
}

#[cfg(feature = "stemming")]
fn stem(token: &str) -> String {
    use once_cell::sync::Lazy;
    use rust_stemmers::{Algorithm, Stemmer};
    static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));
    STEMMER.stem(token).to_string()
}

#[cfg(not(feature = "stemming"))]
fn stem(token: &str) -> String {
    token.to_string()
}
