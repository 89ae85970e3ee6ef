//! Cross-reference key search and fuzzy ranking of suggested names.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use similar::TextDiff;
use toxref_models::KeyTree;

lazy_static! {
    static ref PUNCTUATION_RE: Regex = Regex::new(r"[^\w\s]").unwrap();
}

/// Every mapping key, at any depth, that contains `word`.
///
/// Depth-first: a mapping's keys are checked in stored order and each value
/// is descended into right after its key. The same key string found at
/// several positions is returned once per position.
pub fn find_keys_with_word<'a>(tree: &'a KeyTree, word: &str) -> Vec<&'a str> {
    let mut keys = Vec::new();
    collect_keys(tree, word, &mut keys);
    keys
}

fn collect_keys<'a>(tree: &'a KeyTree, word: &str, keys: &mut Vec<&'a str>) {
    match tree {
        KeyTree::Mapping(entries) => {
            for (key, value) in entries {
                if key.contains(word) {
                    keys.push(key);
                }
                collect_keys(value, word, keys);
            }
        }
        KeyTree::Sequence(items) => {
            for item in items {
                collect_keys(item, word, keys);
            }
        }
        KeyTree::Scalar(_) => {}
    }
}

/// Character-level matching ratio `2·M / (|a| + |b|)` where `M` is the size
/// of the longest common subsequence. 1.0 for identical strings.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    f64::from(TextDiff::from_chars(a, b).ratio())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub key: String,
    pub score: f64,
}

/// Orders candidates by descending similarity to `query`. Ties keep their
/// input order.
pub fn rank_candidates<I, S>(query: &str, candidates: I) -> Vec<RankedCandidate>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let key: String = candidate.into();
            let score = similarity_ratio(query, &key);
            RankedCandidate { key, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Words of an ingredient name with punctuation removed.
pub fn query_words(name: &str) -> Vec<String> {
    PUNCTUATION_RE
        .replace_all(name, "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Cross-reference keys that share a word with `name`, best match first.
///
/// Keys are gathered word by word and concatenated, so a key containing
/// several of the words appears several times.
pub fn suggest_keys(tree: &KeyTree, name: &str) -> Vec<RankedCandidate> {
    let candidates: Vec<&str> = query_words(name)
        .iter()
        .flat_map(|word| find_keys_with_word(tree, word))
        .collect();

    rank_candidates(name, candidates)
}
