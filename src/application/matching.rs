//! Fuzzy string matching for question lookup
//!
//! Scores are integers from 0 to 100. The scorer is a weighted ratio: the
//! best of a plain edit-distance ratio, token-order-insensitive ratios and,
//! for strings of very different length, the best-aligned window of the
//! longer string.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Minimum score a match needs unless configured otherwise
pub const DEFAULT_CUTOFF: u8 = 70;

const TOKEN_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.9;
const FAR_PARTIAL_SCALE: f64 = 0.6;

/// Best candidate found for a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub key: String,
    pub score: u8,
}

/// Find the single best key for `query`.
///
/// Returns `None` when no key reaches `cutoff`. On equal scores the key that
/// comes first in `keys` wins.
pub fn best_match(query: &str, keys: &[String], cutoff: u8) -> Option<Match> {
    let processed = process(query);
    if processed.is_empty() {
        return None;
    }

    let mut best: Option<Match> = None;
    for key in keys {
        let score = weighted_ratio(&processed, &process(key));
        if score < cutoff {
            continue;
        }
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(Match { key: key.clone(), score });
            if score == 100 {
                break;
            }
        }
    }
    best
}

/// Similarity of two raw strings, 0-100
pub fn score(a: &str, b: &str) -> u8 {
    weighted_ratio(&process(a), &process(b))
}

/// Lowercase, turn every non-alphanumeric char into a space, collapse spaces.
pub fn process(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn weighted_ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let base = ratio(a, b);
    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    let best = if len_ratio < 1.5 {
        base.max(token_sort_ratio(a, b) * TOKEN_SCALE)
            .max(token_set_ratio(a, b) * TOKEN_SCALE)
    } else {
        let scale = if len_ratio < 8.0 { PARTIAL_SCALE } else { FAR_PARTIAL_SCALE };
        base.max(partial_ratio(a, b) * scale)
            .max(token_sort_ratio(a, b) * TOKEN_SCALE * scale)
            .max(token_set_ratio(a, b) * TOKEN_SCALE * scale)
    };

    best.round().clamp(0.0, 100.0) as u8
}

fn ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();

    let common = join_tokens(set_a.intersection(&set_b).copied());
    let only_a = join_tokens(set_a.difference(&set_b).copied());
    let only_b = join_tokens(set_b.difference(&set_a).copied());

    let with_a = join_parts(&common, &only_a);
    let with_b = join_parts(&common, &only_b);

    ratio(&common, &with_a)
        .max(ratio(&common, &with_b))
        .max(ratio(&with_a, &with_b))
}

fn join_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens.collect::<Vec<_>>().join(" ")
}

fn join_parts(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{} {}", head, tail),
    }
}

/// Best ratio between the shorter string and any same-length window of the longer one
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() { (a, b) } else { (b, a) };
    let long_chars: Vec<char> = long.chars().collect();
    let width = short.chars().count();
    if width == 0 {
        return 0.0;
    }

    long_chars
        .windows(width)
        .map(|window| ratio(short, &window.iter().collect::<String>()))
        .fold(0.0, f64::max)
}
