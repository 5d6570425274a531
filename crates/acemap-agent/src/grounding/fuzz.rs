//! Lexical similarity scores in the 0-100 "fuzzy ratio" convention.
//!
//! [`weighted_ratio`] is the scorer used for grounding. It combines the plain
//! indel ratio with partial-substring and token-order-insensitive variants,
//! so "Tectonics plate" still matches "Plate tectonics" and a short typo'd
//! term can match inside a longer canonical phrase.
//!
//! Character-level similarity comes from `rapidfuzz`'s indel distance; this
//! module only adds the token handling and the weighting.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;

/// Scale applied to token-based variants.
const UNBASE_SCALE: f64 = 0.95;

/// Scale applied to partial variants when lengths differ by 1.5x or more.
const PARTIAL_SCALE: f64 = 0.90;

/// Scale applied to partial variants when lengths differ by more than 8x.
const LONG_PARTIAL_SCALE: f64 = 0.6;

/// Lowercase, replace everything except letters, digits and `_` with spaces, trim.
#[must_use]
pub fn full_process(s: &str) -> String {
    let mapped: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    mapped.trim().to_string()
}

/// Indel similarity, `2 * LCS / (|a| + |b|)` scaled to 0-100.
///
/// Either side empty scores 0.
#[must_use]
pub fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    to_score(indel::normalized_similarity(a.chars(), b.chars()))
}

/// Best [`ratio`] of the shorter string against every equally long window of the longer.
#[must_use]
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    let mut best = 0.0_f64;
    for window in longer.windows(shorter.len()) {
        let similarity =
            indel::normalized_similarity(shorter.iter().copied(), window.iter().copied());
        if similarity > 0.995 {
            return 100;
        }
        best = best.max(similarity);
    }
    to_score(best)
}

/// [`ratio`] after sorting the whitespace-separated tokens of both sides.
#[must_use]
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// [`partial_ratio`] after sorting the tokens of both sides.
#[must_use]
pub fn partial_token_sort_ratio(a: &str, b: &str) -> u8 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Set-based token comparison: shared tokens against each side's remainder.
#[must_use]
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    token_set(a, b, ratio)
}

/// [`token_set_ratio`] using [`partial_ratio`] for the pairwise comparisons.
#[must_use]
pub fn partial_token_set_ratio(a: &str, b: &str) -> u8 {
    token_set(a, b, partial_ratio)
}

/// Weighted combination of all scorers on pre-processed input.
///
/// Both sides go through [`full_process`]; if either is empty afterwards the
/// score is 0.
#[must_use]
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    weighted_ratio_processed(&full_process(a), &full_process(b))
}

/// [`weighted_ratio`] for input that already went through [`full_process`].
#[must_use]
pub fn weighted_ratio_processed(p1: &str, p2: &str) -> u8 {
    let len1 = p1.chars().count();
    let len2 = p2.chars().count();
    if len1 == 0 || len2 == 0 {
        return 0;
    }

    let base = f64::from(ratio(p1, p2));
    let len_ratio = len1.max(len2) as f64 / len1.min(len2) as f64;

    let best = if len_ratio < 1.5 {
        let tsor = f64::from(token_sort_ratio(p1, p2)) * UNBASE_SCALE;
        let tser = f64::from(token_set_ratio(p1, p2)) * UNBASE_SCALE;
        base.max(tsor).max(tser)
    } else {
        let partial_scale = if len_ratio > 8.0 { LONG_PARTIAL_SCALE } else { PARTIAL_SCALE };
        let partial = f64::from(partial_ratio(p1, p2)) * partial_scale;
        let ptsor =
            f64::from(partial_token_sort_ratio(p1, p2)) * UNBASE_SCALE * partial_scale;
        let ptser = f64::from(partial_token_set_ratio(p1, p2)) * UNBASE_SCALE * partial_scale;
        base.max(partial).max(ptsor).max(ptser)
    };

    best.round() as u8
}

fn to_score(raw: f64) -> u8 {
    (raw * 100.0).round() as u8
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_set(a: &str, b: &str, scorer: fn(&str, &str) -> u8) -> u8 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |set: Vec<&str>| set.join(" ");
    let intersection = join(tokens_a.intersection(&tokens_b).copied().collect());
    let diff_ab = join(tokens_a.difference(&tokens_b).copied().collect());
    let diff_ba = join(tokens_b.difference(&tokens_a).copied().collect());

    let combined_ab = format!("{intersection} {diff_ab}").trim().to_string();
    let combined_ba = format!("{intersection} {diff_ba}").trim().to_string();

    [
        scorer(&intersection, &combined_ab),
        scorer(&intersection, &combined_ba),
        scorer(&combined_ab, &combined_ba),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}
