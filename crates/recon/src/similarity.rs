//! Name-similarity scoring for duplicate suggestion and auto-matching.
//!
//! Metric: normalized edit distance, `1 - levenshtein(a, b) / max(len)`,
//! case-normalized. Scores live in `[0, 1]`; `score(a, a) == 1.0` and the
//! metric is symmetric.

use barkeep_core::entity::{Glass, Ingredient, Recipe};

/// Minimum score for a candidate to be suggested as a probable duplicate.
pub const DUPLICATE_THRESHOLD: f64 = 0.5;

/// Stricter threshold applied to ingredient link URLs.
pub const LINK_THRESHOLD: f64 = 0.8;

/// Levenshtein distance over unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Normalized similarity of two names, case-insensitive.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max = a.chars().count().max(b.chars().count());
    if max == 0 {
        // Two empty names are identical.
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / max as f64
}

// ---------------------------------------------------------------------------
// Per-kind specializations
// ---------------------------------------------------------------------------

pub fn glass_similarity(query: &str, candidate: &Glass) -> f64 {
    name_similarity(query, &candidate.name)
}

pub fn recipe_similarity(query: &str, candidate: &Recipe) -> f64 {
    name_similarity(query, &candidate.name)
}

/// Ingredients additionally match on their shop link: a link score only
/// counts when it clears the stricter [`LINK_THRESHOLD`].
pub fn ingredient_similarity(
    query_name: &str,
    query_link: Option<&str>,
    candidate: &Ingredient,
) -> f64 {
    let mut score = name_similarity(query_name, &candidate.name);
    if let (Some(query_link), Some(candidate_link)) = (query_link, candidate.link.as_deref()) {
        let link_score = name_similarity(query_link, candidate_link);
        if link_score >= LINK_THRESHOLD && link_score > score {
            score = link_score;
        }
    }
    score
}

// ---------------------------------------------------------------------------
// Candidate scanning
// ---------------------------------------------------------------------------

/// One-pass maximum scan. The best pointer moves only on strict
/// improvement, so ties resolve to the first-seen candidate.
pub fn best_match<'a, T>(candidates: &'a [T], score: impl Fn(&T) -> f64) -> Option<(&'a T, f64)> {
    let mut best: Option<(&T, f64)> = None;
    for candidate in candidates {
        let s = score(candidate);
        if best.map_or(true, |(_, top)| s > top) {
            best = Some((candidate, s));
        }
    }
    best
}

/// Best candidate at or above [`DUPLICATE_THRESHOLD`], or `None`.
pub fn probable_duplicate<'a, T>(
    candidates: &'a [T],
    score: impl Fn(&T) -> f64,
) -> Option<(&'a T, f64)> {
    best_match(candidates, score).filter(|(_, s)| *s >= DUPLICATE_THRESHOLD)
}

// Per-kind wrappers used by create surfaces to warn before a near-duplicate
// row is added.

pub fn probable_glass_duplicate<'a>(name: &str, pool: &'a [Glass]) -> Option<(&'a Glass, f64)> {
    probable_duplicate(pool, |g| glass_similarity(name, g))
}

pub fn probable_recipe_duplicate<'a>(name: &str, pool: &'a [Recipe]) -> Option<(&'a Recipe, f64)> {
    probable_duplicate(pool, |r| recipe_similarity(name, r))
}

pub fn probable_ingredient_duplicate<'a>(
    name: &str,
    link: Option<&str>,
    pool: &'a [Ingredient],
) -> Option<(&'a Ingredient, f64)> {
    probable_duplicate(pool, |i| ingredient_similarity(name, link, i))
}
