// src/query.rs

//! Random pick and substring search over the cache.

use caseless::default_case_fold_str;
use rand::Rng;

use crate::cache::PostCache;
use crate::error::{AppError, Result};
use crate::models::PostRecord;

/// Minimum search query length, counted in characters before case folding.
pub const MIN_QUERY_LEN: usize = 3;

/// A uniformly random cached post.
pub fn random_post<'a>(cache: &'a PostCache, rng: &mut impl Rng) -> Result<&'a PostRecord> {
    if cache.is_empty() {
        return Err(AppError::EmptyCache);
    }
    let index = rng.gen_range(0..cache.len());
    Ok(&cache.records()[index])
}

/// Case-insensitive substring search, results in cache order.
///
/// Both sides go through full Unicode case folding, so non-ASCII summaries
/// match regardless of the case the query arrives in. An empty result is a
/// valid outcome, distinct from the too-short error.
pub fn search<'a>(cache: &'a PostCache, query: &str) -> Result<Vec<&'a PostRecord>> {
    if query.chars().count() < MIN_QUERY_LEN {
        return Err(AppError::QueryTooShort { min: MIN_QUERY_LEN });
    }

    let folded = default_case_fold_str(query);
    Ok(cache
        .records()
        .iter()
        .filter(|record| default_case_fold_str(&record.summary).contains(&folded))
        .collect())
}
