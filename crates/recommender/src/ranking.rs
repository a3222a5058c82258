//! Ranking the catalog for a set of preferred genres.
//!
//! Ranking is a permutation: every input movie comes back exactly once.
//! Watchlisted or already-watched titles are not removed or demoted.

use crate::scorer::WeightedScorer;
use crate::traits::Scorer;
use catalog::{Genre, Movie};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// A movie paired with its score for one ranking call
#[derive(Debug, Clone, Copy)]
pub struct ScoredMovie<'a> {
    pub movie: &'a Movie,
    pub score: f32,
}

/// Score every movie and sort by score, highest first.
///
/// ## Algorithm
/// 1. Score each movie in catalog order
/// 2. Stable sort by score descending, so equal scores keep catalog order
///
/// Uses `f32::total_cmp`, which gives a total order even for NaN ratings
/// and keeps the output deterministic.
pub fn score_catalog<'a, S>(
    scorer: &S,
    catalog: &'a [Movie],
    preferred_genres: &HashSet<Genre>,
) -> Vec<ScoredMovie<'a>>
where
    S: Scorer + ?Sized,
{
    let mut scored: Vec<ScoredMovie<'a>> = catalog
        .iter()
        .map(|movie| ScoredMovie {
            movie,
            score: scorer.score(movie, preferred_genres),
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| by_score_desc(a.score, b.score));

    debug!(
        "{} ranked {} movies against {} preferred genres",
        scorer.name(),
        scored.len(),
        preferred_genres.len()
    );
    scored
}

/// Rank the catalog with any scorer, returning owned movies
pub fn rank_with<S>(scorer: &S, catalog: &[Movie], preferred_genres: &HashSet<Genre>) -> Vec<Movie>
where
    S: Scorer + ?Sized,
{
    score_catalog(scorer, catalog, preferred_genres)
        .into_iter()
        .map(|scored| scored.movie.clone())
        .collect()
}

/// Rank the catalog from most to least relevant with the standard weights.
///
/// # Arguments
/// * `catalog` - Movies in catalog order; may be empty
/// * `preferred_genres` - The user's genres; may be empty, which ranks by rating alone
///
/// # Returns
/// The same movies, reordered
pub fn rank(catalog: &[Movie], preferred_genres: &HashSet<Genre>) -> Vec<Movie> {
    rank_with(&WeightedScorer::new(), catalog, preferred_genres)
}

fn by_score_desc(a: f32, b: f32) -> Ordering {
    b.total_cmp(&a)
}
