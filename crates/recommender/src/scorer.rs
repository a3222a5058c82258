//! The default linear scorer: genre affinity plus rating.
//!
//! ```text
//! score(m) = 5 * |genres(m) ∩ preferred| + 2 * rating(m)
//! ```
//!
//! One genre match is worth 2.5 rating points, so a movie with no overlap
//! only overtakes a movie with one extra match when its rating is more than
//! 2.5 points higher.

use crate::traits::Scorer;
use catalog::{Genre, Movie};
use std::collections::HashSet;

/// Points per preferred genre the movie carries
pub const GENRE_MATCH_WEIGHT: f32 = 5.0;

/// Points per rating point
pub const RATING_WEIGHT: f32 = 2.0;

/// Weights of the linear scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub genre_match: f32,
    pub rating: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            genre_match: GENRE_MATCH_WEIGHT,
            rating: RATING_WEIGHT,
        }
    }
}

/// Scores movies by genre affinity and average rating.
#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    weights: ScoringWeights,
}

impl WeightedScorer {
    /// Create a scorer with the standard weights (5 per genre, 2 per rating point)
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the per-genre weight (default: 5.0)
    pub fn with_genre_weight(mut self, weight: f32) -> Self {
        self.weights.genre_match = weight;
        self
    }

    /// Configure the per-rating-point weight (default: 2.0)
    pub fn with_rating_weight(mut self, weight: f32) -> Self {
        self.weights.rating = weight;
        self
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }
}

impl Scorer for WeightedScorer {
    fn name(&self) -> &str {
        "WeightedScorer"
    }

    fn score(&self, movie: &Movie, preferred_genres: &HashSet<Genre>) -> f32 {
        let matches = genre_affinity(movie, preferred_genres) as f32;
        self.weights.genre_match * matches + self.weights.rating * movie.rating
    }
}

/// Count the distinct genres of `movie` that are in `preferred_genres`.
///
/// Walks the preference set (one to five genres from signup) and checks each
/// against the movie's short genre list. Every preferred genre is counted at
/// most once, so a genre listed twice on the movie still counts once.
pub fn genre_affinity(movie: &Movie, preferred_genres: &HashSet<Genre>) -> usize {
    preferred_genres
        .iter()
        .filter(|&genre| movie.genres.contains(genre))
        .count()
}
