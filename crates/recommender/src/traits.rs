//! Core traits for scoring movies.
//!
//! This module defines the Scorer trait so ranking can be driven by any
//! relevance function, while the default one stays fixed.

use catalog::{Genre, Movie};
use std::collections::HashSet;

/// Assigns a relevance score to one movie for a set of preferred genres.
///
/// ## Design Note
/// - `Send + Sync` allows one scorer to be shared by concurrent callers
/// - Scoring borrows the movie; it must never mutate it
/// - Equal inputs must give equal scores, ranking relies on it for ties
pub trait Scorer: Send + Sync {
    /// Returns the name of this scorer (for logging/debugging)
    fn name(&self) -> &str;

    /// Score a movie. Higher means more relevant.
    fn score(&self, movie: &Movie, preferred_genres: &HashSet<Genre>) -> f32;
}
