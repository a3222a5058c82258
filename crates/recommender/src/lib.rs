//! Ranking and browsing for the CineSense catalog.
//!
//! This crate provides:
//! - Scorer trait and the default `WeightedScorer`
//! - `rank` for ordering the catalog by relevance to a user's genres
//! - `recommend`, which adds the unknown-user fallback
//! - Dashboard rows (trending, browse by genre, watchlist)
//!
//! Everything here is pure: no I/O, no state kept between calls.
//!
//! ## Example Usage
//! ```ignore
//! use recommender::{rank, recommend};
//!
//! let ranked = rank(store.movies(), &user.preferred_genres);
//!
//! // Unknown ids fall back to the first five catalog entries
//! let rec = recommend(store.movies(), store.user(user_id));
//! for movie in rec.movies() {
//!     println!("{}", movie.title);
//! }
//! ```

pub mod traits;
pub mod scorer;
pub mod ranking;
pub mod recommend;
pub mod browse;

// Re-export main types
pub use traits::Scorer;
pub use scorer::{GENRE_MATCH_WEIGHT, RATING_WEIGHT, ScoringWeights, WeightedScorer};
pub use ranking::{ScoredMovie, rank, rank_with, score_catalog};
pub use recommend::{FALLBACK_SIZE, Recommendation, recommend};
pub use browse::{GenreShelf, genre_shelves, trending, watchlist_movies};
