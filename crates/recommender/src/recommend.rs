//! Per-user recommendations with the unknown-user fallback.

use crate::ranking::rank;
use catalog::{Movie, User};
use serde::Serialize;
use tracing::{debug, warn};

/// How many catalog entries an unknown user gets
pub const FALLBACK_SIZE: usize = 5;

/// Result of asking for recommendations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "movies", rename_all = "lowercase")]
pub enum Recommendation {
    /// The whole catalog ranked for a known user
    Personalized(Vec<Movie>),
    /// The first catalog entries in catalog order, unscored
    Fallback(Vec<Movie>),
}

impl Recommendation {
    pub fn movies(&self) -> &[Movie] {
        match self {
            Recommendation::Personalized(movies) | Recommendation::Fallback(movies) => movies,
        }
    }

    pub fn is_personalized(&self) -> bool {
        matches!(self, Recommendation::Personalized(_))
    }
}

/// Recommend movies for `user`, or fall back when there is no user record.
///
/// An unknown user is not an error: they get the first [`FALLBACK_SIZE`]
/// catalog entries so the caller can still render something.
pub fn recommend(catalog: &[Movie], user: Option<&User>) -> Recommendation {
    match user {
        Some(user) => {
            debug!(
                "Ranking {} movies for user {} ({} preferred genres)",
                catalog.len(),
                user.id,
                user.preferred_genres.len()
            );
            Recommendation::Personalized(rank(catalog, &user.preferred_genres))
        }
        None => {
            warn!("No user record available, falling back to first {} catalog entries", FALLBACK_SIZE);
            Recommendation::Fallback(catalog.iter().take(FALLBACK_SIZE).cloned().collect())
        }
    }
}
