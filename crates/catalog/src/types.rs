//! Core domain types for the CineSense catalog.
//!
//! Field names serialize in camelCase so snapshot files keep the same record
//! layout the demo front end wrote to local storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user ("admin-1" for the seeded admin, random otherwise)
pub type UserId = String;

/// Unique identifier for a movie ("1".."8" for the seed catalog, random otherwise)
pub type MovieId = String;

// =============================================================================
// Movie-related Types
// =============================================================================

/// Movie genres offered by the catalog.
///
/// Genre tags are a closed set: the admin form and the signup form both pick
/// from this list, so anything else in a snapshot is a data error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Horror,
    Music,
    Mystery,
    Romance,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Thriller,
}

impl Genre {
    /// Every genre, in the order the signup form lists them
    pub const ALL: [Genre; 12] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Comedy,
        Genre::Drama,
        Genre::SciFi,
        Genre::Horror,
        Genre::Thriller,
        Genre::Romance,
        Genre::Mystery,
        Genre::Documentary,
        Genre::Crime,
        Genre::Music,
    ];

    /// Display name, identical to the serialized tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::Music => "Music",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Thriller => "Thriller",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A title in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub description: String,
    /// Genre tags in display order; may repeat in hand-edited snapshots
    pub genres: Vec<Genre>,
    pub director: String,
    pub cast: Vec<String>,
    pub year: u16,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    /// Average rating, 0.0 to 5.0
    pub rating: f32,
    pub poster_url: String,
    /// Informational only
    pub view_count: u64,
}

/// Everything an admin supplies when adding a title.
///
/// The store assigns `id`, starts `rating` at 0.0 and `view_count` at 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDraft {
    pub title: String,
    pub description: String,
    pub genres: Vec<Genre>,
    pub director: String,
    pub cast: Vec<String>,
    pub year: u16,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub poster_url: String,
}

impl MovieDraft {
    pub(crate) fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            title: self.title,
            description: self.description,
            genres: self.genres,
            director: self.director,
            cast: self.cast,
            year: self.year,
            duration_minutes: self.duration_minutes,
            rating: 0.0,
            poster_url: self.poster_url,
            view_count: 0,
        }
    }
}

// =============================================================================
// User-related Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

/// An account in the user store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Chosen at signup; hashed for O(1) membership checks while scoring
    pub preferred_genres: HashSet<Genre>,
    pub watchlist: BTreeSet<MovieId>,
    /// Kept on the record, never consulted when ranking
    #[serde(default)]
    pub watched_history: BTreeSet<MovieId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

// =============================================================================
// Review Type
// =============================================================================

/// A user's review of a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub movie_id: MovieId,
    pub user_id: UserId,
    pub user_name: String,
    pub rating: f32,
    pub comment: String,
    /// RFC 3339 in snapshots, e.g. "2024-03-01T18:30:00.000Z"
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// MemoryStore - The In-Memory Backing Store
// =============================================================================

/// Holds every collection of the demo backend.
///
/// Movies stay in a `Vec` because catalog order is observable: the trending
/// row, genre shelves and ranking tie-breaks all follow insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) movies: Vec<Movie>,
    /// Position of each movie in `movies`
    pub(crate) movie_positions: HashMap<MovieId, usize>,
    pub(crate) users: Vec<User>,
    pub(crate) reviews: Vec<Review>,

    /// Movies grouped by genre, each list in catalog order
    pub(crate) genre_index: HashMap<Genre, Vec<MovieId>>,

    /// Where mutations are written through to, if anywhere
    pub(crate) snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Creates a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: &str) -> Option<&Movie> {
        self.movie_positions.get(id).map(|&pos| &self.movies[pos])
    }

    /// Get a user by ID
    pub fn get_user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Get all movies tagged with a genre, in catalog order
    pub fn get_movies_by_genre(&self, genre: Genre) -> &[MovieId] {
        self.genre_index
            .get(&genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Insert a movie at the end of the catalog and index it.
    ///
    /// Does not persist; used while seeding and loading.
    pub fn insert_movie(&mut self, movie: Movie) {
        for genre in &movie.genres {
            let ids = self.genre_index.entry(*genre).or_default();
            // A genre listed twice on one movie would push it twice in a row
            if ids.last() != Some(&movie.id) {
                ids.push(movie.id.clone());
            }
        }
        self.movie_positions.insert(movie.id.clone(), self.movies.len());
        self.movies.push(movie);
    }

    /// Insert a user without persisting
    pub fn insert_user_record(&mut self, user: User) {
        self.users.push(user);
    }

    /// Insert a review without persisting
    pub fn insert_review_record(&mut self, review: Review) {
        self.reviews.push(review);
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.movies.len(), self.users.len(), self.reviews.len())
    }
}
