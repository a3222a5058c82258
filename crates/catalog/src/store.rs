//! Storage interface for the Movie, User and Review collections.
//!
//! Services take these traits instead of a concrete store so tests can hand
//! in fixtures. `MemoryStore` is the implementation shipped with the crate.

use crate::error::{CatalogError, Result};
use crate::types::*;
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::debug;

/// Length of generated movie, user and review ids
pub const ID_LEN: usize = 9;

/// Read and append access to the movie catalog
pub trait MovieStore {
    /// The whole catalog in insertion order
    fn movies(&self) -> &[Movie];

    fn movie(&self, id: &str) -> Option<&Movie>;

    /// Ids of the movies tagged with `genre`, in catalog order
    fn movie_ids_by_genre(&self, genre: Genre) -> &[MovieId];

    /// Append a new title. The store assigns the id and zeroes `rating` and
    /// `view_count`.
    fn add_movie(&mut self, draft: MovieDraft) -> Result<Movie>;
}

/// CRUD access to accounts
pub trait UserStore {
    fn users(&self) -> &[User];

    fn user(&self, id: &str) -> Option<&User>;

    fn user_by_email(&self, email: &str) -> Option<&User>;

    /// Add a new account; fails with `EmailTaken` if the email is in use
    fn insert_user(&mut self, user: User) -> Result<()>;

    /// Replace the account with the same id; fails with `EmailTaken` if the
    /// new email belongs to another account
    fn update_user(&mut self, user: User) -> Result<User>;
}

/// Access to reviews
pub trait ReviewStore {
    fn reviews(&self) -> &[Review];

    /// Add a review of an existing movie
    fn add_review(&mut self, review: Review) -> Result<()>;
}

/// Generate a random lowercase alphanumeric id
pub fn generate_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}

impl MemoryStore {
    fn fresh_movie_id(&self) -> MovieId {
        loop {
            let id = generate_id();
            if !self.movie_positions.contains_key(&id) {
                return id;
            }
        }
    }
}

impl MovieStore for MemoryStore {
    fn movies(&self) -> &[Movie] {
        &self.movies
    }

    fn movie(&self, id: &str) -> Option<&Movie> {
        self.get_movie(id)
    }

    fn movie_ids_by_genre(&self, genre: Genre) -> &[MovieId] {
        self.get_movies_by_genre(genre)
    }

    fn add_movie(&mut self, draft: MovieDraft) -> Result<Movie> {
        let movie = draft.into_movie(self.fresh_movie_id());
        debug!("Adding movie {} ({})", movie.id, movie.title);
        self.write_through(|s| s.movies.push(movie.clone()))?;
        self.insert_movie(movie.clone());
        Ok(movie)
    }
}

impl UserStore for MemoryStore {
    fn users(&self) -> &[User] {
        &self.users
    }

    fn user(&self, id: &str) -> Option<&User> {
        self.get_user(id)
    }

    fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    fn insert_user(&mut self, user: User) -> Result<()> {
        if self.user_by_email(&user.email).is_some() {
            return Err(CatalogError::EmailTaken(user.email));
        }
        if self.get_user(&user.id).is_some() {
            return Err(CatalogError::Validation(format!(
                "duplicate user id {}",
                user.id
            )));
        }
        debug!("Inserting user {}", user.id);
        self.write_through(|s| s.users.push(user.clone()))?;
        self.insert_user_record(user);
        Ok(())
    }

    fn update_user(&mut self, user: User) -> Result<User> {
        let pos = self
            .users
            .iter()
            .position(|u| u.id == user.id)
            .ok_or_else(|| CatalogError::not_found("User", user.id.clone()))?;
        if let Some(other) = self.user_by_email(&user.email)
            && other.id != user.id
        {
            return Err(CatalogError::EmailTaken(user.email));
        }

        self.write_through(|s| s.users[pos] = user.clone())?;
        self.users[pos] = user.clone();
        Ok(user)
    }
}

impl ReviewStore for MemoryStore {
    fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    fn add_review(&mut self, review: Review) -> Result<()> {
        if self.get_movie(&review.movie_id).is_none() {
            return Err(CatalogError::not_found("Movie", review.movie_id));
        }
        self.write_through(|s| s.reviews.push(review.clone()))?;
        self.insert_review_record(review);
        Ok(())
    }
}
