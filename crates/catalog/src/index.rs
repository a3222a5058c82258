//! Building, validating and persisting the MemoryStore.
//!
//! A store is either purely in memory or bound to a snapshot file. A bound
//! store rewrites the whole snapshot after every mutation, the same
//! write-through behavior the demo had with browser local storage.

use crate::error::{CatalogError, Result};
use crate::parser::{self, Snapshot};
use crate::types::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

impl MemoryStore {
    /// Open the store backed by `path`.
    ///
    /// Loads the snapshot when the file exists. Otherwise seeds the demo
    /// catalog and writes it out so the next run finds it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let mut store = if path.exists() {
            info!("Loading store snapshot from {:?}", path);
            Self::from_snapshot(parser::parse_snapshot(&path)?)?
        } else {
            info!("No snapshot at {:?}, seeding demo catalog", path);
            Self::seeded()
        };

        store.snapshot_path = Some(path);
        store.persist()?;

        let (movies, users, reviews) = store.counts();
        info!(
            "Store ready: {} movies, {} users, {} reviews",
            movies, users, reviews
        );
        Ok(store)
    }

    /// Build an in-memory store from a snapshot, validating it first
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        validate(&snapshot)?;

        let mut store = MemoryStore::new();
        for movie in snapshot.movies {
            store.insert_movie(movie);
        }
        for user in snapshot.users {
            store.insert_user_record(user);
        }
        for review in snapshot.reviews {
            store.insert_review_record(review);
        }
        Ok(store)
    }

    /// Copy every collection out into a snapshot
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            movies: self.movies.clone(),
            users: self.users.clone(),
            reviews: self.reviews.clone(),
        }
    }

    /// Path this store writes through to, if any
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Write the snapshot if this store is bound to a file
    pub(crate) fn persist(&self) -> Result<()> {
        self.write_through(|_| ())
    }

    /// Write the snapshot as it will look after `change`, before the change
    /// is applied in memory.
    ///
    /// Callers apply the change to `self` only when this returns `Ok`, so a
    /// failed write leaves memory and disk agreeing on the old state.
    pub(crate) fn write_through<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Snapshot),
    {
        if let Some(path) = &self.snapshot_path {
            let mut candidate = self.snapshot();
            change(&mut candidate);
            debug!("Persisting snapshot to {:?}", path);
            parser::write_snapshot(path, &candidate)?;
        }
        Ok(())
    }
}

/// Validate snapshot integrity
///
/// Check that:
/// - Movie ids are unique
/// - Movie ratings are in 0.0 - 5.0
/// - User ids and emails are unique
/// - Every review points at an existing movie with a rating in 0.0 - 5.0
pub fn validate(snapshot: &Snapshot) -> Result<()> {
    let mut movie_ids = HashSet::new();
    for movie in &snapshot.movies {
        if !movie_ids.insert(movie.id.as_str()) {
            return Err(CatalogError::Validation(format!(
                "duplicate movie id {}",
                movie.id
            )));
        }
        if !(0.0..=5.0).contains(&movie.rating) {
            return Err(CatalogError::InvalidValue {
                field: "rating".to_string(),
                value: movie.rating.to_string(),
            });
        }
    }

    let mut user_ids = HashSet::new();
    let mut emails = HashSet::new();
    for user in &snapshot.users {
        if !user_ids.insert(user.id.as_str()) {
            return Err(CatalogError::Validation(format!(
                "duplicate user id {}",
                user.id
            )));
        }
        if !emails.insert(user.email.as_str()) {
            return Err(CatalogError::EmailTaken(user.email.clone()));
        }
    }

    for review in &snapshot.reviews {
        if !movie_ids.contains(review.movie_id.as_str()) {
            return Err(CatalogError::not_found("Movie", review.movie_id.clone()));
        }
        if !(0.0..=5.0).contains(&review.rating) {
            return Err(CatalogError::InvalidValue {
                field: "review rating".to_string(),
                value: review.rating.to_string(),
            });
        }
    }
    Ok(())
}
