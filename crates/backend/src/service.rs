//! # Backend Service
//!
//! The async facade the front end talks to. It owns the store behind a
//! `tokio::sync::RwLock`, awaits the configured latency before each call and
//! routes reads through the recommender.
//!
//! Reads take the read lock and clone what they return; mutations take the
//! write lock and let the store write through to its snapshot.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use catalog::{
    CatalogError, Genre, MemoryStore, Movie, MovieDraft, MovieId, MovieStore, Review, ReviewStore,
    User, UserRole, UserStore, generate_id,
};
use recommender::{GenreShelf, Recommendation, genre_shelves, recommend, trending, watchlist_movies};

use crate::config::BackendConfig;
use crate::error::{BackendError, Result};

/// Highest star rating a review may give
pub const MAX_REVIEW_RATING: f32 = 5.0;

/// Bounds on how many genres a new account may pick
pub const MIN_SIGNUP_GENRES: usize = 1;
pub const MAX_SIGNUP_GENRES: usize = 5;

/// Everything the signup form collects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    /// Accepted and discarded; there is no credential check
    pub password: String,
    pub genres: Vec<Genre>,
}

/// Counters shown on the admin page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_movies: usize,
    pub total_users: usize,
    pub total_reviews: usize,
    /// Mean catalog rating, 0.0 for an empty catalog
    pub avg_rating: f32,
}

/// Rows rendered on a user's home page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub recommended: Recommendation,
    pub trending: Vec<Movie>,
    pub shelves: Vec<GenreShelf>,
}

/// Async backend over any store implementing the catalog traits
pub struct Backend<S> {
    store: Arc<RwLock<S>>,
    latency: Duration,
}

impl<S> Clone for Backend<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            latency: self.latency,
        }
    }
}

impl Backend<MemoryStore> {
    /// Open the snapshot named by `config` (seeding it if missing)
    pub fn open(config: &BackendConfig) -> Result<Self> {
        let store = MemoryStore::open(config.store_path.clone())?;
        info!(
            "Backend ready with store at {} ({} ms latency)",
            config.store_path.display(),
            config.latency_ms
        );
        Ok(Self::new(store).with_latency(config.latency()))
    }
}

impl<S> Backend<S>
where
    S: MovieStore + UserStore + ReviewStore + Send + Sync,
{
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Create a regular account.
    ///
    /// # Errors
    /// - `InvalidInput` for a blank name or email, or a genre selection
    ///   outside 1..=5 distinct genres
    /// - `Store(EmailTaken)` when another account has the email
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: SignupRequest) -> Result<User> {
        self.simulate_latency().await;

        let name = request.name.trim();
        let email = request.email.trim();
        if name.is_empty() {
            return Err(BackendError::InvalidInput("name is required".to_string()));
        }
        if email.is_empty() {
            return Err(BackendError::InvalidInput("email is required".to_string()));
        }

        let preferred_genres: HashSet<Genre> = request.genres.into_iter().collect();
        if !(MIN_SIGNUP_GENRES..=MAX_SIGNUP_GENRES).contains(&preferred_genres.len()) {
            return Err(BackendError::InvalidInput(format!(
                "pick between {} and {} genres, got {}",
                MIN_SIGNUP_GENRES,
                MAX_SIGNUP_GENRES,
                preferred_genres.len()
            )));
        }

        let mut store = self.store.write().await;
        let mut id = generate_id();
        while store.user(&id).is_some() {
            id = generate_id();
        }

        let user = User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role: UserRole::User,
            preferred_genres,
            watchlist: BTreeSet::new(),
            watched_history: BTreeSet::new(),
            avatar_url: Some(avatar_url(name)),
        };
        store.insert_user(user.clone())?;

        info!("Signed up user {}", user.id);
        Ok(user)
    }

    /// Look up an account by email. The password is not checked.
    #[instrument(skip(self, _password))]
    pub async fn login(&self, email: &str, _password: &str) -> Result<User> {
        self.simulate_latency().await;

        let store = self.store.read().await;
        match store.user_by_email(email.trim()) {
            Some(user) => {
                debug!("User {} logged in", user.id);
                Ok(user.clone())
            }
            None => {
                warn!("Login attempt for unknown email");
                Err(BackendError::InvalidCredentials)
            }
        }
    }

    /// Replace a stored account with `user`
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn update_user(&self, user: User) -> Result<User> {
        self.simulate_latency().await;
        Ok(self.store.write().await.update_user(user)?)
    }

    pub async fn user(&self, user_id: &str) -> Option<User> {
        self.simulate_latency().await;
        self.store.read().await.user(user_id).cloned()
    }

    // =========================================================================
    // Movies
    // =========================================================================

    /// The full catalog in catalog order
    pub async fn movies(&self) -> Vec<Movie> {
        self.simulate_latency().await;
        self.store.read().await.movies().to_vec()
    }

    pub async fn movie(&self, movie_id: &str) -> Option<Movie> {
        self.simulate_latency().await;
        self.store.read().await.movie(movie_id).cloned()
    }

    /// Append a title to the catalog. Only admins may do this.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn add_movie(&self, actor_id: &str, draft: MovieDraft) -> Result<Movie> {
        self.simulate_latency().await;

        let mut store = self.store.write().await;
        let actor = store
            .user(actor_id)
            .ok_or_else(|| CatalogError::not_found("User", actor_id))?;
        if !actor.is_admin() {
            warn!("Non-admin {} tried to add a movie", actor_id);
            return Err(BackendError::Forbidden(actor_id.to_string()));
        }

        let movie = store.add_movie(draft)?;
        info!("Added movie {} ({})", movie.id, movie.title);
        Ok(movie)
    }

    // =========================================================================
    // Recommendations
    // =========================================================================

    /// Ranked catalog for `user_id`, or the catalog prefix for unknown ids
    #[instrument(skip(self))]
    pub async fn recommended(&self, user_id: &str) -> Recommendation {
        self.simulate_latency().await;

        let start_time = Instant::now();
        let store = self.store.read().await;
        let recommendation = recommend(store.movies(), store.user(user_id));

        info!(
            "Recommended {} movies for {} ({}) in {:.2?}",
            recommendation.movies().len(),
            user_id,
            if recommendation.is_personalized() { "personalized" } else { "fallback" },
            start_time.elapsed()
        );
        recommendation
    }

    /// Recommendations plus the trending and browse-by-genre rows
    #[instrument(skip(self))]
    pub async fn dashboard(&self, user_id: &str) -> Dashboard {
        self.simulate_latency().await;

        let store = self.store.read().await;
        let catalog = store.movies();
        Dashboard {
            recommended: recommend(catalog, store.user(user_id)),
            trending: trending(catalog).to_vec(),
            shelves: genre_shelves(&*store),
        }
    }

    // =========================================================================
    // Watchlist
    // =========================================================================

    /// Add `movie_id` to the watchlist if absent, remove it if present.
    ///
    /// Returns the updated watchlist. Adding requires the movie to exist;
    /// removing a stale id always succeeds.
    #[instrument(skip(self))]
    pub async fn toggle_watchlist(&self, user_id: &str, movie_id: &str) -> Result<BTreeSet<MovieId>> {
        self.simulate_latency().await;

        let mut store = self.store.write().await;
        let mut user = store
            .user(user_id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("User", user_id))?;

        if !user.watchlist.remove(movie_id) {
            if store.movie(movie_id).is_none() {
                return Err(CatalogError::not_found("Movie", movie_id).into());
            }
            user.watchlist.insert(movie_id.to_string());
            debug!("Added {} to watchlist of {}", movie_id, user_id);
        } else {
            debug!("Removed {} from watchlist of {}", movie_id, user_id);
        }

        let updated = store.update_user(user)?;
        Ok(updated.watchlist)
    }

    /// Watchlisted movies in catalog order
    pub async fn watchlist(&self, user_id: &str) -> Result<Vec<Movie>> {
        self.simulate_latency().await;

        let store = self.store.read().await;
        let user = store
            .user(user_id)
            .ok_or_else(|| CatalogError::not_found("User", user_id))?;
        Ok(watchlist_movies(store.movies(), user)
            .into_iter()
            .cloned()
            .collect())
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// Record a review of `movie_id` written by `user_id`.
    ///
    /// # Errors
    /// - `InvalidInput` for a rating outside 1..=5 stars
    /// - `Store(NotFound)` for an unknown user or movie
    #[instrument(skip(self, comment))]
    pub async fn add_review(
        &self,
        user_id: &str,
        movie_id: &str,
        rating: f32,
        comment: &str,
    ) -> Result<Review> {
        self.simulate_latency().await;

        if !(1.0..=MAX_REVIEW_RATING).contains(&rating) {
            return Err(BackendError::InvalidInput(format!(
                "rating must be between 1 and {}, got {}",
                MAX_REVIEW_RATING, rating
            )));
        }

        let mut store = self.store.write().await;
        let user_name = store
            .user(user_id)
            .map(|u| u.name.clone())
            .ok_or_else(|| CatalogError::not_found("User", user_id))?;

        let review = Review {
            id: generate_id(),
            movie_id: movie_id.to_string(),
            user_id: user_id.to_string(),
            user_name,
            rating,
            comment: comment.trim().to_string(),
            created_at: Utc::now(),
        };
        store.add_review(review.clone())?;

        info!("User {} reviewed movie {}", user_id, movie_id);
        Ok(review)
    }

    /// Reviews of one movie, oldest first
    pub async fn reviews(&self, movie_id: &str) -> Result<Vec<Review>> {
        self.simulate_latency().await;

        let store = self.store.read().await;
        if store.movie(movie_id).is_none() {
            return Err(CatalogError::not_found("Movie", movie_id).into());
        }
        Ok(store
            .reviews()
            .iter()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect())
    }

    // =========================================================================
    // Admin
    // =========================================================================

    pub async fn admin_stats(&self) -> AdminStats {
        self.simulate_latency().await;

        let store = self.store.read().await;
        let movies = store.movies();
        let rating_sum: f32 = movies.iter().map(|m| m.rating).sum();

        AdminStats {
            total_movies: movies.len(),
            total_users: store.users().len(),
            total_reviews: store.reviews().len(),
            avg_rating: rating_sum / movies.len().max(1) as f32,
        }
    }
}

/// Generated avatar image for a new account
fn avatar_url(name: &str) -> String {
    let words: Vec<String> = name
        .split_whitespace()
        .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect();
    format!(
        "https://ui-avatars.com/api/?name={}&background=random",
        words.join("+")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::seed::{ADMIN_EMAIL, ADMIN_ID};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn build_test_backend() -> Backend<MemoryStore> {
        Backend::new(MemoryStore::seeded())
    }

    fn signup_request(email: &str, genres: Vec<Genre>) -> SignupRequest {
        SignupRequest {
            name: "Test Viewer".to_string(),
            email: email.to_string(),
            password: "hunter2".to_string(),
            genres,
        }
    }

    fn draft(title: &str) -> MovieDraft {
        MovieDraft {
            title: title.to_string(),
            description: "Fresh off the festival circuit".to_string(),
            genres: vec![Genre::Horror],
            director: "Someone New".to_string(),
            cast: vec!["Lead Actor".to_string()],
            year: 2024,
            duration_minutes: 95,
            poster_url: "https://picsum.photos/seed/new/300/450".to_string(),
        }
    }

    fn ids(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.id.as_str()).collect()
    }

    // ============================================================================
    // Auth
    // ============================================================================

    #[tokio::test]
    async fn test_signup_creates_regular_user() {
        let backend = build_test_backend();
        let user = backend
            .signup(signup_request("new@example.com", vec![Genre::Drama, Genre::Drama]))
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.id.len(), catalog::store::ID_LEN);
        assert_eq!(user.preferred_genres, HashSet::from([Genre::Drama]));
        assert!(user.watchlist.is_empty());
        assert_eq!(backend.user(&user.id).await, Some(user));
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email() {
        let backend = build_test_backend();
        let err = backend
            .signup(signup_request(ADMIN_EMAIL, vec![Genre::Action]))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Store(CatalogError::EmailTaken(_))));
        assert_eq!(backend.admin_stats().await.total_users, 1);
    }

    #[tokio::test]
    async fn test_signup_genre_bounds() {
        let backend = build_test_backend();

        let none = backend.signup(signup_request("a@example.com", vec![])).await;
        assert!(matches!(none, Err(BackendError::InvalidInput(_))));

        let six = Genre::ALL[..6].to_vec();
        let too_many = backend.signup(signup_request("b@example.com", six)).await;
        assert!(matches!(too_many, Err(BackendError::InvalidInput(_))));

        let five = Genre::ALL[..5].to_vec();
        assert!(backend.signup(signup_request("c@example.com", five)).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_matches_email_only() {
        let backend = build_test_backend();

        let admin = backend.login(ADMIN_EMAIL, "anything").await.unwrap();
        assert_eq!(admin.id, ADMIN_ID);

        let err = backend.login("ghost@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let backend = build_test_backend();
        let mut user = backend.login(ADMIN_EMAIL, "").await.unwrap();
        user.id = "missing".to_string();

        let err = backend.update_user(user).await.unwrap_err();
        assert!(matches!(err, BackendError::Store(CatalogError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_user_cannot_take_another_email() {
        let backend = build_test_backend();
        let mut user = backend
            .signup(signup_request("a@example.com", vec![Genre::Crime]))
            .await
            .unwrap();
        user.email = ADMIN_EMAIL.to_string();

        let err = backend.update_user(user.clone()).await.unwrap_err();
        assert!(matches!(err, BackendError::Store(CatalogError::EmailTaken(_))));
        assert_eq!(
            backend.user(&user.id).await.map(|u| u.email),
            Some("a@example.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_signup_generates_avatar() {
        let backend = build_test_backend();
        let mut request = signup_request("mary@example.com", vec![Genre::Drama]);
        request.name = "Mary  O'Neil".to_string();

        let user = backend.signup(request).await.unwrap();
        assert_eq!(
            user.avatar_url.as_deref(),
            Some("https://ui-avatars.com/api/?name=Mary+ONeil&background=random")
        );
    }

    // ============================================================================
    // Movies
    // ============================================================================

    #[tokio::test]
    async fn test_admin_adds_movie_at_end_of_catalog() {
        let backend = build_test_backend();
        let movie = backend.add_movie(ADMIN_ID, draft("Newcomer")).await.unwrap();

        assert_eq!(movie.rating, 0.0);
        assert_eq!(movie.view_count, 0);

        let movies = backend.movies().await;
        assert_eq!(movies.len(), 9);
        assert_eq!(movies.last().map(|m| m.id.as_str()), Some(movie.id.as_str()));
        assert_eq!(backend.movie(&movie.id).await, Some(movie));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_add_movie() {
        let backend = build_test_backend();
        let user = backend
            .signup(signup_request("viewer@example.com", vec![Genre::Comedy]))
            .await
            .unwrap();

        let forbidden = backend.add_movie(&user.id, draft("Nope")).await;
        assert!(matches!(forbidden, Err(BackendError::Forbidden(_))));

        let unknown = backend.add_movie("nobody", draft("Nope")).await;
        assert!(matches!(unknown, Err(BackendError::Store(CatalogError::NotFound { .. }))));

        assert_eq!(backend.movies().await.len(), 8);
    }

    // ============================================================================
    // Recommendations
    // ============================================================================

    #[tokio::test]
    async fn test_recommended_for_known_user() {
        let backend = build_test_backend();
        let user = backend
            .signup(signup_request("drama@example.com", vec![Genre::Drama, Genre::Music]))
            .await
            .unwrap();

        let rec = backend.recommended(&user.id).await;
        assert!(rec.is_personalized());
        assert_eq!(ids(rec.movies()), vec!["7", "2", "3", "4", "6", "1", "5", "8"]);
    }

    #[tokio::test]
    async fn test_recommended_unknown_user_falls_back() {
        let backend = build_test_backend();
        let rec = backend.recommended("nobody").await;

        assert!(!rec.is_personalized());
        assert_eq!(ids(rec.movies()), vec!["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_dashboard_rows() {
        let backend = build_test_backend();
        let dashboard = backend.dashboard(ADMIN_ID).await;

        assert!(dashboard.recommended.is_personalized());
        assert_eq!(ids(&dashboard.trending), vec!["1", "2", "3", "4", "5"]);

        let genres: Vec<Genre> = dashboard.shelves.iter().map(|s| s.genre).collect();
        assert_eq!(
            genres,
            vec![Genre::SciFi, Genre::Action, Genre::Thriller, Genre::Drama]
        );
    }

    // ============================================================================
    // Watchlist
    // ============================================================================

    #[tokio::test]
    async fn test_toggle_watchlist_round_trip() {
        let backend = build_test_backend();

        let added = backend.toggle_watchlist(ADMIN_ID, "3").await.unwrap();
        assert_eq!(added, BTreeSet::from(["3".to_string()]));
        assert_eq!(ids(&backend.watchlist(ADMIN_ID).await.unwrap()), vec!["3"]);

        let removed = backend.toggle_watchlist(ADMIN_ID, "3").await.unwrap();
        assert!(removed.is_empty());
        assert!(backend.watchlist(ADMIN_ID).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_watchlist_errors() {
        let backend = build_test_backend();

        let unknown_user = backend.toggle_watchlist("nobody", "1").await;
        assert!(matches!(unknown_user, Err(BackendError::Store(CatalogError::NotFound { .. }))));

        let unknown_movie = backend.toggle_watchlist(ADMIN_ID, "999").await;
        assert!(matches!(unknown_movie, Err(BackendError::Store(CatalogError::NotFound { .. }))));
    }

    #[tokio::test]
    async fn test_watchlisted_movies_still_recommended() {
        let backend = build_test_backend();
        backend.toggle_watchlist(ADMIN_ID, "6").await.unwrap();

        let rec = backend.recommended(ADMIN_ID).await;
        assert!(rec.movies().iter().any(|m| m.id == "6"));
        assert_eq!(rec.movies().len(), 8);
    }

    // ============================================================================
    // Reviews
    // ============================================================================

    #[tokio::test]
    async fn test_add_review_and_list_by_movie() {
        let backend = build_test_backend();

        let review = backend
            .add_review(ADMIN_ID, "7", 5.0, "  Not quite my tempo.  ")
            .await
            .unwrap();
        assert_eq!(review.user_name, "Admin User");
        assert_eq!(review.comment, "Not quite my tempo.");
        backend.add_review(ADMIN_ID, "1", 4.0, "Dreamy").await.unwrap();

        let whiplash = backend.reviews("7").await.unwrap();
        assert_eq!(whiplash, vec![review]);
        assert!(backend.reviews("2").await.unwrap().is_empty());
        assert_eq!(backend.admin_stats().await.total_reviews, 2);
    }

    #[tokio::test]
    async fn test_add_review_errors() {
        let backend = build_test_backend();

        let too_high = backend.add_review(ADMIN_ID, "1", 6.0, "").await;
        assert!(matches!(too_high, Err(BackendError::InvalidInput(_))));

        let zero = backend.add_review(ADMIN_ID, "1", 0.0, "").await;
        assert!(matches!(zero, Err(BackendError::InvalidInput(_))));

        let unknown_user = backend.add_review("nobody", "1", 3.0, "").await;
        assert!(matches!(unknown_user, Err(BackendError::Store(CatalogError::NotFound { .. }))));

        let unknown_movie = backend.add_review(ADMIN_ID, "404", 3.0, "").await;
        assert!(matches!(unknown_movie, Err(BackendError::Store(CatalogError::NotFound { .. }))));

        assert!(matches!(
            backend.reviews("404").await,
            Err(BackendError::Store(CatalogError::NotFound { .. }))
        ));
        assert_eq!(backend.admin_stats().await.total_reviews, 0);
    }

    // ============================================================================
    // Admin
    // ============================================================================

    #[tokio::test]
    async fn test_admin_stats_average() {
        let backend = build_test_backend();
        let stats = backend.admin_stats().await;

        assert_eq!(stats.total_movies, 8);
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_reviews, 0);
        // (4.8 + 4.9 + 4.7 + 4.6 + 4.5 + 4.3 + 4.8 + 4.4) / 8 = 4.625
        assert!((stats.avg_rating - 4.625).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_admin_stats_empty_catalog() {
        let backend = Backend::new(MemoryStore::new());
        let stats = backend.admin_stats().await;

        assert_eq!(stats.total_movies, 0);
        assert_eq!(stats.avg_rating, 0.0);
    }

    #[tokio::test]
    async fn test_latency_is_awaited() {
        let backend = build_test_backend().with_latency(Duration::from_millis(20));

        let start = Instant::now();
        backend.movies().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let backend = build_test_backend();
        let other = backend.clone();

        other.toggle_watchlist(ADMIN_ID, "1").await.unwrap();
        assert_eq!(backend.watchlist(ADMIN_ID).await.unwrap().len(), 1);
    }
}
