//! End-to-end tests of the backend over a snapshot file.

use backend::{Backend, BackendConfig, SignupRequest};
use catalog::seed::ADMIN_ID;
use catalog::{Genre, MovieDraft};
use std::path::PathBuf;

fn temp_config(name: &str) -> BackendConfig {
    let dir: PathBuf = std::env::temp_dir().join(format!(
        "cinesense-backend-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);

    BackendConfig {
        store_path: dir.join("store.json"),
        latency_ms: 0,
    }
}

#[tokio::test]
async fn test_fresh_store_is_seeded_and_written() {
    let config = temp_config("seeded");
    let backend = Backend::open(&config).unwrap();

    assert_eq!(backend.movies().await.len(), 8);
    assert!(config.store_path.exists());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.store_path).unwrap()).unwrap();
    assert_eq!(json["movies"].as_array().map(|m| m.len()), Some(8));
    assert_eq!(json["users"][0]["role"], "admin");
}

#[tokio::test]
async fn test_mutations_survive_reopen() {
    let config = temp_config("reopen");

    let (user_id, movie_id) = {
        let backend = Backend::open(&config).unwrap();
        let user = backend
            .signup(SignupRequest {
                name: "Rita".to_string(),
                email: "rita@example.com".to_string(),
                password: "pw".to_string(),
                genres: vec![Genre::Horror, Genre::Mystery],
            })
            .await
            .unwrap();

        let movie = backend
            .add_movie(
                ADMIN_ID,
                MovieDraft {
                    title: "Night Shift".to_string(),
                    description: "Something is in the hospital basement.".to_string(),
                    genres: vec![Genre::Horror],
                    director: "A. Director".to_string(),
                    cast: vec![],
                    year: 2023,
                    duration_minutes: 101,
                    poster_url: String::new(),
                },
            )
            .await
            .unwrap();

        backend.toggle_watchlist(&user.id, &movie.id).await.unwrap();
        (user.id, movie.id)
    };

    let reopened = Backend::open(&config).unwrap();
    assert_eq!(reopened.movies().await.len(), 9);

    let user = reopened.login("rita@example.com", "").await.unwrap();
    assert_eq!(user.id, user_id);
    assert!(user.watchlist.contains(&movie_id));

    // The new title has rating 0 but matches a genre: 5 * 1 + 2 * 0 = 5.0,
    // below every seed title's no-match score of at least 8.6
    let rec = reopened.recommended(&user_id).await;
    assert_eq!(rec.movies().last().map(|m| m.id.clone()), Some(movie_id));
}

#[tokio::test]
async fn test_admin_stats_after_add() {
    let config = temp_config("stats");
    let backend = Backend::open(&config).unwrap();

    backend
        .add_movie(
            ADMIN_ID,
            MovieDraft {
                title: "Unrated".to_string(),
                description: String::new(),
                genres: vec![Genre::Documentary],
                director: String::new(),
                cast: vec![],
                year: 2022,
                duration_minutes: 80,
                poster_url: String::new(),
            },
        )
        .await
        .unwrap();

    let stats = backend.admin_stats().await;
    assert_eq!(stats.total_movies, 9);
    // 37.0 / 9
    assert!((stats.avg_rating - 37.0 / 9.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_rejected_email_change_keeps_store_loadable() {
    let config = temp_config("email");

    {
        let backend = Backend::open(&config).unwrap();
        let mut user = backend
            .signup(SignupRequest {
                name: "Ann".to_string(),
                email: "a@example.com".to_string(),
                password: String::new(),
                genres: vec![Genre::Comedy],
            })
            .await
            .unwrap();

        user.email = "admin@cinesense.com".to_string();
        assert!(backend.update_user(user).await.is_err());
    }

    let reopened = Backend::open(&config).unwrap();
    assert!(reopened.login("a@example.com", "").await.is_ok());
    assert_eq!(reopened.admin_stats().await.total_users, 2);
}

#[tokio::test]
async fn test_reviews_survive_reopen() {
    let config = temp_config("reviews");

    let written = {
        let backend = Backend::open(&config).unwrap();
        backend
            .add_review(ADMIN_ID, "4", 4.5, "Stairs everywhere")
            .await
            .unwrap()
    };

    let reopened = Backend::open(&config).unwrap();
    assert_eq!(reopened.reviews("4").await.unwrap(), vec![written]);
    assert_eq!(reopened.admin_stats().await.total_reviews, 1);
}
