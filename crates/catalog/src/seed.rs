//! The demo catalog and default admin account a fresh store starts with.

use crate::types::*;
use std::collections::{BTreeSet, HashSet};

/// Id of the seeded administrator
pub const ADMIN_ID: &str = "admin-1";

/// Email of the seeded administrator
pub const ADMIN_EMAIL: &str = "admin@cinesense.com";

#[allow(clippy::too_many_arguments)]
fn movie(
    id: &str,
    title: &str,
    description: &str,
    genres: &[Genre],
    director: &str,
    cast: &[&str],
    year: u16,
    duration_minutes: u32,
    rating: f32,
    poster_seed: &str,
    view_count: u64,
) -> Movie {
    Movie {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        genres: genres.to_vec(),
        director: director.to_string(),
        cast: cast.iter().map(|c| c.to_string()).collect(),
        year,
        duration_minutes,
        rating,
        poster_url: format!("https://picsum.photos/seed/{}/300/450", poster_seed),
        view_count,
    }
}

/// The eight demo titles, in catalog order
pub fn seed_movies() -> Vec<Movie> {
    use Genre::*;

    vec![
        movie(
            "1",
            "Inception",
            "A thief who steals corporate secrets through the use of dream-sharing technology is given the inverse task of planting an idea into the mind of a C.E.O.",
            &[SciFi, Action, Thriller],
            "Christopher Nolan",
            &["Leonardo DiCaprio", "Joseph Gordon-Levitt", "Ellen Page"],
            2010,
            148,
            4.8,
            "inception",
            12500,
        ),
        movie(
            "2",
            "The Dark Knight",
            "When the menace known as the Joker wreaks havoc and chaos on the people of Gotham, Batman must accept one of the greatest psychological and physical tests of his ability to fight injustice.",
            &[Action, Drama, Crime],
            "Christopher Nolan",
            &["Christian Bale", "Heath Ledger", "Aaron Eckhart"],
            2008,
            152,
            4.9,
            "darkknight",
            15000,
        ),
        movie(
            "3",
            "Interstellar",
            "A team of explorers travel through a wormhole in space in an attempt to ensure humanity's survival.",
            &[SciFi, Adventure, Drama],
            "Christopher Nolan",
            &["Matthew McConaughey", "Anne Hathaway", "Jessica Chastain"],
            2014,
            169,
            4.7,
            "interstellar",
            11200,
        ),
        movie(
            "4",
            "Parasite",
            "Greed and class discrimination threaten the newly formed symbiotic relationship between the wealthy Park family and the destitute Kim clan.",
            &[Drama, Thriller, Comedy],
            "Bong Joon Ho",
            &["Kang-ho Song", "Sun-kyun Lee", "Yeo-jeong Jo"],
            2019,
            132,
            4.6,
            "parasite",
            9800,
        ),
        movie(
            "5",
            "Avengers: Endgame",
            "After the devastating events of Infinity War, the universe is in ruins. With the help of remaining allies, the Avengers assemble once more in order to reverse Thanos' actions and restore balance to the universe.",
            &[Action, SciFi, Adventure],
            "Anthony Russo, Joe Russo",
            &["Robert Downey Jr.", "Chris Evans", "Mark Ruffalo"],
            2019,
            181,
            4.5,
            "endgame",
            20000,
        ),
        movie(
            "6",
            "The Grand Budapest Hotel",
            "A writer encounters the owner of an aging high-class hotel, who tells him of his early years serving as a lobby boy in the hotel's glorious years under an exceptional concierge.",
            &[Comedy, Drama, Adventure],
            "Wes Anderson",
            &["Ralph Fiennes", "F. Murray Abraham", "Mathieu Amalric"],
            2014,
            99,
            4.3,
            "budapest",
            7500,
        ),
        movie(
            "7",
            "Whiplash",
            "A promising young drummer enrolls at a cut-throat music conservatory where his dreams of greatness are mentored by an instructor who will stop at nothing to realize a student's potential.",
            &[Drama, Music],
            "Damien Chazelle",
            &["Miles Teller", "J.K. Simmons", "Melissa Benoist"],
            2014,
            106,
            4.8,
            "whiplash",
            6800,
        ),
        movie(
            "8",
            "Mad Max: Fury Road",
            "In a post-apocalyptic wasteland, a woman rebels against a tyrannical ruler in search for her homeland with the aid of a group of female prisoners, a psychotic worshiper, and a drifter named Max.",
            &[Action, Adventure, SciFi],
            "George Miller",
            &["Tom Hardy", "Charlize Theron", "Nicholas Hoult"],
            2015,
            120,
            4.4,
            "madmax",
            13400,
        ),
    ]
}

/// The default administrator; no genre preferences, empty lists
pub fn seed_admin() -> User {
    User {
        id: ADMIN_ID.to_string(),
        name: "Admin User".to_string(),
        email: ADMIN_EMAIL.to_string(),
        role: UserRole::Admin,
        preferred_genres: HashSet::new(),
        watchlist: BTreeSet::new(),
        watched_history: BTreeSet::new(),
        avatar_url: Some(
            "https://ui-avatars.com/api/?name=Admin+User&background=E50914&color=fff".to_string(),
        ),
    }
}

impl MemoryStore {
    /// In-memory store holding the demo catalog and the default admin
    pub fn seeded() -> Self {
        let mut store = MemoryStore::new();
        for movie in seed_movies() {
            store.insert_movie(movie);
        }
        store.insert_user_record(seed_admin());
        store
    }
}
