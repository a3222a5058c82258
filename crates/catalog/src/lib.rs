//! # Catalog Crate
//!
//! Domain records and storage for the CineSense demo.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, User, Review, Genre, MemoryStore)
//! - **store**: The `MovieStore` / `UserStore` / `ReviewStore` interface
//! - **parser**: Snapshot files and genre tags
//! - **index**: Loading, validating and persisting a `MemoryStore`
//! - **seed**: The demo catalog and default admin
//! - **error**: Error types for the store
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{MemoryStore, MovieStore, UserStore};
//!
//! // Load the snapshot, or seed a new one
//! let store = MemoryStore::open("data/cinesense.json")?;
//!
//! let movie = store.movie("1").unwrap();
//! let admin = store.user_by_email("admin@cinesense.com").unwrap();
//!
//! println!("{} titles, first is {}", store.movies().len(), movie.title);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod seed;
pub mod store;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use parser::{Snapshot, parse_genre, parse_genres};
pub use store::{MovieStore, ReviewStore, UserStore, generate_id};
pub use types::{
    // Type aliases
    MovieId,
    UserId,
    // Core types
    Genre,
    MemoryStore,
    Movie,
    MovieDraft,
    Review,
    User,
    UserRole,
};
