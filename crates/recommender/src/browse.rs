//! Unranked dashboard rows: trending, browse-by-genre and the watchlist.

use catalog::{Genre, Movie, MovieStore, User};
use serde::Serialize;

/// Titles in the trending row
pub const TRENDING_SIZE: usize = 5;

/// How many genre rows the dashboard shows
pub const SHELF_COUNT: usize = 4;

/// Titles per genre row
pub const SHELF_SIZE: usize = 5;

/// One browse-by-genre row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreShelf {
    pub genre: Genre,
    pub movies: Vec<Movie>,
}

/// The first catalog entries, in catalog order
pub fn trending(catalog: &[Movie]) -> &[Movie] {
    &catalog[..catalog.len().min(TRENDING_SIZE)]
}

/// Build the browse-by-genre rows.
///
/// ## Algorithm
/// 1. Walk every movie's genre list in catalog order, keeping the first
///    [`SHELF_COUNT`] distinct genres seen
/// 2. For each, take the first [`SHELF_SIZE`] entries of the store's genre
///    index, which lists movies in catalog order
pub fn genre_shelves<S>(store: &S) -> Vec<GenreShelf>
where
    S: MovieStore + ?Sized,
{
    let mut genres: Vec<Genre> = Vec::with_capacity(SHELF_COUNT);
    for genre in store.movies().iter().flat_map(|m| m.genres.iter()) {
        if genres.len() == SHELF_COUNT {
            break;
        }
        if !genres.contains(genre) {
            genres.push(*genre);
        }
    }

    genres
        .into_iter()
        .map(|genre| GenreShelf {
            genre,
            movies: store
                .movie_ids_by_genre(genre)
                .iter()
                .filter_map(|id| store.movie(id))
                .take(SHELF_SIZE)
                .cloned()
                .collect(),
        })
        .filter(|shelf| !shelf.movies.is_empty())
        .collect()
}

/// Catalog movies on the user's watchlist, in catalog order.
///
/// Ids that no longer resolve to a catalog entry are skipped.
pub fn watchlist_movies<'a>(catalog: &'a [Movie], user: &User) -> Vec<&'a Movie> {
    catalog
        .iter()
        .filter(|m| user.watchlist.contains(&m.id))
        .collect()
}
