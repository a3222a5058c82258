//! Parsing for snapshot files and genre tags.
//!
//! A snapshot is one JSON document holding the three collections:
//! `{ "movies": [...], "users": [...], "reviews": [...] }`

use crate::error::{CatalogError, Result};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// On-disk layout of the whole store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub movies: Vec<Movie>,
    pub users: Vec<User>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Read a snapshot file
pub fn parse_snapshot(path: &Path) -> Result<Snapshot> {
    let file = File::open(path)?;
    let snapshot = serde_json::from_reader(BufReader::new(file))?;
    Ok(snapshot)
}

/// Write a snapshot file, replacing any previous contents.
///
/// Writes to a sibling temp file first and renames it over the target so a
/// crash mid-write leaves the old snapshot intact.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Parse a genre tag
///
/// Example: "Action" -> Ok(Genre::Action)
///          "Sci-Fi" -> Ok(Genre::SciFi)
pub fn parse_genre(s: &str) -> Result<Genre> {
    let trimmed = s.trim();
    Genre::ALL
        .iter()
        .copied()
        .find(|g| g.as_str().eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| CatalogError::InvalidValue {
            field: "genre".to_string(),
            value: s.to_string(),
        })
}

/// Parse comma-separated genres
///
/// Example: "Action, Sci-Fi" -> vec![Genre::Action, Genre::SciFi]
pub fn parse_genres(s: &str) -> Result<Vec<Genre>> {
    let mut genres = Vec::new();
    for genre_str in s.split(',').filter(|part| !part.trim().is_empty()) {
        genres.push(parse_genre(genre_str)?);
    }
    Ok(genres)
}

impl FromStr for Genre {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        parse_genre(s)
    }
}
