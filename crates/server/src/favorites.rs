//! Favorites: snapshots of enriched recommendations the user chose to keep.
//!
//! The set lives in memory for the session; it is written to disk, read
//! back, or exported only on explicit request.

use std::fs;
use std::io::Write;
use std::path::Path;

use data_loader::MovieId;
use indexmap::IndexMap;
use metadata_client::MovieDetails;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// A favorite is the metadata record as it looked when it was added
pub type FavoriteEntry = MovieDetails;

/// Column order of the CSV export
pub const CSV_HEADER: [&str; 12] = [
    "id", "title", "poster", "overview", "rating", "year", "genres", "language", "cast",
    "director", "trailer", "tmdb",
];

/// Errors raised while persisting or exporting favorites
#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed favorites file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, FavoritesError>;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> FavoritesError + '_ {
    move |source| FavoritesError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Favorites keyed by movie id (as a string), in the order they were added.
///
/// Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Favorites {
    entries: IndexMap<String, FavoriteEntry>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or refresh) a favorite. Returns `true` if it was not present.
    pub fn add(&mut self, details: &MovieDetails) -> bool {
        self.entries.insert(details.key(), details.clone()).is_none()
    }

    /// Remove a favorite; removing an absent id is a no-op.
    pub fn remove(&mut self, key: &str) -> Option<FavoriteEntry> {
        self.entries.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&FavoriteEntry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FavoriteEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Parse a JSON array of favorite records
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<FavoriteEntry> = serde_json::from_str(json)?;
        let entries = records
            .into_iter()
            .map(|record| (record.key(), record))
            .collect();
        Ok(Self { entries })
    }

    /// Pretty-printed JSON array of favorite records
    pub fn to_json(&self) -> Result<String> {
        let records: Vec<&FavoriteEntry> = self.entries.values().collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Overwrite `path` with the whole set. Returns the number written.
    pub fn save_to(&self, path: &Path) -> Result<usize> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(io_error(path))?;
        info!("Saved {} favorites to {}", self.len(), path.display());
        Ok(self.len())
    }

    /// Read a favorites file written by [`save_to`](Self::save_to)
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(io_error(path))?;
        let favorites = Self::from_json(&json)?;
        info!("Loaded {} favorites from {}", favorites.len(), path.display());
        Ok(favorites)
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Write the CSV export (header row always present)
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(CSV_HEADER)?;
        for entry in self.entries.values() {
            csv_writer.serialize(CsvRow::from(entry))?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(buffer)
    }

    /// Write the CSV export to a file. Returns the number of rows.
    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        let file = fs::File::create(path).map_err(io_error(path))?;
        self.write_csv(file)?;
        debug!("Exported {} favorites to {}", self.len(), path.display());
        Ok(self.len())
    }

    /// One line per favorite: `Title (year) - link`
    pub fn share_text(&self) -> String {
        self.entries
            .values()
            .map(|f| format!("{} ({}) - {}", f.title, f.year_label(), f.tmdb))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Flat CSV rendering of a favorite; list fields are comma-joined
#[derive(Serialize)]
struct CsvRow<'a> {
    id: MovieId,
    title: &'a str,
    poster: &'a str,
    overview: &'a str,
    rating: Option<f64>,
    year: Option<u16>,
    genres: String,
    language: &'a str,
    cast: String,
    director: &'a str,
    trailer: Option<&'a str>,
    tmdb: &'a str,
}

impl<'a> From<&'a FavoriteEntry> for CsvRow<'a> {
    fn from(entry: &'a FavoriteEntry) -> Self {
        Self {
            id: entry.id,
            title: &entry.title,
            poster: &entry.poster,
            overview: &entry.overview,
            rating: entry.rating,
            year: entry.year,
            genres: entry.genres.join(", "),
            language: &entry.language,
            cast: entry.cast.join(", "),
            director: &entry.director,
            trailer: entry.trailer.as_deref(),
            tmdb: &entry.tmdb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(id: MovieId, title: &str) -> MovieDetails {
        let mut details =
            MovieDetails::placeholder(id, format!("https://www.themoviedb.org/movie/{id}"));
        details.title = title.to_string();
        details
    }

    fn sample() -> Favorites {
        let mut heat = details(949, "Heat");
        heat.rating = Some(7.9);
        heat.year = Some(1995);
        heat.genres = vec!["Action".into(), "Crime".into(), "Drama".into()];
        heat.cast = vec!["Al Pacino".into(), "Robert De Niro".into()];
        heat.director = "Michael Mann".into();
        heat.trailer = Some("https://www.youtube.com/watch?v=0xbBLJ1WGwQ".into());
        heat.tmdb = heat.trailer.clone().unwrap();

        let mut favorites = Favorites::new();
        favorites.add(&heat);
        favorites.add(&details(680, "Pulp Fiction"));
        favorites
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut favorites = Favorites::new();
        let heat = details(949, "Heat");

        assert!(favorites.add(&heat));
        assert!(!favorites.add(&heat));
        assert_eq!(favorites.len(), 1);
        assert!(favorites.contains("949"));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut favorites = sample();
        assert!(favorites.remove("12345").is_none());
        assert_eq!(favorites.len(), 2);

        assert_eq!(favorites.remove("949").map(|f| f.title), Some("Heat".to_string()));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let favorites = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round_trip.json");

        assert_eq!(favorites.save_to(&path).unwrap(), 2);
        let loaded = Favorites::load_from(&path).unwrap();

        assert_eq!(loaded, favorites);
        assert_eq!(loaded.get("949").unwrap().director, "Michael Mann");
    }

    #[test]
    fn test_json_round_trip_keeps_full_precision_ratings() {
        let ratings = [
            3.6813635782805676,
            0.1 + 0.2,
            8.123456789012345,
            std::f64::consts::E,
            1e-7 / 3.0,
        ];
        let mut favorites = Favorites::new();
        for (i, rating) in ratings.iter().enumerate() {
            let mut movie = details(i as MovieId + 1, "Rated");
            movie.rating = Some(*rating);
            favorites.add(&movie);
        }

        let loaded = Favorites::from_json(&favorites.to_json().unwrap()).unwrap();

        for (i, rating) in ratings.iter().enumerate() {
            let key = (i + 1).to_string();
            assert_eq!(loaded.get(&key).unwrap().rating, Some(*rating));
        }
        assert_eq!(loaded, favorites);
    }

    #[test]
    fn test_load_replaces_by_string_id() {
        let json = r#"[
            {"id": 13, "title": "Forrest Gump", "poster": "p", "overview": "o",
             "rating": 8.2, "year": "1994", "genres": ["Comedy"], "language": "EN",
             "cast": ["Tom Hanks"], "director": "Robert Zemeckis", "trailer": null,
             "tmdb": "https://www.themoviedb.org/movie/13"}
        ]"#;
        let favorites = Favorites::from_json(json).unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites.get("13").unwrap().year, Some(1994));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does_not_exist.json");
        assert!(matches!(
            Favorites::load_from(&missing),
            Err(FavoritesError::Io { .. })
        ));

        assert!(matches!(
            Favorites::from_json("{not json"),
            Err(FavoritesError::Json(_))
        ));
    }

    #[test]
    fn test_csv_export() {
        let csv = String::from_utf8(sample().to_csv_bytes().unwrap()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("id,title,poster,overview,rating,year,genres,language,cast,director,trailer,tmdb")
        );
        let heat = lines.next().unwrap();
        assert!(heat.starts_with("949,Heat,"));
        assert!(heat.contains(",7.9,1995,\"Action, Crime, Drama\",N/A,\"Al Pacino, Robert De Niro\",Michael Mann,"));
        let pulp = lines.next().unwrap();
        assert!(pulp.contains(",,,,N/A,,Unknown,,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_export_empty_has_header() {
        let csv = String::from_utf8(Favorites::new().to_csv_bytes().unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_share_text() {
        assert_eq!(
            sample().share_text(),
            "Heat (1995) - https://www.youtube.com/watch?v=0xbBLJ1WGwQ\n\
             Pulp Fiction (N/A) - https://www.themoviedb.org/movie/680"
        );
    }
}
