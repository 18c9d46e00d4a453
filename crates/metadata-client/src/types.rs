//! Typed metadata records.
//!
//! [`MovieDetails`] is the display record handed to the presentation layer
//! and also the snapshot stored as a favorite. The `Tmdb*` structs mirror
//! the subset of the TMDB v3 responses we read.

use data_loader::MovieId;
use serde::{Deserialize, Deserializer, Serialize};

/// Poster shown when the service has no image for a movie
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/500x750.png?text=No+Image";
pub const UNKNOWN_TITLE: &str = "Unknown";
pub const UNKNOWN_DIRECTOR: &str = "Unknown";
pub const NO_OVERVIEW: &str = "No description available.";
pub const NOT_AVAILABLE: &str = "N/A";

/// Display metadata for one movie.
///
/// Every field has a defined default, so a record can always be rendered
/// even when the remote service was unreachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    pub poster: String,
    pub overview: String,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<u16>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub language: String,
    /// At most three leading cast members
    #[serde(default)]
    pub cast: Vec<String>,
    pub director: String,
    #[serde(default)]
    pub trailer: Option<String>,
    /// Trailer URL if there is one, otherwise the movie's TMDB page
    pub tmdb: String,
}

impl MovieDetails {
    /// Record with every field at its default value.
    pub fn placeholder(id: MovieId, tmdb_page: impl Into<String>) -> Self {
        Self {
            id,
            title: UNKNOWN_TITLE.to_string(),
            poster: PLACEHOLDER_POSTER.to_string(),
            overview: NO_OVERVIEW.to_string(),
            rating: None,
            year: None,
            genres: Vec::new(),
            language: NOT_AVAILABLE.to_string(),
            cast: Vec::new(),
            director: UNKNOWN_DIRECTOR.to_string(),
            trailer: None,
            tmdb: tmdb_page.into(),
        }
    }

    /// Favorites are keyed by the id rendered as a string
    pub fn key(&self) -> String {
        self.id.to_string()
    }

    pub fn has_known_title(&self) -> bool {
        self.title != UNKNOWN_TITLE
    }

    /// Where a click on the poster should lead
    pub fn link(&self) -> &str {
        self.trailer.as_deref().unwrap_or(&self.tmdb)
    }

    pub fn year_label(&self) -> String {
        self.year
            .map(|y| y.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn rating_label(&self) -> String {
        self.rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

/// Extract the year from an ISO `release_date` (`"2009-12-10"` -> 2009)
pub fn year_from_release_date(date: &str) -> Option<u16> {
    date.split('-').next()?.trim().parse().ok()
}

// =============================================================================
// Lenient deserialisation for hand-edited or older favorites files
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

fn lenient_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u16>, D::Error> {
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) if n.fract() == 0.0 && (0.0..=u16::MAX as f64).contains(&n) => {
            Some(n as u16)
        }
        Some(NumberOrText::Number(_)) => None,
        Some(NumberOrText::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

// =============================================================================
// TMDB wire types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TmdbMovie {
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    pub original_language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbGenre {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbPerson>,
    #[serde(default)]
    pub crew: Vec<TmdbPerson>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbPerson {
    pub name: String,
    pub job: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TmdbVideos {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbVideo {
    pub key: Option<String>,
    pub site: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
