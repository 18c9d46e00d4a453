//! Plain-text card layout shared by every front end.
//!
//! Front ends add their own styling; the content and truncation rules
//! live here.

use metadata_client::MovieDetails;
use metadata_client::types::NOT_AVAILABLE;

/// Longest overview shown on a card, in characters
pub const OVERVIEW_LIMIT: usize = 500;
/// Genres shown on a recommendation card
pub const CARD_GENRES: usize = 2;
/// Genres shown in the favorites view
pub const FAVORITE_GENRES: usize = 3;

/// Truncate to `limit` characters, marking the cut with "..."
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// First `limit` genres joined for display, or "N/A"
pub fn genre_label(details: &MovieDetails, limit: usize) -> String {
    if details.genres.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    details
        .genres
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Title (year)`
pub fn heading(details: &MovieDetails) -> String {
    format!("{} ({})", details.title, details.year_label())
}

/// Detail lines of a card, without the heading.
///
/// `full` adds cast, director and language; the overview always comes last.
pub fn card_lines(details: &MovieDetails, genre_limit: usize, full: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "Rating: {} | Genres: {}",
        details.rating_label(),
        genre_label(details, genre_limit)
    )];

    if full {
        let cast = if details.cast.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            details.cast.join(", ")
        };
        lines.push(format!("Cast: {cast}"));
        lines.push(format!(
            "Director: {} | Language: {}",
            details.director, details.language
        ));
    }

    lines.push(format!("Link: {}", details.link()));
    lines.push(truncate_chars(&details.overview, OVERVIEW_LIMIT));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception() -> MovieDetails {
        let mut details =
            MovieDetails::placeholder(27205, "https://www.themoviedb.org/movie/27205");
        details.title = "Inception".into();
        details.year = Some(2010);
        details.rating = Some(8.4);
        details.genres = vec!["Action".into(), "Science Fiction".into(), "Adventure".into()];
        details.cast = vec!["Leonardo DiCaprio".into(), "Elliot Page".into()];
        details.director = "Christopher Nolan".into();
        details.trailer = Some("https://www.youtube.com/watch?v=YoHD9XEInc0".into());
        details
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly", 7), "exactly");
        assert_eq!(truncate_chars("one two three", 8), "one two...");
        // Multi-byte characters count once
        assert_eq!(truncate_chars("ééééé", 3), "ééé...");
    }

    #[test]
    fn test_overview_is_capped() {
        let mut details = inception();
        details.overview = "x".repeat(OVERVIEW_LIMIT + 20);

        let lines = card_lines(&details, CARD_GENRES, false);
        let overview = lines.last().unwrap();
        assert_eq!(overview.chars().count(), OVERVIEW_LIMIT + 3);
        assert!(overview.ends_with("..."));
    }

    #[test]
    fn test_compact_card() {
        let lines = card_lines(&inception(), CARD_GENRES, false);
        assert_eq!(lines[0], "Rating: 8.4 | Genres: Action, Science Fiction");
        assert_eq!(lines[1], "Link: https://www.youtube.com/watch?v=YoHD9XEInc0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_full_card() {
        let lines = card_lines(&inception(), FAVORITE_GENRES, true);
        assert_eq!(
            lines[0],
            "Rating: 8.4 | Genres: Action, Science Fiction, Adventure"
        );
        assert_eq!(lines[1], "Cast: Leonardo DiCaprio, Elliot Page");
        assert_eq!(lines[2], "Director: Christopher Nolan | Language: N/A");
    }

    #[test]
    fn test_placeholder_card() {
        let details = MovieDetails::placeholder(1, "https://www.themoviedb.org/movie/1");
        assert_eq!(heading(&details), "Unknown (N/A)");
        let lines = card_lines(&details, CARD_GENRES, true);
        assert_eq!(lines[0], "Rating: N/A | Genres: N/A");
        assert_eq!(lines[1], "Cast: N/A");
        assert_eq!(lines[3], "Link: https://www.themoviedb.org/movie/1");
    }
}
