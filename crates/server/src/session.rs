//! Per-user session state.
//!
//! A `Session` is an explicit value owned by whoever drives the UI; nothing
//! here is process-global, so independent sessions never share favorites.
//! Every mutation leaves a [`Notice`] describing what happened, and the
//! caller re-renders explicitly after reading it.

use std::path::{Path, PathBuf};

use metadata_client::MovieDetails;
use tracing::warn;

use crate::favorites::{Favorites, FavoritesError};
use crate::orchestrator::MovieRecommendation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

/// Outcome of the last user action, shown once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    favorites: Favorites,
    favorites_path: PathBuf,
    /// Recommendations currently on screen, in rank order
    results: Vec<MovieRecommendation>,
    notice: Option<Notice>,
}

impl Session {
    pub fn new(favorites_path: impl Into<PathBuf>) -> Self {
        Self {
            favorites: Favorites::new(),
            favorites_path: favorites_path.into(),
            results: Vec::new(),
            notice: None,
        }
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn results(&self) -> &[MovieRecommendation] {
        &self.results
    }

    /// Read and clear the pending notice
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Replace the recommendations on screen
    pub fn show_results(&mut self, results: Vec<MovieRecommendation>) {
        if results.is_empty() {
            self.notice = Some(Notice::warning(
                "No recommendations found for that selection.",
            ));
        }
        self.results = results;
    }

    pub fn add_favorite(&mut self, details: &MovieDetails) {
        self.favorites.add(details);
        self.notice = Some(Notice::success(format!(
            "Added '{}' to favorites.",
            details.title
        )));
    }

    /// Add the on-screen recommendation with the given 1-based rank
    pub fn add_result(&mut self, rank: usize) -> bool {
        let details = self
            .results
            .iter()
            .find(|r| r.rank == rank)
            .map(|r| r.details.clone());

        match details {
            Some(details) => {
                self.add_favorite(&details);
                true
            }
            None => {
                self.notice = Some(Notice::info(format!("No recommendation ranked {rank}.")));
                false
            }
        }
    }

    /// Remove by id; an absent id only produces an informational notice
    pub fn remove_favorite(&mut self, key: &str) -> bool {
        match self.favorites.remove(key) {
            Some(removed) => {
                self.notice = Some(Notice::success(format!(
                    "Removed '{}' from favorites.",
                    removed.title
                )));
                true
            }
            None => {
                self.notice = Some(Notice::info(format!("Movie {key} is not in favorites.")));
                false
            }
        }
    }

    /// Add if absent, remove if present (the card button)
    pub fn toggle_favorite(&mut self, details: &MovieDetails) {
        if self.favorites.contains(&details.key()) {
            self.remove_favorite(&details.key());
        } else {
            self.add_favorite(details);
        }
    }

    pub fn save_favorites(&mut self) -> bool {
        let result = self.favorites.save_to(&self.favorites_path);
        self.report(result, |path| format!("Favorites saved to {path}"), "Save failed")
    }

    /// Replace the in-memory favorites with the file's contents.
    ///
    /// On failure the current favorites are left untouched.
    pub fn load_favorites(&mut self) -> bool {
        let result = Favorites::load_from(&self.favorites_path);
        let loaded = result.map(|favorites| {
            let count = favorites.len();
            self.favorites = favorites;
            count
        });
        self.report(loaded, |path| format!("Loaded favorites from {path}"), "Load failed")
    }

    pub fn export_favorites_csv(&mut self, path: &Path) -> bool {
        let result = self.favorites.export_csv(path);
        let notice = match &result {
            Ok(count) => Notice::success(format!("Exported {count} favorites to {}", path.display())),
            Err(e) => {
                warn!("Favorites export to {} failed: {}", path.display(), e);
                Notice::warning(format!("Export failed: {e}"))
            }
        };
        self.notice = Some(notice);
        result.is_ok()
    }

    fn report(
        &mut self,
        result: Result<usize, FavoritesError>,
        success: impl FnOnce(&str) -> String,
        failure: &str,
    ) -> bool {
        let path = self.favorites_path.display().to_string();
        let notice = match &result {
            Ok(_) => Notice::success(success(&path)),
            Err(e) => {
                warn!("{} for {}: {}", failure, path, e);
                Notice::warning(format!("{failure}: {e}"))
            }
        };
        self.notice = Some(notice);
        result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieId;

    fn details(id: MovieId, title: &str) -> MovieDetails {
        let mut details =
            MovieDetails::placeholder(id, format!("https://www.themoviedb.org/movie/{id}"));
        details.title = title.to_string();
        details
    }

    fn ranked(rank: usize, id: MovieId, title: &str) -> MovieRecommendation {
        MovieRecommendation {
            rank,
            score: 1.0 / rank as f32,
            details: details(id, title),
        }
    }

    #[test]
    fn test_add_and_remove_set_notices() {
        let mut session = Session::new("unused.json");

        session.add_favorite(&details(155, "The Dark Knight"));
        assert_eq!(
            session.take_notice(),
            Some(Notice::success("Added 'The Dark Knight' to favorites."))
        );
        assert!(session.take_notice().is_none());

        assert!(session.remove_favorite("155"));
        assert_eq!(session.take_notice().unwrap().level, NoticeLevel::Success);

        assert!(!session.remove_favorite("155"));
        assert_eq!(session.take_notice().unwrap().level, NoticeLevel::Info);
        assert!(session.favorites().is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut session = Session::new("unused.json");
        let movie = details(24428, "The Avengers");

        session.toggle_favorite(&movie);
        assert!(session.favorites().contains("24428"));
        session.toggle_favorite(&movie);
        assert!(session.favorites().is_empty());
    }

    #[test]
    fn test_add_result_by_rank() {
        let mut session = Session::new("unused.json");
        session.show_results(vec![ranked(1, 1, "One"), ranked(2, 2, "Two")]);

        assert!(session.add_result(2));
        assert!(session.favorites().contains("2"));
        assert!(!session.add_result(3));
        assert_eq!(session.take_notice().unwrap().level, NoticeLevel::Info);
    }

    #[test]
    fn test_empty_results_warn() {
        let mut session = Session::new("unused.json");
        session.show_results(Vec::new());
        assert_eq!(
            session.take_notice(),
            Some(Notice::warning("No recommendations found for that selection."))
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session_favorites.json");
        let mut session = Session::new(&path);
        session.add_favorite(&details(1, "A"));
        session.add_favorite(&details(2, "B"));
        assert!(session.save_favorites());

        let mut other = Session::new(&path);
        assert!(other.load_favorites());
        assert_eq!(other.favorites(), session.favorites());
        assert_eq!(other.take_notice().unwrap().level, NoticeLevel::Success);
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken_favorites.json");
        std::fs::write(&path, "[{\"id\": ").unwrap();

        let mut session = Session::new(&path);
        session.add_favorite(&details(7, "Seven"));
        session.take_notice();

        assert!(!session.load_favorites());
        assert!(session.favorites().contains("7"));
        let notice = session.take_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(notice.message.starts_with("Load failed"));
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut alice = Session::new("alice.json");
        let bob = Session::new("bob.json");

        alice.add_favorite(&details(3, "C"));
        assert_eq!(alice.favorites().len(), 1);
        assert!(bob.favorites().is_empty());
    }
}
