//! Presentation layer for the movie recommender.
//!
//! This crate contains the orchestrator that turns a query title into
//! enriched recommendation cards, plus the per-session state a front end
//! keeps around them: favorites, their persistence and export, and the
//! notice describing the last action.

pub mod favorites;
pub mod orchestrator;
pub mod render;
pub mod session;

pub use favorites::{FavoriteEntry, Favorites, FavoritesError};
pub use orchestrator::{MovieRecommendation, RecommendationOrchestrator};
pub use session::{Notice, NoticeLevel, Session};
