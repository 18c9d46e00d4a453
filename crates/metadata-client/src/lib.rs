//! Movie metadata client.
//!
//! This crate provides the display metadata (poster, overview, cast,
//! trailer, ...) for catalog movies. It handles:
//! - Talking to the TMDB REST API with a bounded request timeout
//! - Converting the loosely shaped JSON into a typed [`MovieDetails`]
//! - Degrading to placeholder values whenever the service misbehaves
//! - Caching successful lookups in a bounded cache

pub mod cache;
pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use cache::{CachedMetadata, DEFAULT_CACHE_CAPACITY};
pub use client::{TmdbClient, TmdbConfig};
pub use error::{MetadataError, Result};
pub use source::{MetadataSource, OfflineMetadata};
pub use types::{MovieDetails, PLACEHOLDER_POSTER};
