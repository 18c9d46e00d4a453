//! The seam between the presentation layer and wherever metadata comes from.

use async_trait::async_trait;
use data_loader::MovieId;
use tracing::warn;

use crate::error::Result;
use crate::types::MovieDetails;

/// TMDB movie page, used as the fallback link for every record
pub const DEFAULT_SITE_BASE: &str = "https://www.themoviedb.org/movie";

/// Anything that can describe a catalog movie for display.
///
/// Implementors report failures through [`try_movie_details`]; callers use
/// [`movie_details`], which never fails and degrades to a placeholder.
///
/// [`try_movie_details`]: MetadataSource::try_movie_details
/// [`movie_details`]: MetadataSource::movie_details
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch a record. `Err` means the primary record was unavailable.
    async fn try_movie_details(&self, id: MovieId) -> Result<MovieDetails>;

    /// Record used when fetching fails
    fn placeholder(&self, id: MovieId) -> MovieDetails {
        MovieDetails::placeholder(id, format!("{}/{}", DEFAULT_SITE_BASE, id))
    }

    /// Best-effort fetch: failures are logged and replaced by defaults.
    async fn movie_details(&self, id: MovieId) -> MovieDetails {
        match self.try_movie_details(id).await {
            Ok(details) => details,
            Err(e) => {
                warn!("Metadata unavailable for movie {}: {}", id, e);
                self.placeholder(id)
            }
        }
    }
}

/// Metadata source that never touches the network.
///
/// Used when no API key is configured; every record is a placeholder.
#[derive(Debug, Clone, Default)]
pub struct OfflineMetadata;

#[async_trait]
impl MetadataSource for OfflineMetadata {
    async fn try_movie_details(&self, id: MovieId) -> Result<MovieDetails> {
        Ok(self.placeholder(id))
    }
}
