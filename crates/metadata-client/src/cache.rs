//! Bounded cache in front of a [`MetadataSource`].

use std::sync::Arc;

use async_trait::async_trait;
use data_loader::MovieId;
use moka::future::Cache;
use tracing::debug;

use crate::error::Result;
use crate::source::MetadataSource;
use crate::types::MovieDetails;

/// Default number of movies kept in the metadata cache
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Memoizes another source's successful lookups, per movie id.
///
/// Failed lookups are not cached, so a transient outage does not pin
/// placeholders for the rest of the process. A capacity of zero disables
/// caching entirely.
pub struct CachedMetadata<S> {
    inner: S,
    cache: Option<Cache<MovieId, MovieDetails>>,
}

impl<S: MetadataSource> CachedMetadata<S> {
    pub fn new(inner: S, capacity: usize) -> Self {
        let cache = (capacity > 0).then(|| {
            Cache::builder()
                .max_capacity(capacity as u64)
                .build()
        });
        Self { inner, cache }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of cached records, after pending evictions have run
    pub async fn cached(&self) -> u64 {
        match &self.cache {
            Some(cache) => {
                cache.run_pending_tasks().await;
                cache.entry_count()
            }
            None => 0,
        }
    }
}

#[async_trait]
impl<S: MetadataSource> MetadataSource for CachedMetadata<S> {
    async fn try_movie_details(&self, id: MovieId) -> Result<MovieDetails> {
        let Some(cache) = &self.cache else {
            return self.inner.try_movie_details(id).await;
        };

        if let Some(details) = cache.get(&id).await {
            debug!("Metadata cache hit for movie {}", id);
            return Ok(details);
        }

        // Only `Ok` values are inserted; concurrent misses share one fetch
        cache
            .try_get_with(id, self.inner.try_movie_details(id))
            .await
            .map_err(Arc::unwrap_or_clone)
    }

    fn placeholder(&self, id: MovieId) -> MovieDetails {
        self.inner.placeholder(id)
    }
}
