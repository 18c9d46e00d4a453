//! Similarity lookup over the precomputed matrix.
//!
//! ## Algorithm
//! 1. Resolve the query title to a catalog position
//! 2. Read that row of the similarity matrix
//! 3. Stable sort by score, highest first (catalog order among ties)
//! 4. Drop the query's own position, wherever the sort put it
//! 5. Take the first `top_n`, clamped to `catalog_len - 1`

use data_loader::{DataIndex, MovieId};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// One ranked recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Catalog position of the recommended movie
    pub position: usize,
    pub movie_id: MovieId,
    pub title: String,
    /// Similarity to the query movie
    pub score: f32,
}

/// Ranks catalog entries by their precomputed similarity to a query movie.
///
/// Holds only a shared, read-only reference to the loaded data, so clones
/// are cheap and any number of callers can use it concurrently.
#[derive(Debug, Clone)]
pub struct Recommender {
    data_index: Arc<DataIndex>,
}

impl Recommender {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self { data_index }
    }

    pub fn data_index(&self) -> &DataIndex {
        &self.data_index
    }

    /// Recommend up to `top_n` movies similar to `query_title`.
    ///
    /// An unknown title yields an empty list; that is a normal outcome, not
    /// an error.
    #[instrument(skip(self))]
    pub fn recommend(&self, query_title: &str, top_n: usize) -> Vec<Recommendation> {
        match self.data_index.catalog().resolve_index(query_title) {
            Some(position) => self.recommend_by_position(position, top_n),
            None => {
                info!("Title {:?} not found in catalog", query_title);
                Vec::new()
            }
        }
    }

    /// Recommend up to `top_n` movies similar to the movie at `position`.
    pub fn recommend_by_position(&self, position: usize, top_n: usize) -> Vec<Recommendation> {
        let catalog = self.data_index.catalog();
        let similarity = self.data_index.similarity();

        if position >= catalog.len() {
            return Vec::new();
        }

        let limit = top_n.min(catalog.len() - 1);
        if limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = similarity.scored_row(position).collect();

        // `sort_by` is stable: equal scores keep catalog order
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let recommendations: Vec<Recommendation> = scored
            .into_iter()
            .filter(|&(candidate, _)| candidate != position)
            .take(limit)
            .filter_map(|(candidate, score)| {
                let entry = catalog.get(candidate)?;
                Some(Recommendation {
                    position: candidate,
                    movie_id: entry.id,
                    title: entry.title.clone(),
                    score,
                })
            })
            .collect();

        debug!(
            "Ranked {} recommendations for position {} (requested {})",
            recommendations.len(),
            position,
            top_n
        );
        recommendations
    }

    /// Pick a random catalog title ("surprise me").
    pub fn random_title<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        let catalog = self.data_index.catalog();
        if catalog.is_empty() {
            return None;
        }
        catalog.title_at(rng.random_range(0..catalog.len()))
    }
}
