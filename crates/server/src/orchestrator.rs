//! # Recommendation Orchestrator
//!
//! Coordinates one recommendation request:
//! 1. Rank catalog movies by similarity to the query title
//! 2. Enrich every ranked movie with display metadata, concurrently
//! 3. Return the enriched cards in rank order
//!
//! Metadata lookups never fail a request: the source degrades each
//! missing record to a placeholder, and a placeholder title is replaced
//! by the catalog title so cards always name the movie.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, info, instrument};

use data_loader::DataIndex;
use metadata_client::{MetadataSource, MovieDetails};
use recommender::{Recommendation, Recommender};

/// One enriched recommendation card
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecommendation {
    /// 1-based position in the result list
    pub rank: usize,
    pub score: f32,
    pub details: MovieDetails,
}

#[derive(Clone)]
pub struct RecommendationOrchestrator {
    recommender: Recommender,
    metadata: Arc<dyn MetadataSource>,
}

impl RecommendationOrchestrator {
    pub fn new(data_index: Arc<DataIndex>, metadata: Arc<dyn MetadataSource>) -> Self {
        Self {
            recommender: Recommender::new(data_index),
            metadata,
        }
    }

    /// Ranked and enriched recommendations for `title`.
    ///
    /// An unknown title yields an empty list.
    #[instrument(skip(self))]
    pub async fn get_recommendations(&self, title: &str, limit: usize) -> Vec<MovieRecommendation> {
        let start_time = Instant::now();

        let ranked = self.recommender.recommend(title, limit);
        debug!("Ranked {} candidates for {:?}", ranked.len(), title);

        let recommendations = self.enrich(ranked).await;

        info!(
            "Served {} recommendations for {:?} in {:.2?}",
            recommendations.len(),
            title,
            start_time.elapsed()
        );
        recommendations
    }

    /// Recommendations for a randomly chosen catalog title.
    ///
    /// Returns the chosen title with its results, or `None` for an empty
    /// catalog.
    pub async fn surprise(&self, limit: usize) -> Option<(String, Vec<MovieRecommendation>)> {
        let title = {
            let mut rng = rand::rng();
            self.recommender.random_title(&mut rng)?.to_string()
        };
        info!("Surprise pick: {:?}", title);

        let recommendations = self.get_recommendations(&title, limit).await;
        Some((title, recommendations))
    }

    /// Fetch metadata for every ranked movie at once; output keeps rank order
    async fn enrich(&self, ranked: Vec<Recommendation>) -> Vec<MovieRecommendation> {
        let lookups = ranked.iter().map(|r| self.metadata.movie_details(r.movie_id));
        let details = join_all(lookups).await;

        ranked
            .into_iter()
            .zip(details)
            .enumerate()
            .map(|(i, (recommendation, mut details))| {
                if !details.has_known_title() {
                    details.title = recommendation.title;
                }
                MovieRecommendation {
                    rank: i + 1,
                    score: recommendation.score,
                    details,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    use async_trait::async_trait;
    use data_loader::{Catalog, CatalogEntry, MovieId, SimilarityMatrix};
    use metadata_client::{MetadataError, OfflineMetadata, Result as MetadataResult};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// A/B/C/D catalog where B is closest to A, then D
    fn build_test_data_index() -> Arc<DataIndex> {
        let entries = ["A", "B", "C", "D"]
            .iter()
            .enumerate()
            .map(|(i, title)| CatalogEntry {
                id: 100 + i as MovieId,
                title: title.to_string(),
            })
            .collect();
        let catalog = Catalog::new(entries).unwrap();
        let similarity = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.9, 0.1, 0.5],
            vec![0.9, 1.0, 0.2, 0.3],
            vec![0.1, 0.2, 1.0, 0.4],
            vec![0.5, 0.3, 0.4, 1.0],
        ])
        .unwrap();
        Arc::new(DataIndex::new(catalog, similarity).unwrap())
    }

    /// Knows a fixed set of ids; responds slower for lower ids so that
    /// completion order differs from rank order
    struct MockMetadata {
        known: HashSet<MovieId>,
    }

    #[async_trait]
    impl MetadataSource for MockMetadata {
        async fn try_movie_details(&self, id: MovieId) -> MetadataResult<MovieDetails> {
            tokio::time::sleep(Duration::from_millis(u64::from(110 - id.min(110)) * 5)).await;
            if !self.known.contains(&id) {
                return Err(MetadataError::Status {
                    url: format!("/movie/{id}"),
                    status: 404,
                });
            }
            let mut details = self.placeholder(id);
            details.title = format!("Movie #{id}");
            details.year = Some(2000);
            Ok(details)
        }
    }

    fn orchestrator_with(known: &[MovieId]) -> RecommendationOrchestrator {
        let metadata = MockMetadata {
            known: known.iter().copied().collect(),
        };
        RecommendationOrchestrator::new(build_test_data_index(), Arc::new(metadata))
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[tokio::test]
    async fn test_recommendations_are_enriched_in_rank_order() {
        let orchestrator = orchestrator_with(&[101, 103]);

        let results = orchestrator.get_recommendations("A", 2).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[0].details.id, 101);
        assert_eq!(results[0].details.title, "Movie #101");
        assert_eq!(results[1].rank, 2);
        assert_eq!(results[1].details.id, 103);
        assert!((results[0].score - 0.9).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_placeholder_takes_catalog_title() {
        let orchestrator = orchestrator_with(&[]);

        let results = orchestrator.get_recommendations("A", 3).await;

        let titles: Vec<&str> = results.iter().map(|r| r.details.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "D", "C"]);
        assert!(results.iter().all(|r| r.details.year.is_none()));
    }

    #[tokio::test]
    async fn test_unknown_title_is_empty() {
        let orchestrator = orchestrator_with(&[101]);
        assert!(orchestrator.get_recommendations("Nope", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_limit_is_clamped() {
        let orchestrator =
            RecommendationOrchestrator::new(build_test_data_index(), Arc::new(OfflineMetadata));

        let results = orchestrator.get_recommendations("C", 50).await;
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.details.id != 102));
    }

    #[tokio::test]
    async fn test_surprise_excludes_its_pick() {
        let orchestrator =
            RecommendationOrchestrator::new(build_test_data_index(), Arc::new(OfflineMetadata));

        let (title, results) = orchestrator.surprise(5).await.unwrap();

        assert!(["A", "B", "C", "D"].contains(&title.as_str()));
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.details.title != title));
    }

    #[tokio::test]
    async fn test_surprise_on_empty_catalog() {
        let orchestrator = RecommendationOrchestrator::new(
            Arc::new(DataIndex::default()),
            Arc::new(OfflineMetadata),
        );
        assert!(orchestrator.surprise(5).await.is_none());
    }
}
