//! Property checks for the recommender over generated catalogs.
//!
//! Scores are drawn from a small set of values so that ties are common and
//! the stable-ordering guarantees actually get exercised.

use data_loader::{Catalog, CatalogEntry, DataIndex, SimilarityMatrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recommender::Recommender;
use std::sync::Arc;

fn generated_recommender(size: usize, seed: u64) -> Recommender {
    let mut rng = StdRng::seed_from_u64(seed);
    let levels = [0.0f32, 0.25, 0.5, 0.75, 1.0];

    let entries = (0..size)
        .map(|i| CatalogEntry {
            id: 1000 + i as u32,
            title: format!("Movie {i}"),
        })
        .collect();

    let mut scores = vec![0.0f32; size * size];
    for i in 0..size {
        for j in i..size {
            let score = if i == j {
                1.0
            } else {
                levels[rng.random_range(0..levels.len())]
            };
            scores[i * size + j] = score;
            scores[j * size + i] = score;
        }
    }

    let index = DataIndex::new(
        Catalog::new(entries).unwrap(),
        SimilarityMatrix::new(size, scores).unwrap(),
    )
    .unwrap();
    Recommender::new(Arc::new(index))
}

#[test]
fn never_recommends_the_query() {
    let recommender = generated_recommender(40, 1);
    for position in 0..40 {
        let recs = recommender.recommend_by_position(position, 39);
        assert!(recs.iter().all(|r| r.position != position));
    }
}

#[test]
fn length_is_min_of_top_n_and_catalog_minus_one() {
    let recommender = generated_recommender(12, 2);
    for top_n in [0usize, 1, 5, 11, 12, 50] {
        let recs = recommender.recommend("Movie 3", top_n);
        assert_eq!(recs.len(), top_n.min(11), "top_n = {top_n}");
    }
    assert!(recommender.recommend("Movie 99", 5).is_empty());
}

#[test]
fn output_is_sorted_and_ties_follow_catalog_order() {
    let recommender = generated_recommender(60, 3);
    for position in 0..60 {
        let recs = recommender.recommend_by_position(position, 59);
        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                assert!(pair[0].position < pair[1].position);
            }
        }
    }
}

#[test]
fn scores_match_the_query_row() {
    let recommender = generated_recommender(25, 4);
    let recs = recommender.recommend("Movie 7", 10);
    let row = recommender.data_index().similarity().row(7).unwrap();

    for rec in &recs {
        assert_eq!(rec.score, row[rec.position]);
        assert_eq!(rec.movie_id, 1000 + rec.position as u32);
    }
}

#[test]
fn repeated_calls_are_identical() {
    let recommender = generated_recommender(30, 5);
    let first = recommender.recommend("Movie 12", 8);
    let second = recommender.recommend("Movie 12", 8);
    assert_eq!(first, second);
}
