//! Core domain types for the precomputed recommendation artifacts.
//!
//! Two read-only stores live here:
//! - [`Catalog`]: the ordered list of recommendable movies
//! - [`SimilarityMatrix`]: the dense pairwise score table, in catalog order
//!
//! [`DataIndex`] bundles both and is what the rest of the workspace shares
//! behind an `Arc`.

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

// =============================================================================
// Type Aliases
// =============================================================================

/// External identifier of a movie (the TMDB id in the shipped artifacts)
pub type MovieId = u32;

// =============================================================================
// Catalog
// =============================================================================

/// A single recommendable movie.
///
/// Its position in the catalog is implicit: it is the index of the entry in
/// [`Catalog::entries`], which must match the row/column order of the
/// similarity matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "movie_id")]
    pub id: MovieId,
    pub title: String,
}

/// The ordered, immutable list of catalog entries.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    /// First position for every title (titles are not unique)
    title_index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from entries in artifact order.
    ///
    /// Fails with [`DataLoadError::DuplicateId`] if two entries share an id.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut seen_ids: HashMap<MovieId, usize> = HashMap::with_capacity(entries.len());
        let mut title_index = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            if let Some(&first) = seen_ids.get(&entry.id) {
                return Err(DataLoadError::DuplicateId {
                    id: entry.id,
                    first,
                    second: position,
                });
            }
            seen_ids.insert(entry.id, position);

            // Keep the first position only
            if let Entry::Vacant(slot) = title_index.entry(entry.title.clone()) {
                slot.insert(position);
            }
        }

        Ok(Self {
            entries,
            title_index,
        })
    }

    /// Resolve a title to its catalog position (exact match, first wins).
    pub fn resolve_index(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    pub fn get(&self, position: usize) -> Option<&CatalogEntry> {
        self.entries.get(position)
    }

    pub fn title_at(&self, position: usize) -> Option<&str> {
        self.entries.get(position).map(|e| e.title.as_str())
    }

    pub fn id_at(&self, position: usize) -> Option<MovieId> {
        self.entries.get(position).map(|e| e.id)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive substring search over titles.
    ///
    /// Exact (case-insensitive) matches come first, then substring matches,
    /// each group in catalog order. Returns catalog positions.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let query = query.to_lowercase();
        let mut exact = Vec::new();
        let mut partial = Vec::new();

        for (position, entry) in self.entries.iter().enumerate() {
            let title = entry.title.to_lowercase();
            if title == query {
                exact.push(position);
            } else if title.contains(&query) {
                partial.push(position);
            }
        }

        exact.extend(partial);
        exact
    }
}

// =============================================================================
// Similarity Matrix
// =============================================================================

/// Dense square table of similarity scores, stored row-major.
///
/// `score(i, j)` is the similarity between catalog positions `i` and `j`.
/// The table is never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    dim: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build a matrix from `dim * dim` row-major scores.
    ///
    /// Rejects non-square input and non-finite scores.
    pub fn new(dim: usize, scores: Vec<f32>) -> Result<Self> {
        if dim.checked_mul(dim) != Some(scores.len()) {
            return Err(DataLoadError::DimensionMismatch(format!(
                "expected {dim}x{dim} = {} scores, found {}",
                dim.saturating_mul(dim),
                scores.len()
            )));
        }

        if let Some(offset) = scores.iter().position(|s| !s.is_finite()) {
            return Err(DataLoadError::InvalidValue {
                field: format!("similarity[{}][{}]", offset / dim, offset % dim),
                value: scores[offset].to_string(),
            });
        }

        Ok(Self { dim, scores })
    }

    /// Build a matrix from explicit rows.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = rows.len();
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != dim) {
            return Err(DataLoadError::DimensionMismatch(format!(
                "row {row} has {} columns, expected {dim}",
                values.len()
            )));
        }
        Self::new(dim, rows.into_iter().flatten().collect())
    }

    /// Number of rows (and columns)
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Full row of scores for a catalog position, self-entry included
    pub fn row(&self, position: usize) -> Option<&[f32]> {
        if position >= self.dim {
            return None;
        }
        let start = position * self.dim;
        Some(&self.scores[start..start + self.dim])
    }

    /// Row as `(position, score)` pairs in column order
    pub fn scored_row(&self, position: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.row(position)
            .unwrap_or(&[])
            .iter()
            .copied()
            .enumerate()
    }

    pub fn score(&self, row: usize, column: usize) -> Option<f32> {
        self.row(row).and_then(|r| r.get(column).copied())
    }

    /// Largest `|s[i][j] - s[j][i]|` over the matrix.
    ///
    /// The offline process is meant to produce a symmetric table; this is a
    /// diagnostic only.
    pub fn max_asymmetry(&self) -> f32 {
        let mut worst = 0.0f32;
        for i in 0..self.dim {
            for j in (i + 1)..self.dim {
                let a = self.scores[i * self.dim + j];
                let b = self.scores[j * self.dim + i];
                worst = worst.max((a - b).abs());
            }
        }
        worst
    }
}

// =============================================================================
// DataIndex - both stores, loaded once
// =============================================================================

/// The catalog and its similarity matrix, loaded once and shared read-only.
///
/// Invariant: `catalog.len() == similarity.dim()`.
#[derive(Debug, Clone, Default)]
pub struct DataIndex {
    pub(crate) catalog: Catalog,
    pub(crate) similarity: SimilarityMatrix,
}

impl DataIndex {
    /// Pair a catalog with its matrix, checking the size invariant.
    pub fn new(catalog: Catalog, similarity: SimilarityMatrix) -> Result<Self> {
        if catalog.len() != similarity.dim() {
            return Err(DataLoadError::DimensionMismatch(format!(
                "catalog has {} entries but similarity matrix is {}x{}",
                catalog.len(),
                similarity.dim(),
                similarity.dim()
            )));
        }
        Ok(Self {
            catalog,
            similarity,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Number of catalog entries
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}
