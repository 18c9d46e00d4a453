//! # Data Loader Crate
//!
//! Loads the two precomputed artifacts the recommender runs on: the movie
//! catalog and the dense similarity matrix computed offline in the same
//! order.
//!
//! ## Main Components
//!
//! - **types**: Catalog, SimilarityMatrix and the DataIndex bundling them
//! - **parser**: CSV and raw binary artifact parsers
//! - **index**: Parallel loading and cross-artifact validation
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data"))?;
//!
//! let position = index.catalog().resolve_index("Avatar").unwrap();
//! let row = index.similarity().row(position).unwrap();
//! println!("{} has {} scores", index.catalog().title_at(position).unwrap(), row.len());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{CATALOG_FILE, SIMILARITY_BIN_FILE, SIMILARITY_CSV_FILE};
pub use types::{
    // Type aliases
    MovieId,
    // Core types
    Catalog,
    CatalogEntry,
    DataIndex,
    SimilarityMatrix,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_index_creation() {
        let index = DataIndex::default();
        assert_eq!(index.len(), 0);
        assert!(index.is_empty());
        assert!(index.validate().is_err());
    }

    #[test]
    fn test_build_index_in_memory() {
        let catalog = Catalog::new(vec![
            CatalogEntry {
                id: 19995,
                title: "Avatar".to_string(),
            },
            CatalogEntry {
                id: 285,
                title: "Pirates of the Caribbean: At World's End".to_string(),
            },
        ])
        .unwrap();
        let similarity = SimilarityMatrix::from_rows(vec![vec![1.0, 0.1], vec![0.1, 1.0]]).unwrap();

        let index = DataIndex::new(catalog, similarity).unwrap();
        assert!(index.validate().is_ok());
        assert_eq!(index.catalog().id_at(1), Some(285));
        assert_eq!(index.similarity().row(0), Some(&[1.0, 0.1][..]));
    }
}
