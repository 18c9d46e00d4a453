//! DataIndex loading and validation.
//!
//! Both artifacts are parsed in parallel, then checked against each other
//! before anything downstream sees them.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{debug, info};

/// Catalog artifact file name
pub const CATALOG_FILE: &str = "movies.csv";
/// Binary similarity artifact file name (preferred when present)
pub const SIMILARITY_BIN_FILE: &str = "similarity.bin";
/// CSV similarity artifact file name
pub const SIMILARITY_CSV_FILE: &str = "similarity.csv";

impl DataIndex {
    /// Load the catalog and similarity matrix from a directory
    ///
    /// Steps:
    /// 1. Parse `movies.csv` and the similarity artifact in parallel
    /// 2. Build the catalog (rejects duplicate ids)
    /// 3. Pair it with the matrix (rejects size mismatches)
    /// 4. Validate the whole index
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading recommendation artifacts from {:?}", data_dir);

        let catalog_path = data_dir.join(CATALOG_FILE);
        let bin_path = data_dir.join(SIMILARITY_BIN_FILE);
        let similarity_path = if bin_path.exists() {
            bin_path
        } else {
            data_dir.join(SIMILARITY_CSV_FILE)
        };

        let (entries, similarity) = rayon::join(
            || parser::parse_catalog(&catalog_path),
            || load_similarity(&similarity_path),
        );
        let entries = entries?;
        let similarity = similarity?;

        info!(
            "Loaded {} catalog entries and a {}x{} similarity matrix",
            entries.len(),
            similarity.dim(),
            similarity.dim()
        );

        let index = DataIndex::new(Catalog::new(entries)?, similarity)?;
        index.validate()?;

        debug!(
            "Similarity matrix max asymmetry: {:.6}",
            index.similarity.max_asymmetry()
        );
        info!("DataIndex successfully built and validated");
        Ok(index)
    }

    /// Validate data integrity
    ///
    /// Construction already enforces unique ids, a square matrix, finite
    /// scores and matching sizes; an empty catalog is the remaining case
    /// where no request could ever be served.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.is_empty() {
            return Err(DataLoadError::ValidationError(
                "catalog is empty".to_string(),
            ));
        }
        if self.catalog.len() != self.similarity.dim() {
            return Err(DataLoadError::DimensionMismatch(format!(
                "catalog has {} entries but similarity matrix has {} rows",
                self.catalog.len(),
                self.similarity.dim()
            )));
        }
        Ok(())
    }
}

fn load_similarity(path: &Path) -> Result<SimilarityMatrix> {
    let is_binary = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"));

    if is_binary {
        parser::parse_similarity_bin(path)
    } else {
        parser::parse_similarity_csv(path)
    }
}
