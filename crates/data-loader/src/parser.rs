//! Parsers for the precomputed artifacts.
//!
//! - `movies.csv`: header row with at least `movie_id,title` (extra columns
//!   such as `tags` are ignored)
//! - `similarity.csv`: headerless, one comma-separated row of scores per line
//! - `similarity.bin`: raw little-endian `f32`, row-major, `n * n` values

use crate::error::{DataLoadError, Result};
use crate::types::{CatalogEntry, SimilarityMatrix};
use rayon::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Open a file, turning a missing path into `FileNotFound`
fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the catalog CSV, preserving row order
pub fn parse_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let file = file_label(path);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(open(path)?);

    let mut entries = Vec::new();
    for record in reader.deserialize::<CatalogEntry>() {
        let entry = record.map_err(|source| DataLoadError::CsvError {
            file: file.clone(),
            source,
        })?;
        entries.push(entry);
    }

    Ok(entries)
}

/// Parse a headerless CSV similarity matrix
pub fn parse_similarity_csv(path: &Path) -> Result<SimilarityMatrix> {
    let file = file_label(path);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(open(path)?);

    let mut rows: Vec<Vec<f32>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| DataLoadError::CsvError {
            file: file.clone(),
            source,
        })?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(rows.len() + 1);

        let row = record
            .iter()
            .map(|field| {
                field.parse::<f32>().map_err(|e| DataLoadError::ParseError {
                    file: file.clone(),
                    line,
                    reason: format!("Invalid score {:?}: {}", field, e),
                })
            })
            .collect::<Result<Vec<f32>>>()?;
        rows.push(row);
    }

    SimilarityMatrix::from_rows(rows)
}

/// Parse a raw little-endian `f32` similarity matrix.
///
/// The dimension is inferred from the file size, which must be `4 * n * n`.
pub fn parse_similarity_bin(path: &Path) -> Result<SimilarityMatrix> {
    let mut bytes = Vec::new();
    open(path)?.read_to_end(&mut bytes)?;

    if bytes.len() % 4 != 0 {
        return Err(DataLoadError::ValidationError(format!(
            "{}: size {} is not a multiple of 4 bytes",
            file_label(path),
            bytes.len()
        )));
    }

    let count = bytes.len() / 4;
    let dim = integer_sqrt(count).ok_or_else(|| {
        DataLoadError::DimensionMismatch(format!(
            "{}: {} scores do not form a square matrix",
            file_label(path),
            count
        ))
    })?;

    let scores: Vec<f32> = bytes
        .par_chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    SimilarityMatrix::new(dim, scores)
}

/// Exact integer square root, if `n` is a perfect square
fn integer_sqrt(n: usize) -> Option<usize> {
    let root = (n as f64).sqrt().round() as usize;
    (root.checked_mul(root) == Some(n)).then_some(root)
}
