//! # Recommender Crate
//!
//! Turns a query movie into a ranked list of similar catalog entries using
//! the precomputed similarity matrix.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::Recommender;
//! use data_loader::DataIndex;
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_files("data".as_ref())?);
//! let recommender = Recommender::new(data_index);
//!
//! for rec in recommender.recommend("Avatar", 5) {
//!     println!("{} ({:.3})", rec.title, rec.score);
//! }
//! ```
//!
//! The lookup is a pure function of its arguments and the loaded data:
//! identical calls return identical, identically ordered results, so
//! callers are free to memoize.

pub mod ranking;

pub use ranking::{Recommendation, Recommender};
