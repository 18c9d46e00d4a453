//! Errors raised while talking to the metadata service.
//!
//! None of these escape the crate's public [`MetadataSource`] API: every
//! failure is logged and replaced with default field values.
//!
//! [`MetadataSource`]: crate::MetadataSource

use thiserror::Error;

/// Errors that can occur when fetching movie metadata
#[derive(Error, Debug, Clone)]
pub enum MetadataError {
    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Transport failure (DNS, connect, timeout, ...)
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    /// Service answered with a non-success status
    #[error("Metadata service returned status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Response body was not the JSON we expected
    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, MetadataError>;
