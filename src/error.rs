//! Failure taxonomy for reads against the reading store.

use thiserror::Error;

// ---

/// Errors surfaced by a [`ReadingStore`](crate::store::ReadingStore) query.
///
/// Both variants are recoverable: the scheduler turns either one into a
/// `FetchError` view for a single cycle. The distinction only matters for
/// diagnostics.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connectivity or authentication fault.
    #[error("reading store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store was reached but rejected or garbled the query.
    #[error("reading store query failed: {0}")]
    StoreQuery(String),
}

impl FetchError {
    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::StoreUnavailable(_) => "store_unavailable",
            FetchError::StoreQuery(_) => "store_query_error",
        }
    }
}
