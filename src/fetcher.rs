//! Reading fetcher: the single read path from the store into a cycle.

use std::sync::Arc;

use crate::error::FetchError;
use crate::models::RawReading;
use crate::store::ReadingStore;

// ---

/// Owns the store handle for the lifetime of the process.
///
/// The handle is created once at startup, passed in here and only ever
/// read through. No retries happen at this layer.
#[derive(Clone)]
pub struct ReadingFetcher {
    store: Arc<dyn ReadingStore>,
}

impl ReadingFetcher {
    // ---
    pub fn new(store: Arc<dyn ReadingStore>) -> Self {
        Self { store }
    }

    pub fn description(&self) -> String {
        self.store.description()
    }

    /// Fetch up to `limit` readings, newest first.
    ///
    /// A store that over-delivers is cut down to the first `limit` records.
    pub async fn fetch_latest(&self, limit: u32) -> Result<Vec<RawReading>, FetchError> {
        // ---
        if limit == 0 {
            return Err(FetchError::StoreQuery(
                "fetch limit must be positive".to_string(),
            ));
        }

        let mut readings = self.store.latest(limit).await?;
        if readings.len() > limit as usize {
            tracing::debug!(
                "Store returned {} readings for limit {}, truncating",
                readings.len(),
                limit
            );
            readings.truncate(limit as usize);
        }
        Ok(readings)
    }
}
