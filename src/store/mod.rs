//! Reading store capability and its backends.
//!
//! The store is an external collaborator: it holds the readings and
//! answers "latest N, newest first". Each backend owns one connection
//! handle created at startup and reused read-only for every cycle.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::RawReading;

mod http;
mod memory;
mod postgres;

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

// ---

/// Read-only access to the sensor readings collection.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Return at most `limit` readings ordered by timestamp, newest first.
    ///
    /// Fewer records than `limit`, including none, is a valid answer.
    async fn latest(&self, limit: u32) -> Result<Vec<RawReading>, FetchError>;

    /// Human-readable description used in startup logs.
    fn description(&self) -> String;
}
