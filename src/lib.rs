//! Live air-quality monitor core.
//!
//! Polls a reading store for the latest readings, turns them into a
//! chronological series with a headline snapshot and alert state, and
//! publishes the result once per refresh cycle.
//!
//! Layout follows the Explicit Module Boundary Pattern (EMBP): each module
//! exposes a narrow surface re-exported here, and `main.rs` only wires them.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod normalize;
pub mod routes;
pub mod scheduler;
pub mod store;
pub mod view;

pub use config::{Config, StoreBackend};
pub use error::FetchError;
pub use fetcher::ReadingFetcher;
pub use models::{NormalizedReading, RawReading};
pub use normalize::{classify, format_local_time, normalize, Classification, Series};
pub use scheduler::{CycleSettings, Phase, RefreshScheduler};
pub use store::{HttpStore, MemoryStore, PgStore, ReadingStore};
pub use view::{DataState, Headline, SeriesPoint, View};
