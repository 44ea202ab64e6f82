//! Reading store backed by a Postgres `sensor_readings` table.
//!
//! Read-only: this backend never creates or alters tables. The ingestion
//! side owns the schema.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::ReadingStore;
use crate::error::FetchError;
use crate::models::RawReading;

// ---

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    // ---
    /// Connect the pool. A failure here is fatal to startup.
    pub async fn connect(db_url: &str, max_connections: u32) -> Result<Self> {
        // ---
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl ReadingStore for PgStore {
    // ---
    async fn latest(&self, limit: u32) -> Result<Vec<RawReading>, FetchError> {
        // ---
        sqlx::query_as::<_, RawReading>(
            r#"
            SELECT gas_value::DOUBLE PRECISION AS gas_value,
                   status,
                   "timestamp"
              FROM sensor_readings
             ORDER BY "timestamp" DESC NULLS LAST
             LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    fn description(&self) -> String {
        "postgres store (sensor_readings)".to_string()
    }
}

fn map_sqlx_error(e: sqlx::Error) -> FetchError {
    // ---
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => FetchError::StoreUnavailable(e.to_string()),
        other => FetchError::StoreQuery(other.to_string()),
    }
}
