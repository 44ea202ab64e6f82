//! Simple data models for the monitoring pipeline.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::normalize;

// ---

/// Gas value substituted when a record carries none.
pub const DEFAULT_GAS_VALUE: f64 = 0.0;

/// Status substituted when a record carries none. Never alerts.
pub const DEFAULT_STATUS: &str = "N/A";

/// Raw sensor record as retrieved from the store.
///
/// Every field is optional; absent or wrong-typed values are resolved by
/// [`RawReading::to_normalized`] rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct RawReading {
    // ---
    pub gas_value: Option<f64>,
    pub status: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Display-ready reading derived from a [`RawReading`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReading {
    // ---
    pub gas_value: f64,
    pub status: String,
    /// `HH:MM:SS` in the reference offset, or `--:--:--`.
    pub local_time: String,
    #[serde(skip)]
    pub sort_instant: Option<DateTime<Utc>>,
}

impl RawReading {
    // ---
    /// Decode a store document without coercing field types.
    ///
    /// `gas_value` (or `gasValue`) must be a JSON number, `status` a string
    /// and `timestamp` an RFC 3339 string. Anything else counts as absent.
    pub fn from_json(doc: &Value) -> RawReading {
        // ---
        let gas_value = doc
            .get("gas_value")
            .or_else(|| doc.get("gasValue"))
            .and_then(Value::as_f64);

        let status = doc
            .get("status")
            .and_then(Value::as_str)
            .map(String::from);

        let timestamp = doc
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|ts| ts.with_timezone(&Utc));

        RawReading {
            gas_value,
            status,
            timestamp,
        }
    }

    /// Apply field defaults and render the wall-clock time in `offset`.
    pub fn to_normalized(&self, offset: FixedOffset) -> NormalizedReading {
        // ---
        NormalizedReading {
            gas_value: self.gas_value.unwrap_or(DEFAULT_GAS_VALUE),
            status: self
                .status
                .clone()
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            local_time: normalize::format_local_time(self.timestamp, offset),
            sort_instant: self.timestamp,
        }
    }
}
