//! The view published to the renderer once per cycle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::normalize::{Classification, Series};

// ---

/// What the renderer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataState {
    /// No cycle has completed yet.
    Pending,
    HasData,
    /// The store answered with zero readings; show a waiting placeholder.
    Empty,
    /// The store could not be read this cycle.
    FetchError,
}

/// Headline metrics taken from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub gas_value: f64,
    pub status: String,
    pub last_updated_local_time: String,
}

/// One chart/table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub local_time: String,
    pub gas_value: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    // ---
    pub data_state: DataState,
    pub headline: Option<Headline>,
    pub alert_active: bool,
    /// Oldest to newest.
    pub series: Vec<SeriesPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 0 until the first cycle completes.
    pub cycle: u64,
    pub published_at: Option<DateTime<Utc>>,
}

impl View {
    // ---
    /// Placeholder held before the first publish.
    pub fn pending() -> Self {
        Self {
            data_state: DataState::Pending,
            headline: None,
            alert_active: false,
            series: Vec::new(),
            message: None,
            cycle: 0,
            published_at: None,
        }
    }

    /// View for a successful fetch; `Empty` when the series has no readings.
    pub fn from_series(
        series: Series,
        class: Classification,
        cycle: u64,
        now: DateTime<Utc>,
    ) -> Self {
        // ---
        let headline = class.snapshot.map(|s| Headline {
            gas_value: s.gas_value,
            status: s.status,
            last_updated_local_time: s.local_time,
        });

        let data_state = if headline.is_some() {
            DataState::HasData
        } else {
            DataState::Empty
        };

        let series = series
            .into_readings()
            .into_iter()
            .map(|r| SeriesPoint {
                local_time: r.local_time,
                gas_value: r.gas_value,
                status: r.status,
            })
            .collect();

        Self {
            data_state,
            headline,
            alert_active: class.alert_active,
            series,
            message: None,
            cycle,
            published_at: Some(now),
        }
    }

    /// Explicit error view. Carries no readings so nothing stale is shown.
    pub fn fetch_error(cycle: u64, now: DateTime<Utc>) -> Self {
        Self {
            data_state: DataState::FetchError,
            headline: None,
            alert_active: false,
            series: Vec::new(),
            message: Some("reading store unavailable".to_string()),
            cycle,
            published_at: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use serde_json::json;

    use crate::models::RawReading;
    use crate::normalize::{classify, normalize};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 4, 0, 30).unwrap()
    }

    #[test]
    fn test_has_data_view_json() {
        // ---
        let raw = vec![RawReading {
            gas_value: Some(1850.0),
            status: Some("WARNING".into()),
            timestamp: Some(Utc.with_ymd_and_hms(2025, 6, 1, 4, 0, 0).unwrap()),
        }];
        let series = normalize(&raw, FixedOffset::east_opt(8 * 3600).unwrap());
        let class = classify(&series, "WARNING");
        let view = View::from_series(series, class, 7, now());

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(
            value,
            json!({
                "dataState": "HasData",
                "headline": {
                    "gasValue": 1850.0,
                    "status": "WARNING",
                    "lastUpdatedLocalTime": "12:00:00"
                },
                "alertActive": true,
                "series": [
                    { "localTime": "12:00:00", "gasValue": 1850.0, "status": "WARNING" }
                ],
                "cycle": 7,
                "publishedAt": "2025-06-01T04:00:30Z"
            })
        );
    }

    #[test]
    fn test_empty_view() {
        // ---
        let series = Series::default();
        let class = classify(&series, "WARNING");
        let view = View::from_series(series, class, 1, now());

        assert_eq!(view.data_state, DataState::Empty);
        assert!(!view.alert_active);
        assert!(view.series.is_empty());
        assert_eq!(view.headline, None);
    }

    #[test]
    fn test_error_view_is_distinct_from_empty() {
        // ---
        let view = View::fetch_error(3, now());

        assert_eq!(view.data_state, DataState::FetchError);
        assert!(view.series.is_empty());
        assert!(!view.alert_active);
        assert!(view.message.is_some());
    }

    #[test]
    fn test_pending_view() {
        let view = View::pending();
        assert_eq!(view.data_state, DataState::Pending);
        assert_eq!(view.cycle, 0);
        assert_eq!(view.published_at, None);
    }
}
