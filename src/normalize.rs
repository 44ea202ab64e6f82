//! Series normalization and status classification.
//!
//! Raw readings arrive newest first. [`normalize`] reverses them into a
//! chronological [`Series`] for display; [`classify`] picks the newest
//! reading as the snapshot and derives the alert state from it alone.

use chrono::{DateTime, FixedOffset, Utc};

use crate::models::{NormalizedReading, RawReading};

// ---

/// Shown in place of a wall-clock time when the record has no timestamp.
pub const MISSING_TIME: &str = "--:--:--";

/// Readings for one cycle, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    readings: Vec<NormalizedReading>,
}

/// Result of [`classify`].
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Newest reading, `None` when the series is empty.
    pub snapshot: Option<NormalizedReading>,
    pub alert_active: bool,
}

impl Series {
    // ---
    pub fn readings(&self) -> &[NormalizedReading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Newest reading (last in chronological order).
    pub fn newest(&self) -> Option<&NormalizedReading> {
        self.readings.last()
    }

    pub fn into_readings(self) -> Vec<NormalizedReading> {
        self.readings
    }
}

/// Format `instant` as `HH:MM:SS` in `offset`, independent of the host timezone.
pub fn format_local_time(instant: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    match instant {
        Some(ts) => ts.with_timezone(&offset).format("%H:%M:%S").to_string(),
        None => MISSING_TIME.to_string(),
    }
}

/// Build the chronological series from newest-first raw readings.
///
/// No record is dropped; missing fields take their defaults.
pub fn normalize(raw: &[RawReading], offset: FixedOffset) -> Series {
    // ---
    let readings = raw
        .iter()
        .rev()
        .map(|r| r.to_normalized(offset))
        .collect();

    Series { readings }
}

/// Select the snapshot and evaluate the alert.
///
/// The alert is active only when the newest reading's status equals
/// `alert_status` exactly. Any other label, including unrecognized ones,
/// is nominal.
pub fn classify(series: &Series, alert_status: &str) -> Classification {
    // ---
    let snapshot = series.newest().cloned();
    let alert_active = snapshot
        .as_ref()
        .is_some_and(|s| s.status == alert_status);

    Classification {
        snapshot,
        alert_active,
    }
}
