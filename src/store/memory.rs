//! In-process reading store.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::ReadingStore;
use crate::error::FetchError;
use crate::models::RawReading;

// ---

/// Holds readings in memory and answers queries the way a real store does.
///
/// Failures can be queued with [`MemoryStore::fail_next`]; each queued
/// error is returned by exactly one call to `latest`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    // ---
    readings: Mutex<Vec<RawReading>>,
    failures: Mutex<VecDeque<FetchError>>,
}

impl MemoryStore {
    // ---
    pub fn new(readings: Vec<RawReading>) -> Self {
        Self {
            readings: Mutex::new(readings),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Replace the stored readings.
    pub fn set_readings(&self, readings: Vec<RawReading>) {
        *lock(&self.readings) = readings;
    }

    /// Make the next query fail with `err`.
    pub fn fail_next(&self, err: FetchError) {
        lock(&self.failures).push_back(err);
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ReadingStore for MemoryStore {
    // ---
    async fn latest(&self, limit: u32) -> Result<Vec<RawReading>, FetchError> {
        // ---
        if let Some(err) = lock(&self.failures).pop_front() {
            return Err(err);
        }

        let mut readings = lock(&self.readings).clone();
        // Newest first; untimestamped readings sort last
        readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        readings.truncate(limit as usize);
        Ok(readings)
    }

    fn description(&self) -> String {
        "in-memory store".to_string()
    }
}
