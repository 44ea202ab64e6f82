//! Refresh scheduler: fetch, normalize, publish, wait, repeat.
//!
//! Cycles run strictly one after another on a single task. The idle wait
//! starts when a cycle completes, so a slow fetch delays the next cycle
//! but never overlaps it. Publishing goes through a `watch` channel, which
//! keeps readers (the HTTP view route) responsive during the wait.

use std::time::Duration;

use chrono::{FixedOffset, Utc};
use tokio::sync::watch;

use crate::error::FetchError;
use crate::fetcher::ReadingFetcher;
use crate::normalize::{classify, normalize};
use crate::view::{DataState, View};

// ---

/// Parameters that shape every cycle.
#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub fetch_limit: u32,
    pub refresh_interval: Duration,
    pub offset: FixedOffset,
    pub alert_status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Polling,
    Idle,
}

pub struct RefreshScheduler {
    // ---
    fetcher: ReadingFetcher,
    settings: CycleSettings,
    publisher: watch::Sender<View>,
    cycle: u64,
    phase: Phase,
}

impl RefreshScheduler {
    // ---
    pub fn new(fetcher: ReadingFetcher, settings: CycleSettings) -> Self {
        let (publisher, _) = watch::channel(View::pending());
        Self {
            fetcher,
            settings,
            publisher,
            cycle: 0,
            phase: Phase::Idle,
        }
    }

    /// Receiver that always holds the most recently published view.
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.publisher.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycle
    }

    /// Run one Polling phase and publish its view.
    ///
    /// Never fails: a store error becomes a `FetchError` view.
    pub async fn poll_once(&mut self) -> DataState {
        // ---
        self.phase = Phase::Polling;
        self.cycle += 1;
        let cycle = self.cycle;

        let view = match self.fetcher.fetch_latest(self.settings.fetch_limit).await {
            Ok(raw) => {
                let series = normalize(&raw, self.settings.offset);
                let class = classify(&series, &self.settings.alert_status);
                View::from_series(series, class, cycle, Utc::now())
            }
            Err(e) => {
                log_fetch_error(cycle, &e);
                View::fetch_error(cycle, Utc::now())
            }
        };

        let state = view.data_state;
        tracing::info!(
            cycle,
            data_state = ?state,
            readings = view.series.len(),
            alert_active = view.alert_active,
            "Cycle complete"
        );

        // send_replace also succeeds when nobody is subscribed
        self.publisher.send_replace(view);
        self.phase = Phase::Idle;
        state
    }

    /// Loop until the hosting task is dropped.
    pub async fn run(mut self) {
        // ---
        tracing::info!(
            "Refresh loop started: limit={} interval={:?} source={}",
            self.settings.fetch_limit,
            self.settings.refresh_interval,
            self.fetcher.description()
        );

        loop {
            self.poll_once().await;
            tokio::time::sleep(self.settings.refresh_interval).await;
        }
    }
}

fn log_fetch_error(cycle: u64, e: &FetchError) {
    // ---
    match e {
        FetchError::StoreUnavailable(_) => {
            tracing::warn!(cycle, kind = e.kind(), "Fetch failed: {}", e)
        }
        FetchError::StoreQuery(_) => {
            tracing::error!(cycle, kind = e.kind(), "Fetch failed: {}", e)
        }
    }
}
