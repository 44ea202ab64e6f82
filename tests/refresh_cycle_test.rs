use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{FixedOffset, TimeZone, Utc};
use tokio::time::Instant;

use airwatch_monitor::{
    CycleSettings, DataState, FetchError, MemoryStore, RawReading, ReadingFetcher, ReadingStore,
    RefreshScheduler,
};

fn settings(interval_secs: u64) -> CycleSettings {
    // ---
    CycleSettings {
        fetch_limit: 20,
        refresh_interval: Duration::from_secs(interval_secs),
        offset: FixedOffset::east_opt(8 * 3600).unwrap(),
        alert_status: "WARNING".to_string(),
    }
}

fn reading(gas: f64, status: &str, secs: i64) -> RawReading {
    RawReading {
        gas_value: Some(gas),
        status: Some(status.to_string()),
        timestamp: Some(Utc.timestamp_opt(1_750_000_000 + secs, 0).unwrap()),
    }
}

/// Store whose queries take `delay` and which records overlap.
struct SlowStore {
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    starts: Mutex<Vec<Instant>>,
}

#[async_trait]
impl ReadingStore for SlowStore {
    async fn latest(&self, _limit: u32) -> Result<Vec<RawReading>, FetchError> {
        // ---
        self.starts.lock().unwrap().push(Instant::now());
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![reading(1.0, "Normal", 0)])
    }

    fn description(&self) -> String {
        "slow".into()
    }
}

#[tokio::test(start_paused = true)]
async fn failed_cycle_is_followed_by_a_recovering_cycle() -> Result<()> {
    // ---
    let store = Arc::new(MemoryStore::new(vec![
        reading(850.0, "WARNING", 60),
        reading(120.0, "SAFE", 0),
    ]));
    let scheduler = RefreshScheduler::new(ReadingFetcher::new(store.clone()), settings(10));
    let mut views = scheduler.subscribe();
    let handle = tokio::spawn(scheduler.run());

    views.changed().await?;
    let first = Instant::now();
    {
        let view = views.borrow();
        assert_eq!(view.cycle, 1);
        assert_eq!(view.data_state, DataState::HasData);
        assert!(view.alert_active);
    }

    store.fail_next(FetchError::StoreUnavailable("connection reset".into()));
    views.changed().await?;
    let second = Instant::now();
    {
        let view = views.borrow();
        assert_eq!(view.cycle, 2);
        assert_eq!(view.data_state, DataState::FetchError);
        assert!(view.series.is_empty());
        assert!(view.headline.is_none());
    }
    assert!(second - first >= Duration::from_secs(10));

    views.changed().await?;
    let third = Instant::now();
    assert_eq!(views.borrow().cycle, 3);
    assert_eq!(views.borrow().data_state, DataState::HasData);
    assert!(third - second >= Duration::from_secs(10));

    handle.abort();
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn interval_is_measured_from_cycle_completion() -> Result<()> {
    // ---
    let store = Arc::new(SlowStore {
        delay: Duration::from_secs(25),
        in_flight: AtomicUsize::new(0),
        max_in_flight: AtomicUsize::new(0),
        starts: Mutex::new(Vec::new()),
    });
    let scheduler = RefreshScheduler::new(ReadingFetcher::new(store.clone()), settings(10));
    let mut views = scheduler.subscribe();
    let handle = tokio::spawn(scheduler.run());

    for _ in 0..3 {
        views.changed().await?;
    }
    handle.abort();

    let starts = store.starts.lock().unwrap().clone();
    assert!(starts.len() >= 3);
    for pair in starts.windows(2) {
        // 25s fetch plus the full 10s wait
        assert!(pair[1] - pair[0] >= Duration::from_secs(35));
    }
    assert_eq!(store.max_in_flight.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn views_are_published_in_cycle_order() -> Result<()> {
    // ---
    let store = Arc::new(MemoryStore::default());
    let scheduler = RefreshScheduler::new(ReadingFetcher::new(store.clone()), settings(1));
    let mut views = scheduler.subscribe();
    let handle = tokio::spawn(scheduler.run());

    let mut seen = Vec::new();
    for i in 0..5 {
        if i == 2 {
            store.set_readings(vec![reading(5.0, "Normal", 0)]);
        }
        views.changed().await?;
        let view = views.borrow_and_update();
        seen.push((view.cycle, view.data_state));
    }
    handle.abort();

    assert_eq!(
        seen,
        vec![
            (1, DataState::Empty),
            (2, DataState::Empty),
            (3, DataState::HasData),
            (4, DataState::HasData),
            (5, DataState::HasData),
        ]
    );
    Ok(())
}
