//! Application entry point for the `airwatch-monitor` service.
//!
//! Startup sequence:
//! - Loading `.env` and initializing structured logging/tracing
//! - Loading and validating configuration
//! - Opening the single reading store handle (fatal on failure)
//! - Spawning the refresh loop
//! - Serving the published view over HTTP until Ctrl-C
//!
//! # Environment Variables
//! See [`airwatch_monitor::config::load_from_env`] for store and cycle
//! settings. Logging is controlled by:
//! - `MONITOR_LOG_LEVEL` (optional) – crate log verbosity (default: `info`)
//! - `FORCE_COLOR` (optional) – override TTY colour detection
use std::{env, sync::Arc};

use anyhow::{anyhow, Result};
use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing_subscriber::filter::EnvFilter;

use airwatch_monitor::{
    config, routes, HttpStore, PgStore, ReadingFetcher, ReadingStore, RefreshScheduler,
    StoreBackend,
};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    // The one unrecoverable condition: no usable store handle
    let store = open_store(&cfg.backend).await?;
    tracing::info!("Reading store ready: {}", store.description());

    let scheduler = RefreshScheduler::new(ReadingFetcher::new(store), cfg.cycle_settings());
    let views = scheduler.subscribe();
    let refresh = tokio::spawn(scheduler.run());

    let app: Router = routes::router(views);

    tracing::info!("Listening on {}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresh.abort();
    tracing::info!("Shut down");
    Ok(())
}

// ---

async fn open_store(backend: &StoreBackend) -> Result<Arc<dyn ReadingStore>> {
    // ---
    match backend {
        StoreBackend::Http {
            url,
            token_file,
            timeout,
        } => {
            let token = match token_file {
                Some(path) => {
                    let raw = std::fs::read_to_string(path)
                        .map_err(|e| anyhow!("Error loading token file '{}': {}", path, e))?;
                    Some(raw.trim().to_string())
                }
                None => None,
            };
            Ok(Arc::new(HttpStore::new(url, token, *timeout)?))
        }
        StoreBackend::Postgres { db_url, pool_max } => {
            tracing::info!("Attempting to connect to database");
            let store = PgStore::connect(db_url, *pool_max).await?;
            tracing::info!("Successfully connected to database");
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    // ---
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `MONITOR_LOG_LEVEL` sets the level
/// for this crate (default `info`, so each cycle logs one line) while
/// dependencies stay at `warn`. Colour follows `FORCE_COLOR`, else TTY
/// detection.
fn init_tracing() {
    // ---
    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_line_number(true)
        .with_env_filter(log_filter())
        .with_ansi(use_color)
        .compact()
        .init();
}

fn log_filter() -> EnvFilter {
    // ---
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    let level = env::var("MONITOR_LOG_LEVEL")
        .ok()
        .filter(|l| matches!(l.as_str(), "trace" | "debug" | "info" | "warn" | "error"))
        .unwrap_or_else(|| "info".to_string());

    EnvFilter::new(format!("warn,airwatch_monitor={level}"))
}
