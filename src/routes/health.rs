// src/routes/health.rs
//! `GET /health` reports whether the refresh loop is making progress.
//!
//! The process is serving if this answers at all. The body adds the last
//! completed cycle and its data state, so a probe can tell a monitor that
//! has not polled yet (`cycle: 0`) from one whose store is failing.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tokio::sync::watch;

use crate::{DataState, View};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    cycle: u64,
    data_state: DataState,
}

async fn health(State(views): State<watch::Receiver<View>>) -> Json<HealthResponse> {
    let (cycle, data_state) = {
        let view = views.borrow();
        (view.cycle, view.data_state)
    };
    Json(HealthResponse {
        status: "ok",
        cycle,
        data_state,
    })
}

pub fn router() -> Router<watch::Receiver<View>> {
    Router::new().route("/health", get(health))
}
