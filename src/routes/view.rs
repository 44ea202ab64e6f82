// src/routes/view.rs
//! `GET /view` returns the most recently published view as JSON.
//!
//! Reading the `watch` channel never waits on the refresh loop, so this
//! route stays responsive while a cycle is idle or in flight.

use axum::{extract::State, routing::get, Json, Router};
use tokio::sync::watch;
use tracing::debug;

use crate::View;

// ---

pub fn router() -> Router<watch::Receiver<View>> {
    // ---
    Router::new().route("/view", get(handler))
}

async fn handler(State(views): State<watch::Receiver<View>>) -> Json<View> {
    // ---
    let view = views.borrow().clone();
    debug!(
        "GET /view - cycle {} state {:?}",
        view.cycle, view.data_state
    );
    Json(view)
}
