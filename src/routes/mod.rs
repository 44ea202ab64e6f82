use axum::Router;
use tokio::sync::watch;

use crate::View;

mod health;
mod view;

// ---

/// Build the HTTP surface the renderer reads from.
pub fn router(views: watch::Receiver<View>) -> Router {
    // ---
    Router::new()
        .merge(view::router())
        .merge(health::router())
        .with_state(views)
}
