//! HTTP route handlers.

pub mod browse;
pub mod catalog;
pub mod health;
pub mod helpers;
pub mod metrics;
pub mod star;

use axum::Router;

use crate::state::AppState;

/// All catalog, health and metrics routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(metrics::router())
        .merge(catalog::router())
        .merge(star::router())
        .merge(browse::router())
}
