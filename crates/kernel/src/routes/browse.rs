//! Browse helper routes: genre list and title initials.

use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;

use super::helpers::{Served, finish};
use crate::catalog::{CatalogError, title_initials};
use crate::error::AppResult;
use crate::state::AppState;

/// Create the browse router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/genres", get(list_genres))
        .route("/api/browse/title-initials", get(list_title_initials))
}

async fn list_genres(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let result = genres(&state).await;
    finish(&state, "genres", started, result)
}

async fn genres(state: &AppState) -> AppResult<Served> {
    let store_started = Instant::now();
    let genres = state.catalog().genres().await?;
    let store_elapsed = store_started.elapsed();

    let body = serde_json::to_vec(&genres).map_err(CatalogError::from)?;
    Ok(Served {
        body,
        rows: genres.len(),
        store_elapsed: Some(store_elapsed),
    })
}

async fn list_title_initials(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let initials = title_initials();
    let result = serde_json::to_vec(&initials)
        .map(|body| Served {
            body,
            rows: initials.len(),
            store_elapsed: None,
        })
        .map_err(|e| CatalogError::from(e).into());
    finish(&state, "title_initials", started, result)
}
