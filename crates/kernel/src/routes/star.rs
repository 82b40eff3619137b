//! Single star route.

use std::time::Instant;

use axum::Router;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;

use super::helpers::{Served, finish};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Create the star router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/stars/{id}", get(get_star))
}

async fn get_star(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let started = Instant::now();
    let result = lookup_star(&state, id.trim()).await;
    finish(&state, "star", started, result)
}

async fn lookup_star(state: &AppState, id: &str) -> AppResult<Served> {
    if id.is_empty() {
        return Err(AppError::BadRequest("missing star id".to_string()));
    }

    state
        .catalog()
        .star(id)
        .await?
        .map(Served::from)
        .ok_or(AppError::NotFound("no star found with the given id"))
}
