//! Shared route helpers for catalog endpoints.

use std::time::{Duration, Instant};

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::catalog::Streamed;
use crate::error::AppResult;
use crate::state::AppState;

/// Page sizes accepted by the movie listing.
pub const LISTING_PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];

/// Listing page size used for anything not in [`LISTING_PAGE_SIZES`].
pub const LISTING_DEFAULT_LIMIT: u32 = 25;

/// Parse an integer parameter, clamped into `min..=max`.
///
/// Missing or non-numeric input yields `default`.
pub fn parse_int_or_default(raw: Option<&str>, default: u32, min: u32, max: u32) -> u32 {
    match raw.map(str::trim).map(str::parse::<i64>) {
        Some(Ok(value)) => value.clamp(i64::from(min), i64::from(max)) as u32,
        _ => default,
    }
}

/// Parse an optional integer parameter; anything unparseable is absent.
pub fn parse_nullable_int(raw: Option<&str>) -> Option<i32> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// Listing page size: one of [`LISTING_PAGE_SIZES`], else the default.
pub fn listing_limit(raw: Option<&str>) -> u32 {
    let requested = parse_int_or_default(raw, LISTING_DEFAULT_LIMIT, 1, 100);
    if LISTING_PAGE_SIZES.contains(&requested) {
        requested
    } else {
        LISTING_DEFAULT_LIMIT
    }
}

/// A JSON body with its store timing.
#[derive(Debug)]
pub struct Served {
    pub body: Vec<u8>,
    pub rows: usize,
    pub store_elapsed: Option<Duration>,
}

impl From<Streamed> for Served {
    fn from(streamed: Streamed) -> Self {
        Self {
            body: streamed.body,
            rows: streamed.rows,
            store_elapsed: Some(streamed.store_elapsed),
        }
    }
}

/// Log, record metrics for, and respond to one handler call.
pub fn finish(
    state: &AppState,
    endpoint: &'static str,
    started: Instant,
    result: AppResult<Served>,
) -> Response {
    let total = started.elapsed();

    match result {
        Ok(served) => {
            state
                .metrics()
                .record_request(endpoint, total, served.store_elapsed);
            info!(
                endpoint,
                rows = served.rows,
                total_ms = total.as_secs_f64() * 1000.0,
                store_ms = served.store_elapsed.map(|d| d.as_secs_f64() * 1000.0),
                "catalog request served"
            );
            json_response(served.body)
        }
        Err(err) => {
            state.metrics().record_request(endpoint, total, None);
            state.metrics().record_error(endpoint, err.code());
            err.into_response()
        }
    }
}

/// Pre-serialized JSON with the right content type.
pub fn json_response(body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}
