//! Catalog search and movie routes.

use std::time::Instant;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use serde::Deserialize;

use super::helpers::{
    Served, finish, listing_limit, parse_int_or_default, parse_nullable_int,
};
use crate::catalog::{Criteria, OrderKey, Page, build_order_key};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Search page size bounds.
const SEARCH_DEFAULT_LIMIT: u32 = 20;
const SEARCH_MAX_LIMIT: u32 = 100;
const SEARCH_MAX_OFFSET: u32 = 10_000;

const LISTING_MAX_OFFSET: u32 = 10_000_000;

/// Create the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/search", get(search))
        .route("/api/movies", get(list_movies))
        .route("/api/movies/{id}", get(get_movie))
}

// -------------------------------------------------------------------------
// Request types
// -------------------------------------------------------------------------

/// The four raw sort tokens.
#[derive(Debug, Default, Deserialize)]
pub struct SortParams {
    order1: Option<String>,
    dir1: Option<String>,
    order2: Option<String>,
    dir2: Option<String>,
}

impl SortParams {
    fn order_key(&self) -> OrderKey {
        build_order_key(
            self.order1.as_deref(),
            self.dir1.as_deref(),
            self.order2.as_deref(),
            self.dir2.as_deref(),
        )
    }
}

/// Query string of `/api/search`.
///
/// Numbers are kept as text so malformed values fall back instead of
/// rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    title: Option<String>,
    director: Option<String>,
    star: Option<String>,
    year: Option<String>,
    initial: Option<String>,
    #[serde(rename = "genreId")]
    genre_id: Option<String>,
    genre: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
    #[serde(flatten)]
    sort: SortParams,
}

impl SearchParams {
    fn criteria(&self) -> Criteria {
        Criteria {
            title: self.title.clone(),
            director: self.director.clone(),
            star: self.star.clone(),
            year: parse_nullable_int(self.year.as_deref()),
            initial: self.initial.clone(),
            genre_id: parse_nullable_int(self.genre_id.as_deref()),
            genre_name: self.genre.clone(),
        }
    }

    fn page(&self) -> Page {
        Page::new(
            parse_int_or_default(
                self.limit.as_deref(),
                SEARCH_DEFAULT_LIMIT,
                1,
                SEARCH_MAX_LIMIT,
            ),
            parse_int_or_default(self.offset.as_deref(), 0, 0, SEARCH_MAX_OFFSET),
        )
    }
}

/// Query string of `/api/movies`.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    limit: Option<String>,
    offset: Option<String>,
    #[serde(flatten)]
    sort: SortParams,
}

// -------------------------------------------------------------------------
// Handlers
// -------------------------------------------------------------------------

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let started = Instant::now();
    let result = run_search(
        &state,
        &params.criteria(),
        params.page(),
        &params.sort.order_key(),
    )
    .await;
    finish(&state, "search", started, result)
}

async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Response {
    let started = Instant::now();
    let page = Page::new(
        listing_limit(params.limit.as_deref()),
        parse_int_or_default(params.offset.as_deref(), 0, 0, LISTING_MAX_OFFSET),
    );
    let result = run_search(
        &state,
        &Criteria::default(),
        page,
        &params.sort.order_key(),
    )
    .await;
    finish(&state, "movies", started, result)
}

async fn get_movie(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let started = Instant::now();
    let result = lookup_movie(&state, id.trim()).await;
    finish(&state, "movie", started, result)
}

async fn run_search(
    state: &AppState,
    criteria: &Criteria,
    page: Page,
    order_key: &OrderKey,
) -> AppResult<Served> {
    let streamed = state.catalog().search(criteria, page, order_key).await?;
    Ok(streamed.into())
}

async fn lookup_movie(state: &AppState, id: &str) -> AppResult<Served> {
    if id.is_empty() {
        return Err(AppError::BadRequest("missing movie id".to_string()));
    }

    state
        .catalog()
        .movie(id)
        .await?
        .map(Served::from)
        .ok_or(AppError::NotFound("no movie found with the given id"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn params(query: &str) -> SearchParams {
        let uri: axum::http::Uri = format!("/api/search?{query}").parse().unwrap();
        Query::<SearchParams>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn search_params_build_criteria() {
        let p = params("title=love&year=1994&genreId=x&genre=Drama&initial=0-9");
        let criteria = p.criteria();
        assert_eq!(criteria.title(), Some("love"));
        assert_eq!(criteria.year(), Some(1994));
        assert_eq!(criteria.genre_id(), None);
        assert_eq!(criteria.genre_name(), Some("Drama"));
        assert_eq!(criteria.initial.as_deref(), Some("0-9"));
    }

    #[test]
    fn search_page_defaults_and_clamps() {
        assert_eq!(params("").page(), Page::new(20, 0));
        assert_eq!(params("limit=500&offset=20000").page(), Page::new(100, 10_000));
        assert_eq!(params("limit=abc&offset=-3").page(), Page::new(20, 0));
    }

    #[test]
    fn search_sort_tokens() {
        assert_eq!(params("").sort.order_key(), OrderKey::default());
        assert_eq!(
            params("order1=title&dir1=asc&order2=title&dir2=desc")
                .sort
                .order_key()
                .as_str(),
            "m.title ASC, r.rating DESC, m.id ASC"
        );
    }
}
