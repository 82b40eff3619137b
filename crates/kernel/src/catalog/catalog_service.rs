//! Catalog service for executing searches and lookups.
//!
//! Every call runs in its own read-only transaction on one pooled
//! connection. The row stream borrows the transaction, so it is always
//! dropped first; the transaction then commits (or rolls back on drop) and
//! the connection goes back to the pool.

use std::time::{Duration, Instant};

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::debug;

use super::criteria::{Criteria, Page};
use super::error::CatalogError;
use super::plan::Plan;
use super::query_builder::{
    RenderedQuery, genre_list_sql, render, render_movie_lookup, render_star_lookup,
};
use super::sort::OrderKey;
use super::stream::{NullPolicy, StreamRecord, write_array, write_single};
use crate::models::{CatalogRecord, Genre, StarRecord};

/// JSON produced by one store round trip.
#[derive(Debug)]
pub struct Streamed {
    /// Serialized response body.
    pub body: Vec<u8>,

    /// Rows written into `body`.
    pub rows: usize,

    /// Time from acquiring the connection to releasing it.
    pub store_elapsed: Duration,
}

/// Service for catalog queries.
#[derive(Debug, Clone)]
pub struct CatalogService {
    pool: PgPool,
    statement_timeout: Duration,
}

impl CatalogService {
    /// Create a new CatalogService.
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    /// Run a paged search and write the page as a JSON array.
    ///
    /// An empty page is `[]`, not an error.
    pub async fn search(
        &self,
        criteria: &Criteria,
        page: Page,
        order_key: &OrderKey,
    ) -> Result<Streamed, CatalogError> {
        let plan = Plan::choose(criteria);
        let query = render(plan, criteria, page, order_key)?;

        debug!(
            plan = plan.as_str(),
            binds = query.binds.len(),
            limit = page.limit,
            offset = page.offset,
            "rendered catalog search"
        );

        self.fetch_array::<CatalogRecord>(&query, NullPolicy::Sparse)
            .await
    }

    /// Look up one movie. `None` when the id is unknown.
    ///
    /// Nullable fields are always present in the output.
    pub async fn movie(&self, movie_id: &str) -> Result<Option<Streamed>, CatalogError> {
        let query = render_movie_lookup(movie_id);
        self.fetch_single::<CatalogRecord>(&query, NullPolicy::Explicit)
            .await
    }

    /// Look up one star with their movies. `None` when the id is unknown.
    pub async fn star(&self, star_id: &str) -> Result<Option<Streamed>, CatalogError> {
        let query = render_star_lookup(star_id);
        self.fetch_single::<StarRecord>(&query, NullPolicy::Sparse)
            .await
    }

    /// All genres, by name.
    pub async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let sql = genre_list_sql();
        let mut tx = self.begin_read().await?;
        let genres = sqlx::query_as::<_, Genre>(&sql)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(genres)
    }

    async fn fetch_array<R>(
        &self,
        query: &RenderedQuery,
        policy: NullPolicy,
    ) -> Result<Streamed, CatalogError>
    where
        R: for<'r> FromRow<'r, PgRow> + StreamRecord + Send + Unpin,
    {
        let started = Instant::now();
        let mut body = Vec::new();
        let mut tx = self.begin_read().await?;

        let rows = {
            let cursor = query.query_as::<R>().fetch(&mut *tx);
            write_array(&mut body, cursor, policy).await?
        };

        tx.commit().await?;

        Ok(Streamed {
            body,
            rows,
            store_elapsed: started.elapsed(),
        })
    }

    async fn fetch_single<R>(
        &self,
        query: &RenderedQuery,
        policy: NullPolicy,
    ) -> Result<Option<Streamed>, CatalogError>
    where
        R: for<'r> FromRow<'r, PgRow> + StreamRecord + Send + Unpin,
    {
        let started = Instant::now();
        let mut body = Vec::new();
        let mut tx = self.begin_read().await?;

        let found = {
            let cursor = query.query_as::<R>().fetch(&mut *tx);
            write_single(&mut body, cursor, policy).await?
        };

        tx.commit().await?;

        Ok(found.then(|| Streamed {
            body,
            rows: 1,
            store_elapsed: started.elapsed(),
        }))
    }

    /// Open a read-only transaction bounded by the statement timeout.
    async fn begin_read(&self) -> Result<Transaction<'static, Postgres>, CatalogError> {
        let mut tx = self.pool.begin().await.map_err(CatalogError::acquire)?;

        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;

        // Zero would disable the limit.
        let timeout = format!(
            "SET LOCAL statement_timeout = {}",
            self.statement_timeout.as_millis().max(1)
        );
        sqlx::query(&timeout).execute(&mut *tx).await?;

        Ok(tx)
    }
}
