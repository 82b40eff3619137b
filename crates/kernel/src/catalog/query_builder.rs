//! Catalog query templates.
//!
//! Paged searches use one of two fixed templates that share the same shape:
//! - select the matching movie ids (every rated movie for the unfiltered plan)
//! - number them with the order key and slice out one page
//! - aggregate at most [`MAX_RELATED`] stars and genres for that page only
//!
//! Optional filters never change the query text. Each one is a
//! `($k IS NULL OR <predicate using $k+1>)` pair, and absent filters bind
//! NULL to both placeholders.

use sea_query::{Iden, Order, PostgresQueryBuilder, Query};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

use super::criteria::{Criteria, DIGIT_CLASS, Page, TitleInitial};
use super::error::CatalogError;
use super::plan::Plan;
use super::sort::OrderKey;

/// Maximum number of stars, and of genres, inlined per movie.
pub const MAX_RELATED: usize = 3;

/// Number of filter binds in the multi-filter template (8 sentinel/value pairs).
pub const FILTER_BIND_COUNT: usize = 16;

/// Marker replaced by the order key.
const ORDER_KEY_SLOT: &str = "{order_key}";

// The literal 3 below must match MAX_RELATED; a unit test checks it.
macro_rules! page_aggregation {
    () => {
        r#",
  stars_page AS (
    SELECT ranked.movie_id,
           json_agg(json_build_object('id', ranked.id, 'name', ranked.name) ORDER BY ranked.pos) AS stars
    FROM (
      SELECT sim.movie_id,
             s.id,
             s.name,
             ROW_NUMBER() OVER (
               PARTITION BY sim.movie_id
               ORDER BY pop.movie_count DESC, s.name ASC, s.id ASC
             ) AS pos
      FROM stars_in_movies sim
      JOIN stars s ON s.id = sim.star_id
      CROSS JOIN LATERAL (
        SELECT COUNT(*) AS movie_count
        FROM stars_in_movies c
        WHERE c.star_id = s.id
      ) pop
      WHERE sim.movie_id IN (SELECT id FROM page_ids)
    ) ranked
    WHERE ranked.pos <= 3
    GROUP BY ranked.movie_id
  ),
  genres_page AS (
    SELECT ranked.movie_id,
           json_agg(json_build_object('id', ranked.id, 'name', ranked.name) ORDER BY ranked.pos) AS genres
    FROM (
      SELECT gim.movie_id,
             g.id,
             g.name,
             ROW_NUMBER() OVER (
               PARTITION BY gim.movie_id
               ORDER BY g.name ASC, g.id ASC
             ) AS pos
      FROM genres_in_movies gim
      JOIN genres g ON g.id = gim.genre_id
      WHERE gim.movie_id IN (SELECT id FROM page_ids)
    ) ranked
    WHERE ranked.pos <= 3
    GROUP BY ranked.movie_id
  )
SELECT
  m.id,
  m.title,
  m.year,
  m.director,
  r.rating,
  r.vote_count,
  COALESCE(sp.stars, '[]'::json)::text AS stars,
  COALESCE(gp.genres, '[]'::json)::text AS genres
FROM page_ids p
JOIN movies m ON m.id = p.id
JOIN ratings r ON r.movie_id = m.id
LEFT JOIN stars_page sp ON sp.movie_id = m.id
LEFT JOIN genres_page gp ON gp.movie_id = m.id
ORDER BY p.seq"#
    };
}

const UNFILTERED_PAGED: &str = concat!(
    r#"WITH
  page_ids AS (
    SELECT m.id,
           ROW_NUMBER() OVER (ORDER BY {order_key}) AS seq
    FROM movies m
    JOIN ratings r ON r.movie_id = m.id
    ORDER BY {order_key}
    LIMIT $1 OFFSET $2
  )"#,
    page_aggregation!()
);

const MULTI_FILTER_PAGED: &str = concat!(
    r#"WITH
  filtered AS (
    SELECT DISTINCT m.id
    FROM movies m
    LEFT JOIN stars_in_movies sim ON sim.movie_id = m.id
    LEFT JOIN stars s ON s.id = sim.star_id
    LEFT JOIN genres_in_movies gim ON gim.movie_id = m.id
    LEFT JOIN genres g ON g.id = gim.genre_id
    WHERE
      ($1::text IS NULL OR m.title ILIKE $2::text) AND
      ($3::int IS NULL OR m.year = $4::int) AND
      ($5::text IS NULL OR m.director ILIKE $6::text) AND
      ($7::text IS NULL OR s.name ILIKE $8::text) AND
      ($9::text IS NULL OR upper(left(m.title, 1)) = upper($10::text)) AND
      ($11::text IS NULL OR ($12::text = '0-9' AND left(m.title, 1) BETWEEN '0' AND '9')) AND
      ($13::int IS NULL OR g.id = $14::int) AND
      ($15::text IS NULL OR g.name = $16::text)
  ),
  page_ids AS (
    SELECT f.id,
           ROW_NUMBER() OVER (ORDER BY {order_key}) AS seq
    FROM filtered f
    JOIN ratings r ON r.movie_id = f.id
    JOIN movies m ON m.id = f.id
    ORDER BY {order_key}
    LIMIT $17 OFFSET $18
  )"#,
    page_aggregation!()
);

const MOVIE_BY_ID: &str = r#"WITH
  movie_sel AS (
    SELECT m.id, m.title, m.year, m.director, r.rating, r.vote_count
    FROM movies m
    LEFT JOIN ratings r ON r.movie_id = m.id
    WHERE m.id = $1
  ),
  stars_json AS (
    SELECT json_agg(json_build_object('id', ranked.id, 'name', ranked.name) ORDER BY ranked.pos) AS stars
    FROM (
      SELECT s.id,
             s.name,
             ROW_NUMBER() OVER (ORDER BY pop.movie_count DESC, s.name ASC, s.id ASC) AS pos
      FROM stars_in_movies sim
      JOIN movie_sel ms ON ms.id = sim.movie_id
      JOIN stars s ON s.id = sim.star_id
      CROSS JOIN LATERAL (
        SELECT COUNT(*) AS movie_count
        FROM stars_in_movies c
        WHERE c.star_id = s.id
      ) pop
    ) ranked
    WHERE ranked.pos <= 3
  ),
  genres_json AS (
    SELECT json_agg(json_build_object('id', ranked.id, 'name', ranked.name) ORDER BY ranked.pos) AS genres
    FROM (
      SELECT g.id,
             g.name,
             ROW_NUMBER() OVER (ORDER BY g.name ASC, g.id ASC) AS pos
      FROM genres_in_movies gim
      JOIN movie_sel ms ON ms.id = gim.movie_id
      JOIN genres g ON g.id = gim.genre_id
    ) ranked
    WHERE ranked.pos <= 3
  )
SELECT
  ms.id,
  ms.title,
  ms.year,
  ms.director,
  ms.rating,
  ms.vote_count,
  COALESCE(sj.stars, '[]'::json)::text AS stars,
  COALESCE(gj.genres, '[]'::json)::text AS genres
FROM movie_sel ms
LEFT JOIN stars_json sj ON TRUE
LEFT JOIN genres_json gj ON TRUE"#;

const STAR_BY_ID: &str = r#"SELECT
  s.id,
  s.name,
  s.birth_year,
  COALESCE((
    SELECT json_agg(
             json_build_object('id', m.id, 'title', m.title, 'year', m.year)
             ORDER BY m.year DESC NULLS LAST, m.title ASC, m.id ASC
           )
    FROM stars_in_movies sim
    JOIN movies m ON m.id = sim.movie_id
    WHERE sim.star_id = s.id
  ), '[]'::json)::text AS movies
FROM stars s
WHERE s.id = $1"#;

/// Identifiers for the genre table.
#[derive(Iden)]
enum Genres {
    Table,
    Id,
    Name,
}

/// One positional bind value.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// Nullable text.
    Text(Option<String>),
    /// Nullable 32-bit integer.
    Int(Option<i32>),
    /// Non-null 64-bit integer (LIMIT / OFFSET).
    BigInt(i64),
}

impl BindValue {
    pub fn is_null(&self) -> bool {
        matches!(self, BindValue::Text(None) | BindValue::Int(None))
    }
}

/// SQL text plus its binds, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl RenderedQuery {
    /// Build a typed sqlx query with every bind applied in order.
    pub fn query_as<'q, O>(&'q self) -> QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        self.binds
            .iter()
            .fold(sqlx::query_as::<_, O>(&self.sql), |query, bind| match bind {
                BindValue::Text(v) => query.bind(v.as_deref()),
                BindValue::Int(v) => query.bind(*v),
                BindValue::BigInt(v) => query.bind(*v),
            })
    }
}

/// Render a paged search.
///
/// Fails only when the criteria carry a filter that cannot be expressed,
/// currently an unparseable title initial.
pub fn render(
    plan: Plan,
    criteria: &Criteria,
    page: Page,
    order_key: &OrderKey,
) -> Result<RenderedQuery, CatalogError> {
    let (template, mut binds) = match plan {
        Plan::Unfiltered => (UNFILTERED_PAGED, Vec::with_capacity(2)),
        Plan::MultiFilter => (MULTI_FILTER_PAGED, filter_binds(criteria)?),
    };

    binds.push(BindValue::BigInt(i64::from(page.limit)));
    binds.push(BindValue::BigInt(i64::from(page.offset)));

    Ok(RenderedQuery {
        sql: template.replace(ORDER_KEY_SLOT, order_key.as_str()),
        binds,
    })
}

/// Render the single-movie lookup.
pub fn render_movie_lookup(movie_id: &str) -> RenderedQuery {
    RenderedQuery {
        sql: MOVIE_BY_ID.to_string(),
        binds: vec![BindValue::Text(Some(movie_id.to_string()))],
    }
}

/// Render the single-star lookup.
pub fn render_star_lookup(star_id: &str) -> RenderedQuery {
    RenderedQuery {
        sql: STAR_BY_ID.to_string(),
        binds: vec![BindValue::Text(Some(star_id.to_string()))],
    }
}

/// SQL listing every genre by name.
pub fn genre_list_sql() -> String {
    Query::select()
        .columns([Genres::Id, Genres::Name])
        .from(Genres::Table)
        .order_by(Genres::Name, Order::Asc)
        .order_by(Genres::Id, Order::Asc)
        .to_string(PostgresQueryBuilder)
}

/// Sentinel/value pairs in template order.
fn filter_binds(criteria: &Criteria) -> Result<Vec<BindValue>, CatalogError> {
    let initial = criteria.initial()?;
    let letter = match initial {
        Some(TitleInitial::Letter(c)) => Some(c.to_string()),
        _ => None,
    };
    let digits = matches!(initial, Some(TitleInitial::Digits)).then(|| DIGIT_CLASS.to_string());

    let mut binds = Vec::with_capacity(FILTER_BIND_COUNT + 2);
    push_text_pair(&mut binds, criteria.title().map(contains_pattern));
    push_int_pair(&mut binds, criteria.year());
    push_text_pair(&mut binds, criteria.director().map(contains_pattern));
    push_text_pair(&mut binds, criteria.star().map(contains_pattern));
    push_text_pair(&mut binds, letter);
    push_text_pair(&mut binds, digits);
    push_int_pair(&mut binds, criteria.genre_id());
    push_text_pair(&mut binds, criteria.genre_name().map(str::to_string));

    debug_assert_eq!(binds.len(), FILTER_BIND_COUNT);
    Ok(binds)
}

fn push_text_pair(binds: &mut Vec<BindValue>, value: Option<String>) {
    binds.push(BindValue::Text(value.clone()));
    binds.push(BindValue::Text(value));
}

fn push_int_pair(binds: &mut Vec<BindValue>, value: Option<i32>) {
    binds.push(BindValue::Int(value));
    binds.push(BindValue::Int(value));
}

/// `%value%` with LIKE wildcards in the value escaped.
fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like_wildcards(value))
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
