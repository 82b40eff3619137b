//! Movie catalog record.

use serde::ser::{SerializeMap, Serializer};

use crate::catalog::stream::{NullPolicy, StreamRecord, write_optional, write_related};

/// One movie row as produced by the catalog queries.
///
/// `stars` and `genres` hold the JSON array text aggregated by the store.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CatalogRecord {
    /// Catalog identifier (e.g. `tt0094859`).
    pub id: String,

    pub title: String,

    /// Release year.
    pub year: Option<i32>,

    pub director: Option<String>,

    /// Average rating; `None` for unrated movies in single lookups.
    pub rating: Option<f64>,

    /// Number of votes behind the rating.
    pub vote_count: Option<i32>,

    /// JSON array of `{id, name}` stars, most prolific first.
    pub stars: Option<String>,

    /// JSON array of `{id, name}` genres, by name.
    pub genres: Option<String>,
}

impl StreamRecord for CatalogRecord {
    fn serialize_record<S: Serializer>(
        &self,
        serializer: S,
        policy: NullPolicy,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("title", &self.title)?;
        write_optional(&mut map, "director", self.director.as_ref(), policy)?;
        write_optional(&mut map, "year", self.year.as_ref(), policy)?;
        write_optional(&mut map, "rating", self.rating.as_ref(), policy)?;
        write_optional(&mut map, "vote_count", self.vote_count.as_ref(), policy)?;
        write_related(&mut map, "stars", self.stars.as_deref())?;
        write_related(&mut map, "genres", self.genres.as_deref())?;
        map.end()
    }
}
