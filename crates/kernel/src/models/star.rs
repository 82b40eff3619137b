//! Star record.

use serde::ser::{SerializeMap, Serializer};

use crate::catalog::stream::{NullPolicy, StreamRecord, write_optional, write_related};

/// A star with the JSON text of their filmography.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StarRecord {
    pub id: String,

    pub name: String,

    pub birth_year: Option<i32>,

    /// JSON array of `{id, title, year}`, newest first.
    pub movies: Option<String>,
}

impl StreamRecord for StarRecord {
    fn serialize_record<S: Serializer>(
        &self,
        serializer: S,
        policy: NullPolicy,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("name", &self.name)?;
        write_optional(&mut map, "birth_year", self.birth_year.as_ref(), policy)?;
        write_related(&mut map, "movies", self.movies.as_deref())?;
        map.end()
    }
}
