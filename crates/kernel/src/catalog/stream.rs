//! Result streaming.
//!
//! Rows are pulled from the cursor one at a time and written straight into
//! a JSON array. Related-entity columns arrive as JSON text built by the
//! store and are spliced into the output as raw fragments.

use std::io;

use serde::de::Error as _;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::value::RawValue;
use tokio_stream::{Stream, StreamExt};

use super::error::CatalogError;

/// How absent scalar fields are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Leave the key out.
    #[default]
    Sparse,
    /// Write the key with `null`.
    Explicit,
}

/// A row type the streamer can write as one JSON object.
pub trait StreamRecord {
    /// Serialize this row, applying `policy` to nullable scalar fields.
    fn serialize_record<S: Serializer>(
        &self,
        serializer: S,
        policy: NullPolicy,
    ) -> Result<S::Ok, S::Error>;
}

struct WithPolicy<'a, R> {
    record: &'a R,
    policy: NullPolicy,
}

impl<R: StreamRecord> Serialize for WithPolicy<'_, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize_record(serializer, self.policy)
    }
}

/// Write every row as a JSON array, in cursor order.
///
/// Returns the number of rows written. Zero rows produce `[]`.
pub async fn write_array<W, S, R, E>(
    out: W,
    mut rows: S,
    policy: NullPolicy,
) -> Result<usize, CatalogError>
where
    W: io::Write,
    S: Stream<Item = Result<R, E>> + Unpin,
    R: StreamRecord,
    CatalogError: From<E>,
{
    let mut serializer = serde_json::Serializer::new(out);
    let mut seq = (&mut serializer).serialize_seq(None)?;
    let mut written = 0;

    while let Some(row) = rows.next().await {
        let record = row?;
        seq.serialize_element(&WithPolicy {
            record: &record,
            policy,
        })?;
        written += 1;
    }

    SerializeSeq::end(seq)?;
    Ok(written)
}

/// Write the first row as a single JSON object.
///
/// Returns `false`, writing nothing, when the cursor is empty.
pub async fn write_single<W, S, R, E>(
    out: W,
    mut rows: S,
    policy: NullPolicy,
) -> Result<bool, CatalogError>
where
    W: io::Write,
    S: Stream<Item = Result<R, E>> + Unpin,
    R: StreamRecord,
    CatalogError: From<E>,
{
    let Some(row) = rows.next().await else {
        return Ok(false);
    };
    let record = row?;
    serde_json::to_writer(
        out,
        &WithPolicy {
            record: &record,
            policy,
        },
    )?;
    Ok(true)
}

/// Write `key` when `value` is present, or as `null` under [`NullPolicy::Explicit`].
pub fn write_optional<M, T>(
    map: &mut M,
    key: &'static str,
    value: Option<&T>,
    policy: NullPolicy,
) -> Result<(), M::Error>
where
    M: SerializeMap,
    T: Serialize + ?Sized,
{
    match (value, policy) {
        (Some(value), _) => map.serialize_entry(key, value),
        (None, NullPolicy::Explicit) => map.serialize_entry(key, &()),
        (None, NullPolicy::Sparse) => Ok(()),
    }
}

/// Turn a store-built JSON array column into a raw fragment.
///
/// NULL or blank text becomes `[]`. Anything that is not a JSON array is an
/// error.
pub fn related_array(text: Option<&str>) -> Result<Box<RawValue>, serde_json::Error> {
    let text = text.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return RawValue::from_string("[]".to_string());
    }
    if !text.starts_with('[') {
        return Err(serde_json::Error::custom(
            "related column is not a JSON array",
        ));
    }
    RawValue::from_string(text.to_string())
}

/// Write a related-entity column under `key`.
pub fn write_related<M: SerializeMap>(
    map: &mut M,
    key: &'static str,
    text: Option<&str>,
) -> Result<(), M::Error> {
    let fragment = related_array(text).map_err(<M::Error as serde::ser::Error>::custom)?;
    map.serialize_entry(key, &fragment)
}
