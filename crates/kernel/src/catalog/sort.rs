//! Sort key construction.
//!
//! ORDER BY columns cannot be bound as parameters, so the order key is the
//! one piece of request-influenced text that is interpolated into SQL. Only
//! the closed [`SortField`] and [`SortDirection`] enums can produce it.

use std::fmt;

use serde::Serialize;

/// Unique column appended to every order key.
pub const TIEBREAK_COLUMN: &str = "m.id";

/// Sortable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Rating,
    Title,
}

impl SortField {
    /// Case-insensitive lookup of a request token.
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("rating") {
            Some(SortField::Rating)
        } else if token.eq_ignore_ascii_case("title") {
            Some(SortField::Title)
        } else {
            None
        }
    }

    /// Column expression used in the query templates.
    pub const fn column(self) -> &'static str {
        match self {
            SortField::Rating => "r.rating",
            SortField::Title => "m.title",
        }
    }

    /// The other whitelisted field.
    pub const fn other(self) -> Self {
        match self {
            SortField::Rating => SortField::Title,
            SortField::Title => SortField::Rating,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive lookup of a request token.
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    pub const fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Two distinct sort fields with their directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub primary: (SortField, SortDirection),
    pub secondary: (SortField, SortDirection),
}

impl Default for SortSpec {
    /// Highest rated first, then alphabetical.
    fn default() -> Self {
        Self {
            primary: (SortField::Rating, SortDirection::Desc),
            secondary: (SortField::Title, SortDirection::Asc),
        }
    }
}

impl SortSpec {
    /// Normalize raw request tokens.
    ///
    /// Missing or unknown tokens fall back to the default for their position.
    /// When both positions name the same field the second one is switched to
    /// the other field and keeps its requested direction.
    pub fn from_tokens(
        field1: Option<&str>,
        dir1: Option<&str>,
        field2: Option<&str>,
        dir2: Option<&str>,
    ) -> Self {
        let defaults = Self::default();

        let f1 = field1.and_then(SortField::parse).unwrap_or(defaults.primary.0);
        let d1 = dir1.and_then(SortDirection::parse).unwrap_or(defaults.primary.1);
        let mut f2 = field2
            .and_then(SortField::parse)
            .unwrap_or(defaults.secondary.0);
        let d2 = dir2
            .and_then(SortDirection::parse)
            .unwrap_or(defaults.secondary.1);

        if f1 == f2 {
            f2 = f1.other();
        }

        Self {
            primary: (f1, d1),
            secondary: (f2, d2),
        }
    }

    /// Render the ORDER BY key, tiebreak included.
    pub fn order_key(&self) -> OrderKey {
        let (f1, d1) = self.primary;
        let (f2, d2) = self.secondary;
        OrderKey(format!(
            "{} {}, {} {}, {TIEBREAK_COLUMN} ASC",
            f1.column(),
            d1.as_sql(),
            f2.column(),
            d2.as_sql()
        ))
    }
}

/// Normalize four raw tokens straight into an order key.
pub fn build_order_key(
    field1: Option<&str>,
    dir1: Option<&str>,
    field2: Option<&str>,
    dir2: Option<&str>,
) -> OrderKey {
    SortSpec::from_tokens(field1, dir1, field2, dir2).order_key()
}

/// A rendered ORDER BY key.
///
/// Can only be produced by [`SortSpec::order_key`], so its text is always
/// drawn from the whitelisted columns and directions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderKey(String);

impl OrderKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OrderKey {
    fn default() -> Self {
        SortSpec::default().order_key()
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
