//! Search criteria and page requests.
//!
//! Both are plain values built fresh per request. A criteria field only
//! counts as present when it carries something to filter on: strings must be
//! non-blank after trimming, the year must be positive. Present strings are
//! filtered on exactly as given.

use super::error::CatalogError;

/// Initial token meaning "title starts with a digit".
pub const DIGIT_CLASS: &str = "0-9";

/// Initials offered for browsing: the digit class, then `A` to `Z`.
pub fn title_initials() -> Vec<String> {
    std::iter::once(DIGIT_CLASS.to_string())
        .chain(('A'..='Z').map(String::from))
        .collect()
}

/// Optional filters for a catalog search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Title substring.
    pub title: Option<String>,

    /// Director substring.
    pub director: Option<String>,

    /// Star name substring.
    pub star: Option<String>,

    /// Exact release year.
    pub year: Option<i32>,

    /// Title initial: a single character or [`DIGIT_CLASS`].
    pub initial: Option<String>,

    /// Genre identifier.
    pub genre_id: Option<i32>,

    /// Exact genre name.
    pub genre_name: Option<String>,
}

impl Criteria {
    /// Title, if present.
    pub fn title(&self) -> Option<&str> {
        non_blank(&self.title)
    }

    /// Director, if present.
    pub fn director(&self) -> Option<&str> {
        non_blank(&self.director)
    }

    /// Star name, if present.
    pub fn star(&self) -> Option<&str> {
        non_blank(&self.star)
    }

    /// Release year, if present.
    pub fn year(&self) -> Option<i32> {
        self.year.filter(|y| *y > 0)
    }

    /// Genre id, if present.
    pub fn genre_id(&self) -> Option<i32> {
        self.genre_id
    }

    /// Genre name, if present.
    pub fn genre_name(&self) -> Option<&str> {
        non_blank(&self.genre_name)
    }

    /// Parsed title initial.
    ///
    /// Returns `InvalidQuery` for a non-blank initial that is neither a
    /// single character nor the digit class.
    pub fn initial(&self) -> Result<Option<TitleInitial>, CatalogError> {
        non_blank(&self.initial).map(TitleInitial::parse).transpose()
    }

    /// Whether at least one filter is present.
    pub fn has_any(&self) -> bool {
        self.title().is_some()
            || self.director().is_some()
            || self.star().is_some()
            || self.year().is_some()
            || non_blank(&self.initial).is_some()
            || self.genre_id().is_some()
            || self.genre_name().is_some()
    }

    /// Check that every present field can be turned into a predicate.
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.initial().map(|_| ())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Parsed title-initial filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleInitial {
    /// Title starts with this character (case-insensitive).
    Letter(char),
    /// Title starts with a digit.
    Digits,
}

impl TitleInitial {
    /// Parse an initial token.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let token = raw.trim();
        if token == DIGIT_CLASS {
            return Ok(TitleInitial::Digits);
        }

        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_alphanumeric() => Ok(TitleInitial::Letter(c)),
            _ => Err(CatalogError::InvalidQuery(format!(
                "initial must be a single letter or digit, or \"{DIGIT_CLASS}\" (got \"{token}\")"
            ))),
        }
    }
}

/// One page of a result set.
///
/// Callers clamp both values before they reach the planner; the planner binds
/// them as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// The page that follows this one.
    pub fn next(self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }
}
