//! Query plan selection.

use serde::Serialize;

use super::criteria::Criteria;

/// Template family used for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// No filters: page straight over every rated movie.
    Unfiltered,
    /// At least one filter: every predicate is present and bound.
    MultiFilter,
}

impl Plan {
    /// Pick the template for a criteria set.
    ///
    /// Presence of a filter is the only input.
    pub fn choose(criteria: &Criteria) -> Self {
        if criteria.has_any() {
            Plan::MultiFilter
        } else {
            Plan::Unfiltered
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Plan::Unfiltered => "unfiltered",
            Plan::MultiFilter => "multi_filter",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn no_filters_is_unfiltered() {
        assert_eq!(Plan::choose(&Criteria::default()), Plan::Unfiltered);
    }

    #[test]
    fn blank_filters_are_unfiltered() {
        let criteria = Criteria {
            title: Some("  ".to_string()),
            year: Some(0),
            ..Default::default()
        };
        assert_eq!(Plan::choose(&criteria), Plan::Unfiltered);
    }

    #[test]
    fn single_filter_is_multi_filter() {
        let criteria = Criteria {
            genre_id: Some(3),
            ..Default::default()
        };
        assert_eq!(Plan::choose(&criteria), Plan::MultiFilter);

        let criteria = Criteria {
            initial: Some("0-9".to_string()),
            ..Default::default()
        };
        assert_eq!(Plan::choose(&criteria), Plan::MultiFilter);
    }

    #[test]
    fn plan_names() {
        assert_eq!(Plan::Unfiltered.as_str(), "unfiltered");
        assert_eq!(
            serde_json::to_string(&Plan::MultiFilter).unwrap(),
            "\"multi_filter\""
        );
    }
}
