//! Genre model.

use serde::{Deserialize, Serialize};

/// A genre as listed by the browse endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Genre {
    /// Numeric identifier, usable as the `genreId` search filter.
    pub id: i32,

    pub name: String,
}
