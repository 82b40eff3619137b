//! Catalog query error types.
//!
//! Every failure carries a stable code token that is safe to hand to clients.
//! The underlying driver error is kept as the `source` for logging only.

use thiserror::Error;

/// Boxed error used for failures that happen after the store accepted the query.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while planning or executing a catalog query.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing store could not be reached at all.
    #[error("catalog store is unavailable")]
    StoreUnavailable(#[source] sqlx::Error),

    /// The criteria combination cannot be turned into a query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The store rejected or failed the query after a connection was obtained.
    #[error("catalog query failed")]
    ExecutionFailure(#[source] BoxError),
}

impl CatalogError {
    /// Stable client-facing code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            CatalogError::InvalidQuery(_) => "INVALID_QUERY",
            CatalogError::ExecutionFailure(_) => "EXECUTION_FAILURE",
        }
    }

    /// Whether the failure was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CatalogError::InvalidQuery(_))
    }

    /// Classify a failure to obtain a connection and open a transaction.
    ///
    /// Connection-level errors here mean the store is unreachable. Anything
    /// else the store answered with is an execution failure.
    pub fn acquire(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_) => CatalogError::StoreUnavailable(err),
            other => CatalogError::execution(other),
        }
    }

    /// A failure after a connection was obtained.
    pub fn execution(err: sqlx::Error) -> Self {
        CatalogError::ExecutionFailure(Box::new(err))
    }
}

/// Driver errors raised while a connection is held. Acquisition goes
/// through [`CatalogError::acquire`] instead.
impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::execution(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::ExecutionFailure(Box::new(err))
    }
}
