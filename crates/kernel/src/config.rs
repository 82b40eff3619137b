//! Configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// How long a request waits for a pooled connection (default: 5s).
    pub database_acquire_timeout: Duration,

    /// Per-statement limit inside catalog transactions (default: 10s).
    pub statement_timeout: Duration,

    /// Whole-request limit enforced by the HTTP layer (default: 30s).
    pub request_timeout: Duration,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let database_acquire_timeout = secs_var("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?;
        let statement_timeout = secs_var("STATEMENT_TIMEOUT_SECS", 10)?;
        let request_timeout = secs_var("REQUEST_TIMEOUT_SECS", 30)?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            database_acquire_timeout,
            statement_timeout,
            request_timeout,
            cors_allowed_origins,
        })
    }
}

fn secs_var(name: &str, default: u64) -> Result<Duration> {
    parse_secs(name, env::var(name).ok().as_deref(), default)
}

/// Parse a positive whole number of seconds. Zero is rejected: PostgreSQL
/// reads a zero statement timeout as "no limit".
fn parse_secs(name: &str, raw: Option<&str>, default: u64) -> Result<Duration> {
    let secs = match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a whole number of seconds"))?,
        None => default,
    };
    anyhow::ensure!(secs > 0, "{name} must be at least 1 second");
    Ok(Duration::from_secs(secs))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_split() {
        assert_eq!(
            parse_origins("http://a.test, http://b.test ,,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn missing_secs_var_uses_default() {
        let timeout = secs_var("MARQUEE_TEST_UNSET_TIMEOUT_SECS", 7).unwrap();
        assert_eq!(timeout, Duration::from_secs(7));
    }

    #[test]
    fn secs_are_parsed_and_trimmed() {
        let timeout = parse_secs("STATEMENT_TIMEOUT_SECS", Some(" 15 "), 10).unwrap();
        assert_eq!(timeout, Duration::from_secs(15));
    }

    #[test]
    fn zero_secs_are_rejected() {
        let err = parse_secs("STATEMENT_TIMEOUT_SECS", Some("0"), 10).unwrap_err();
        assert!(err.to_string().contains("at least 1 second"), "{err}");
    }

    #[test]
    fn non_numeric_secs_are_rejected() {
        assert!(parse_secs("REQUEST_TIMEOUT_SECS", Some("soon"), 30).is_err());
    }
}
