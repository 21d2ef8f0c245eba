//! Configuration loading and representation.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_JWT_SECRET: &str = "dev-secret";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 24 * 60;
/// One year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 365 * 24 * 60;
pub const DEFAULT_IMAGE_URL: &str = "https://placehold.co/600x400/e2e8f0/4a5568?text=No+Image";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Unset means in-memory stores.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub default_image_url: String,
    pub db_max_connections: u32,
}

impl Config {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr: SocketAddr =
            parse_key("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR.parse().ok())?;

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEFAULT_JWT_SECRET.to_string()
        });

        let ttl_minutes: i64 =
            parse_key("TOKEN_TTL_MINUTES", get("TOKEN_TTL_MINUTES"), Some(DEFAULT_TOKEN_TTL_MINUTES))?;
        if ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_MINUTES",
                value: ttl_minutes.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_MINUTES",
                value: ttl_minutes.to_string(),
                reason: format!("must be at most {MAX_TOKEN_TTL_MINUTES}"),
            });
        }

        let db_max_connections = parse_key(
            "DB_MAX_CONNECTIONS",
            get("DB_MAX_CONNECTIONS"),
            Some(DEFAULT_DB_MAX_CONNECTIONS),
        )?;

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            jwt_secret,
            token_ttl: Duration::minutes(ttl_minutes),
            default_image_url: get("DEFAULT_IMAGE_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
            db_max_connections,
        })
    }
}

fn parse_key<T>(key: &'static str, raw: Option<String>, default: Option<T>) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
        None => default.ok_or_else(|| ConfigError::Invalid {
            key,
            value: String::new(),
            reason: "missing".to_string(),
        }),
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("default_image_url", &self.default_image_url)
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_url, None);
        assert_eq!(config.jwt_secret, DEFAULT_JWT_SECRET);
        assert_eq!(config.token_ttl, Duration::minutes(1440));
        assert_eq!(config.default_image_url, DEFAULT_IMAGE_URL);
        assert_eq!(config.db_max_connections, 5);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DATABASE_URL", "postgres://localhost/lostfound"),
            ("JWT_SECRET", "s3cr3t"),
            ("TOKEN_TTL_MINUTES", "15"),
            ("DB_MAX_CONNECTIONS", " 12 "),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/lostfound"));
        assert_eq!(config.token_ttl, Duration::minutes(15));
        assert_eq!(config.db_max_connections, 12);
        assert!(!format!("{config:?}").contains("s3cr3t"));
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn malformed_values_are_reported_by_key() {
        let err = Config::from_lookup(lookup(&[("TOKEN_TTL_MINUTES", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TOKEN_TTL_MINUTES", .. }));

        let err = Config::from_lookup(lookup(&[("TOKEN_TTL_MINUTES", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TOKEN_TTL_MINUTES", .. }));

        let err = Config::from_lookup(lookup(&[("TOKEN_TTL_MINUTES", "9223372036854775807")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TOKEN_TTL_MINUTES", .. }));

        let limit = MAX_TOKEN_TTL_MINUTES.to_string();
        let config = Config::from_lookup(lookup(&[("TOKEN_TTL_MINUTES", limit.as_str())])).unwrap();
        assert_eq!(config.token_ttl, Duration::minutes(MAX_TOKEN_TTL_MINUTES));

        let err = Config::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BIND_ADDR", .. }));
    }
}
