//! Runtime settings read from the process environment.

use chrono::FixedOffset;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
/// Asia/Bangkok has no daylight saving, so a fixed offset is exact.
const DEFAULT_UTC_OFFSET: &str = "+07:00";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub log_statements: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub port: u16,
    /// Civil offset that `created_at` is expressed in for new posts.
    pub utc_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database: DatabaseConfig {
                url,
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_MAX_CONNECTIONS,
                )?,
                log_statements: parse_or(&lookup, "DATABASE_LOG_STATEMENTS", false)?,
            },
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            utc_offset: parse_offset(
                "POSTS_UTC_OFFSET",
                lookup("POSTS_UTC_OFFSET")
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_UTC_OFFSET.to_owned()),
            )?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name).filter(|v| !v.is_empty()) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn parse_offset(name: &'static str, value: String) -> Result<FixedOffset, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name| map.get(name).map(|v| v.to_string())
    }

    #[test]
    fn defaults_apply_when_only_the_database_is_given() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/posts")])).unwrap();

        assert_eq!(config.database.url, "postgres://db/posts");
        assert_eq!(config.database.max_connections, 10);
        assert!(!config.database.log_statements);
        assert_eq!(config.port, 3000);
        assert_eq!(config.utc_offset, FixedOffset::east_opt(7 * 3600).unwrap());
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/posts"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("DATABASE_LOG_STATEMENTS", "true"),
            ("PORT", "8080"),
            ("POSTS_UTC_OFFSET", "-03:30"),
        ]))
        .unwrap();

        assert_eq!(config.database.max_connections, 4);
        assert!(config.database.log_statements);
        assert_eq!(config.port, 8080);
        assert_eq!(config.utc_offset, FixedOffset::west_opt(3 * 3600 + 1800).unwrap());
    }

    #[test]
    fn empty_port_falls_back_to_default() {
        let config =
            Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/posts"), ("PORT", "")]))
                .unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert_eq!(
            Config::from_lookup(lookup(&[("PORT", "3000")])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn bad_values_are_reported_by_name() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/posts"),
            ("PORT", "http"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "PORT",
                value: "http".into()
            }
        );

        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/posts"),
            ("POSTS_UTC_OFFSET", "Asia/Bangkok"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "POSTS_UTC_OFFSET", .. }));
    }
}
