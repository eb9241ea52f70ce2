use crate::analytics::performance::DEFAULT_BATCH_LIMIT;
use anyhow::Context;
use std::{env, fmt::Display, str::FromStr};

pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub stats_batch_limit: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL missing")?;
        let redis_url = env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| {
            let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
            format!("0.0.0.0:{}", port)
        });

        Ok(Self {
            database_url,
            redis_url,
            bind_addr,
            db_max_connections: try_load("DB_MAX_CONNECTIONS", 10),
            stats_batch_limit: try_load("STATS_BATCH_LIMIT", DEFAULT_BATCH_LIMIT),
        })
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => parse_or_default(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or_default<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    raw.trim().parse().unwrap_or_else(|e| {
        tracing::warn!("Invalid {} value {:?} ({}), using default: {}", key, raw, e, default);
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default() {
        assert_eq!(parse_or_default("STATS_BATCH_LIMIT", "120", 50usize), 120);
        assert_eq!(parse_or_default("STATS_BATCH_LIMIT", " 20 ", 50usize), 20);
        assert_eq!(parse_or_default("STATS_BATCH_LIMIT", "lots", 50usize), 50);
        assert_eq!(parse_or_default("DB_MAX_CONNECTIONS", "-1", 10u32), 10);
    }
}
