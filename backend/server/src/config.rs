use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::info;

use crate::error::ServerError;

pub struct Config {
    pub port: u16,
    pub cors_max_age: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ServerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: try_load(&lookup, "RUST_PORT", "3000")?,
            cors_max_age: Duration::from_secs(try_load(&lookup, "CORS_MAX_AGE", "3600")?),
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ServerError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e: T::Err| ServerError::Config {
            key,
            message: e.to_string(),
        })
}
