use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use thiserror::Error;
use tracing::info;

use crate::shared::core::counting::CountingModel;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub counting_model: CountingModel,
    pub report_counts: bool,
}

impl Config {
    /// - `VOTES_BIND_ADDR` (default 0.0.0.0:8080)
    /// - `VOTES_COUNTING_MODEL`: signed or single (default signed)
    /// - `VOTES_REPORT_COUNTS`: whether writes return the recomputed tally (default true)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            bind_addr: try_load(&lookup, "VOTES_BIND_ADDR", "0.0.0.0:8080")?,
            counting_model: try_load(&lookup, "VOTES_COUNTING_MODEL", "signed")?,
            report_counts: try_load(&lookup, "VOTES_REPORT_COUNTS", "true")?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
