use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use dotenvy::dotenv;
use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: &str = "4";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value: {message}")]
    Invalid { key: String, message: String },

    #[error("DATABASE_URL must be set when RECIPES_STORAGE is postgres")]
    MissingDatabaseUrl,
}

/// Where recipes are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Postgres { database_url: String, pool_size: u32 },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: Storage,
    pub bind_address: SocketAddr,
    pub log_level: String,
}

impl Config {
    /// Reads the process environment, after loading `.env` when one exists.
    pub fn load() -> Result<Self, ConfigError> {
        if dotenv().is_err() {
            info!("No .env file loaded");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage = match try_load::<String>(&lookup, "RECIPES_STORAGE", "postgres")?
            .to_lowercase()
            .as_str()
        {
            "memory" => Storage::Memory,
            "postgres" => Storage::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?,
                pool_size: try_load(&lookup, "RECIPES_POOL_SIZE", DEFAULT_POOL_SIZE)?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: "RECIPES_STORAGE".to_owned(),
                    message: format!("unknown storage `{other}`, expected postgres or memory"),
                })
            }
        };

        Ok(Self {
            storage,
            bind_address: try_load(&lookup, "RECIPES_BIND", DEFAULT_BIND)?,
            log_level: try_load(&lookup, "RECIPES_LOG", DEFAULT_LOG_LEVEL)?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_owned()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key: key.to_owned(),
                message: e.to_string(),
            }
        })
}
