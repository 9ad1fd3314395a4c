//! Runtime configuration read from the environment
//!
//! `.env` is loaded by the binary before [`Config::load`] runs. Missing or
//! invalid values fall back to their defaults with a log line.

use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

use crate::fallback::DEFAULT_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// redb file backing the durable store
    pub database_url: String,
    pub environment: Environment,
    /// Only CORS origin allowed in production
    pub frontend_url: Option<String>,
    pub portfolio_data: Option<PathBuf>,
    pub geo_data: Option<PathBuf>,
    pub visit_buffer_capacity: usize,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", 5000),
            database_url: try_load("DATABASE_URL", "portfolio.db".to_string()),
            environment: try_load("APP_ENV", Environment::Development),
            frontend_url: optional("FRONTEND_URL"),
            portfolio_data: optional("PORTFOLIO_DATA").map(PathBuf::from),
            geo_data: optional("GEO_DATA").map(PathBuf::from),
            visit_buffer_capacity: try_load("VISIT_BUFFER_CAPACITY", DEFAULT_CAPACITY),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            database_url: "portfolio.db".to_string(),
            environment: Environment::Development,
            frontend_url: None,
            portfolio_data: None,
            geo_data: None,
            visit_buffer_capacity: DEFAULT_CAPACITY,
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = optional(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
        default
    })
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}
