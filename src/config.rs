// src/config.rs
//
// Runtime configuration from environment variables (a `.env` file is read
// first when present).

use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Where the watchlists live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Firestore,
    /// In-process store, lost on exit
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "firestore" => Ok(StoreBackend::Firestore),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::Config(format!(
                "WATCHLIST_BACKEND must be 'firestore' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tmdb_api_key: String,
    pub tmdb_base_url: Option<String>,
    pub firebase_api_key: Option<String>,
    pub firebase_project_id: Option<String>,
    pub backend: StoreBackend,
    pub poll_interval: Duration,
    pub log_level: log::LevelFilter,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `VITE_`-prefixed names are accepted as
    /// fallbacks so an existing web `.env` can be reused.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&format!("VITE_{}", key)))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let tmdb_api_key = get("TMDB_API_KEY")
            .ok_or_else(|| AppError::Config("TMDB_API_KEY is not set".to_string()))?;

        let backend = match get("WATCHLIST_BACKEND") {
            Some(value) => value.parse()?,
            None => StoreBackend::default(),
        };

        let firebase_api_key = get("FIREBASE_API_KEY");
        let firebase_project_id = get("FIREBASE_PROJECT_ID");

        if backend == StoreBackend::Firestore {
            if firebase_api_key.is_none() {
                return Err(AppError::Config(
                    "FIREBASE_API_KEY is required for the firestore backend".to_string(),
                ));
            }
            if firebase_project_id.is_none() {
                return Err(AppError::Config(
                    "FIREBASE_PROJECT_ID is required for the firestore backend".to_string(),
                ));
            }
        }

        let poll_interval_ms = match get("WATCHLIST_POLL_INTERVAL_MS") {
            Some(value) => value.parse::<u64>().map_err(|_| {
                AppError::Config(format!("Invalid WATCHLIST_POLL_INTERVAL_MS: {}", value))
            })?,
            None => DEFAULT_POLL_INTERVAL_MS,
        };

        let log_level = match get("LOG_LEVEL") {
            Some(value) => value
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid LOG_LEVEL: {}", value)))?,
            None => log::LevelFilter::Info,
        };

        Ok(Self {
            tmdb_api_key,
            tmdb_base_url: get("TMDB_BASE_URL"),
            firebase_api_key,
            firebase_project_id,
            backend,
            poll_interval: Duration::from_millis(poll_interval_ms.max(100)),
            log_level,
        })
    }
}
