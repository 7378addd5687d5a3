use crate::error::{AppError, Result};

/// Number of asks kept in a snapshot, highest price first.
pub const TOP_ASKS_LIMIT: usize = 10;

/// Trailing window of the daily volume series. The series runs from
/// `day(now - 30d)` through `day(now)` inclusive, so it holds 31 points.
pub const VOLUME_WINDOW_DAYS: i64 = 30;

pub const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// SQLite file holding the asks/messages/blocks tables (DB_PATH).
    pub db_path: String,
    pub api_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "stats.db".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
        })
    }
}
