use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

pub const DEFAULT_DB_PATH: &str = "messages.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Where the message log lives and how long to wait on a locked database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_PATH)
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY_PATH
    }

    /// Build the config from `MESSENGER_DB_PATH` and `MESSENGER_BUSY_TIMEOUT_MS`,
    /// reading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();

        let db_path = std::env::var("MESSENGER_DB_PATH")
            .unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        let busy_timeout_ms: u64 = std::env::var("MESSENGER_BUSY_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_BUSY_TIMEOUT_MS.to_string())
            .parse()
            .map_err(|e| Error::Config(format!("Invalid MESSENGER_BUSY_TIMEOUT_MS: {}", e)))?;

        Ok(Self::new(db_path).with_busy_timeout(Duration::from_millis(busy_timeout_ms)))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}
