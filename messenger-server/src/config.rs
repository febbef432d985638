use std::path::PathBuf;

use messenger_core::{Error, StoreConfig};

pub const DEFAULT_ADDR: &str = "127.0.0.1:9001";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub log_dir: Option<PathBuf>,
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Reads `MESSENGER_SERVER_ADDR` and `MESSENGER_LOG_DIR` on top of the
    /// store settings.
    pub fn from_env() -> Result<Self, Error> {
        let store = StoreConfig::from_env()?;

        Ok(Self {
            addr: std::env::var("MESSENGER_SERVER_ADDR")
                .unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
            log_dir: std::env::var("MESSENGER_LOG_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            store,
        })
    }
}
