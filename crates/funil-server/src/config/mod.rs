use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    pub slow_insert_threshold: Duration,
    pub readiness_requires_store: bool,
    pub shutdown_drain: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 16 * 1024,
            request_timeout: Duration::from_secs(5),
            slow_insert_threshold: Duration::from_millis(200),
            readiness_requires_store: true,
            shutdown_drain: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("artifacts/funil.db"),
            busy_timeout: Duration::from_millis(2000),
        }
    }
}

pub fn validate_startup_config(api: &ApiConfig, store: &StoreConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("api size limits must be > 0".to_string());
    }
    if api.request_timeout.is_zero() {
        return Err("timeouts must be > 0".to_string());
    }
    if store.db_path.as_os_str().is_empty() {
        return Err("store db path must not be empty".to_string());
    }
    if store.busy_timeout.is_zero() {
        return Err("sqlite busy timeout must be > 0".to_string());
    }
    Ok(())
}
