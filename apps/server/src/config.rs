use std::path::PathBuf;
use std::time::Duration;

use marketkit_market_data::DEFAULT_API_URL;
use marketkit_storage_sqlite::db::DEFAULT_DB_PATH;

pub struct Config {
    pub db_path: String,
    pub api_url: String,
    pub api_key: Option<String>,
    pub sync_interval: Duration,
    pub request_timeout: Duration,
    pub overrides_path: Option<PathBuf>,
    pub initial_coins_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let db_path = non_empty("MK_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());
        let api_url = non_empty("MK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let interval_secs: u64 = non_empty("MK_SYNC_INTERVAL_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(3600);
        let timeout_ms: u64 = non_empty("MK_REQUEST_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30000);

        Self {
            db_path,
            api_url,
            api_key: non_empty("MK_API_KEY"),
            sync_interval: Duration::from_secs(interval_secs),
            request_timeout: Duration::from_millis(timeout_ms),
            overrides_path: non_empty("MK_OVERRIDES_PATH").map(PathBuf::from),
            initial_coins_path: non_empty("MK_INITIAL_COINS_PATH").map(PathBuf::from),
        }
    }
}
