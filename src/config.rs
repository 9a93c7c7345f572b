use std::path::PathBuf;
use std::time::Duration;

use crate::browser::Tab;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub storage_path: PathBuf,
    pub export_dir: PathBuf,
    pub page_size: usize,
    pub search_debounce: Duration,
    pub request_timeout: Duration,
    pub prefers_dark: bool,
    pub start_tab: Tab,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let api_url = env_required("ASTRA_API_URL")?
            .trim_end_matches('/')
            .to_string();

        let storage_path = PathBuf::from(env_or("ASTRA_STORAGE_PATH", ".astra/storage.json"));
        let export_dir = PathBuf::from(env_or("ASTRA_EXPORT_DIR", "."));

        let page_size: usize = env_or("ASTRA_PAGE_SIZE", "100")
            .parse()
            .map_err(|e| format!("Invalid ASTRA_PAGE_SIZE: {e}"))?;
        if page_size == 0 {
            return Err("Invalid ASTRA_PAGE_SIZE: must be greater than zero".to_string());
        }

        let debounce_ms: u64 = env_or("ASTRA_SEARCH_DEBOUNCE_MS", "300")
            .parse()
            .map_err(|e| format!("Invalid ASTRA_SEARCH_DEBOUNCE_MS: {e}"))?;

        let timeout_secs: u64 = env_or("ASTRA_REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid ASTRA_REQUEST_TIMEOUT_SECS: {e}"))?;

        let prefers_dark = match env_or("ASTRA_PREFERS_DARK", "false").as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" | "" => false,
            other => return Err(format!("Invalid ASTRA_PREFERS_DARK: {other}")),
        };

        let start_tab = Tab::from_param(&env_or("ASTRA_START_TAB", "summary"));

        let log_level = env_or("ASTRA_LOG_LEVEL", "info");

        Ok(Config {
            api_url,
            storage_path,
            export_dir,
            page_size,
            search_debounce: Duration::from_millis(debounce_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            prefers_dark,
            start_tab,
            log_level,
        })
    }

    /// Defaults for everything except the API location. Used by tests and embedders.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Config {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            storage_path: PathBuf::from(".astra/storage.json"),
            export_dir: PathBuf::from("."),
            page_size: 100,
            search_debounce: Duration::from_millis(300),
            request_timeout: Duration::from_secs(30),
            prefers_dark: false,
            start_tab: Tab::Summary,
            log_level: "info".to_string(),
        }
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
