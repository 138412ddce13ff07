use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::listing::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub page_size: usize,
    pub notice_dismiss_ms: u64,
    pub request_timeout_secs: u64,
    pub local_storage_path: Option<PathBuf>,
}

fn parsed<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number", key))),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let page_size: usize = parsed("PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(AppError::Config("PAGE_SIZE must be at least 1".to_string()));
        }

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .map_err(|_| AppError::Config("API_BASE_URL must be set".to_string()))?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: parsed("SERVER_PORT", 3000)?,
            page_size,
            notice_dismiss_ms: parsed("NOTICE_DISMISS_MS", 3000)?,
            request_timeout_secs: parsed("REQUEST_TIMEOUT_SECS", 15)?,
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_dismiss_ms)
    }

    /// Defaults for everything but the upstream URL.
    pub fn with_api_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            page_size: DEFAULT_PAGE_SIZE,
            notice_dismiss_ms: 3000,
            request_timeout_secs: 15,
            local_storage_path: None,
        }
    }
}
