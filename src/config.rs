use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Load environment variables from .env file with robust parsing.
/// Handles values with spaces without requiring quotes.
pub fn load_dotenv() {
    load_dotenv_from(Path::new(".env"));
}

fn load_dotenv_from(env_path: &Path) {
    if !env_path.exists() {
        return;
    }

    let content = match fs::read_to_string(env_path) {
        Ok(c) => c,
        Err(_) => return,
    };

    for (key, value) in parse_dotenv(&content) {
        // Only set if not already set (env vars take precedence)
        if std::env::var(key).is_err() {
            // SAFETY: We're single-threaded at this point (called before any async runtime)
            unsafe { std::env::set_var(key, value) };
        }
    }
}

/// Parse `KEY=value` lines, skipping blanks and comments and stripping
/// surrounding quotes.
fn parse_dotenv(content: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Find the first '=' and split there
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            let mut value = line[eq_pos + 1..].trim();

            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }

            pairs.push((key, value));
        }
    }

    pairs
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub polling: PollingConfig,
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL every endpoint path is appended to, e.g. `http://host/api`.
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub log_page_size: u32,
    /// City used when the create form leaves it blank.
    pub default_city: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://localhost:8080/api".to_string(),
                request_timeout_secs: None,
            },
            polling: PollingConfig { interval_secs: 10 },
            console: ConsoleConfig {
                log_page_size: 20,
                default_city: "Budapest".to_string(),
            },
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("GREENHOUSE_API_BASE") {
            config.backend.base_url = url;
        }
        if let Ok(timeout) = std::env::var("GREENHOUSE_REQUEST_TIMEOUT_SECS")
            && let Ok(t) = timeout.parse()
        {
            config.backend.request_timeout_secs = Some(t);
        }
        if let Ok(interval) = std::env::var("GREENHOUSE_POLL_INTERVAL_SECS")
            && let Ok(i) = interval.parse()
        {
            config.polling.interval_secs = i;
        }
        if let Ok(size) = std::env::var("GREENHOUSE_LOG_PAGE_SIZE")
            && let Ok(s) = size.parse()
        {
            config.console.log_page_size = s;
        }
        if let Ok(city) = std::env::var("GREENHOUSE_DEFAULT_CITY") {
            config.console.default_city = city;
        }

        config
    }
}
