use betfeed_api::client::DEFAULT_BASE_URL;
use std::time::Duration;

pub const DEFAULT_POLL_SECS: u64 = 15;
pub const MIN_POLL_SECS: u64 = 12;
pub const MAX_POLL_SECS: u64 = 30;
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub backend_url: String,
    pub poll_interval: Duration,
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BASE_URL.to_owned(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl AppSettings {
    /// Read settings from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let poll_secs = non_empty("BETFEED_POLL_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_SECS)
            .clamp(MIN_POLL_SECS, MAX_POLL_SECS);

        Self {
            backend_url: non_empty("BETFEED_BACKEND_URL").unwrap_or(defaults.backend_url),
            poll_interval: Duration::from_secs(poll_secs),
            log_filter: non_empty("BETFEED_LOG")
                .or_else(|| non_empty("RUST_LOG"))
                .unwrap_or(defaults.log_filter),
        }
    }
}
