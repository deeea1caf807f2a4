use crate::normalize::{NormalizedPayload, normalize_payload};
use crate::NormalizedMatch;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

/// Where the aggregation backend listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Client for the match aggregation backend. Every response is run through
/// the normalizer, so callers only ever see [`NormalizedMatch`] records.
#[derive(Debug, Clone)]
pub struct BetfeedApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for BetfeedApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("betfeed/0.1 (match feed normalizer)")
                .build()
                .unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
        }
    }
}

impl BetfeedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Matches currently in play.
    pub async fn fetch_live(&self) -> ApiResult<Vec<NormalizedMatch>> {
        let url = format!("{}/matches/live", self.base_url);
        self.fetch_list(&url).await
    }

    /// All matches kicking off on `date` (display timezone).
    pub async fn fetch_day(&self, date: NaiveDate) -> ApiResult<Vec<NormalizedMatch>> {
        let url = format!("{}/matches?date={}", self.base_url, date.format("%Y-%m-%d"));
        self.fetch_list(&url).await
    }

    /// One match with its full market list, stats, events and lineups.
    /// `Ok(None)` when the backend does not know the id.
    pub async fn fetch_match(&self, id: &str) -> ApiResult<Option<NormalizedMatch>> {
        let url = format!("{}/matches/{id}", self.base_url);
        let body: Value = self.get(&url).await?;
        Ok(normalize_payload(unwrap_envelope(&body)).and_then(|p| p.into_vec().into_iter().next()))
    }

    async fn fetch_list(&self, url: &str) -> ApiResult<Vec<NormalizedMatch>> {
        let body: Value = self.get(url).await?;
        let matches = normalize_payload(unwrap_envelope(&body))
            .map(NormalizedPayload::into_vec)
            .unwrap_or_default();
        log::debug!("{url}: {} matches", matches.len());
        Ok(matches)
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    log::debug!("{url}: {e}; treating as empty");
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

/// The backend wraps payloads as `{"success": true, "data": ...}`; older
/// endpoints return the payload bare.
fn unwrap_envelope(body: &Value) -> &Value {
    match body.get("data") {
        Some(data) if !data.is_null() => data,
        _ => body,
    }
}
