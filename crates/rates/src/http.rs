//! HTTP exchange-rate client.
//!
//! Talks to an exchangerate.host-style provider:
//! `GET {base_url}/convert?from=USD&to=EUR` answering
//! `{"info": {"rate": 0.92}}`.

use std::time::Duration;

use async_trait::async_trait;
use fairshare_core::CurrencyConverter;
use fairshare_shared::Currency;
use fairshare_shared::config::RatesConfig;
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while constructing a client.
///
/// Lookups themselves never fail; they answer `None`.
#[derive(Debug, Error)]
pub enum RateClientError {
    /// The configured base URL does not parse.
    #[error("invalid rate provider URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    info: Option<ConvertInfo>,
}

#[derive(Debug, Deserialize)]
struct ConvertInfo {
    rate: Option<Decimal>,
}

/// Why a single attempt produced no rate.
#[derive(Debug, Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("provider answered {0}")]
    Status(StatusCode),
    #[error("malformed payload: {0}")]
    Payload(reqwest::Error),
    #[error("payload carries no rate")]
    MissingRate,
    #[error("non-positive rate {0}")]
    NonPositive(Decimal),
}

impl FetchError {
    /// Transport failures and server errors may succeed on another attempt.
    fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status(status) => status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS,
            Self::Payload(_) | Self::MissingRate | Self::NonPositive(_) => false,
        }
    }
}

/// Live exchange-rate source over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRateClient {
    client: Client,
    endpoint: Url,
    access_key: Option<String>,
    max_retries: u32,
}

impl HttpRateClient {
    /// Builds a client from configuration.
    pub fn new(config: &RatesConfig) -> Result<Self, RateClientError> {
        let raw = format!("{}/convert", config.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&raw).map_err(|e| RateClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint,
            access_key: config
                .access_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string),
            max_retries: config.max_retries,
        })
    }

    /// Returns the full lookup endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch_once(&self, from: Currency, to: Currency) -> Result<Decimal, FetchError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .query(&[("from", from.as_str()), ("to", to.as_str())]);
        if let Some(key) = &self.access_key {
            request = request.query(&[("access_key", key.as_str())]);
        }

        let response = request.send().await.map_err(FetchError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body: ConvertResponse = response.json().await.map_err(FetchError::Payload)?;
        let rate = body
            .info
            .and_then(|info| info.rate)
            .ok_or(FetchError::MissingRate)?;
        if rate <= Decimal::ZERO {
            return Err(FetchError::NonPositive(rate));
        }
        Ok(rate)
    }
}

#[async_trait]
impl CurrencyConverter for HttpRateClient {
    async fn get_rate(&self, from: Currency, to: Currency) -> Option<Decimal> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(from, to).await {
                Ok(rate) => {
                    debug!(%from, %to, %rate, attempt, "Fetched exchange rate");
                    return Some(rate);
                }
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(%from, %to, error = %err, attempt, "Exchange rate lookup failed; retrying");
                    tokio::time::sleep(backoff(attempt)).await;
                }
                Err(err) => {
                    warn!(%from, %to, error = %err, attempt, "Exchange rate lookup failed");
                    return None;
                }
            }
        }
    }
}

/// Linear backoff between attempts.
fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(100 * u64::from(attempt))
}
