//! Application configuration management.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Exchange-rate adapter configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Settlement engine configuration.
    #[serde(default)]
    pub settlement: SettlementConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Exchange-rate HTTP adapter configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Base URL of the rate provider (`{base_url}/convert?from=..&to=..`).
    #[serde(default = "default_rates_base_url")]
    pub base_url: String,
    /// Optional provider access key, sent as `access_key`.
    #[serde(default)]
    pub access_key: Option<String>,
    /// Per-request HTTP timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Extra attempts after a failed request.
    #[serde(default)]
    pub max_retries: u32,
    /// How long a fetched rate stays cached, in seconds (0 disables caching).
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Maximum number of cached currency pairs.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

fn default_rates_base_url() -> String {
    "https://api.exchangerate.host".to_string()
}

fn default_request_timeout_ms() -> u64 {
    3000
}

fn default_cache_ttl_secs() -> u64 {
    300 // 5 minutes
}

fn default_cache_capacity() -> u64 {
    1000
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            base_url: default_rates_base_url(),
            access_key: None,
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: 0,
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl RatesConfig {
    /// Per-request HTTP timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Cache time-to-live, `None` when caching is disabled.
    #[must_use]
    pub const fn cache_ttl(&self) -> Option<Duration> {
        if self.cache_ttl_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.cache_ttl_secs))
        }
    }
}

/// Settlement engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Deadline for a single rate lookup while building a report.
    #[serde(default = "default_rate_timeout_ms")]
    pub rate_timeout_ms: u64,
    /// Currency assumed for snapshots that do not name one.
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_rate_timeout_ms() -> u64 {
    2000
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            rate_timeout_ms: default_rate_timeout_ms(),
            default_currency: default_currency(),
        }
    }
}

impl SettlementConfig {
    /// Deadline for a single rate lookup.
    #[must_use]
    pub const fn rate_timeout(&self) -> Duration {
        Duration::from_millis(self.rate_timeout_ms)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "fairshare=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `FAIRSHARE__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("FAIRSHARE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.rates.base_url, "https://api.exchangerate.host");
        assert_eq!(config.rates.request_timeout(), Duration::from_millis(3000));
        assert_eq!(config.rates.max_retries, 0);
        assert_eq!(config.rates.cache_ttl(), Some(Duration::from_secs(300)));
        assert_eq!(config.settlement.rate_timeout(), Duration::from_millis(2000));
        assert_eq!(config.settlement.default_currency, "USD");
        assert_eq!(config.log.filter, "fairshare=info");
        assert!(!config.log.json);
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let rates = RatesConfig {
            cache_ttl_secs: 0,
            ..RatesConfig::default()
        };
        assert_eq!(rates.cache_ttl(), None);
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        temp_env::with_vars_unset(
            [
                "FAIRSHARE__RATES__BASE_URL",
                "FAIRSHARE__SETTLEMENT__RATE_TIMEOUT_MS",
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.settlement.rate_timeout_ms, 2000);
                assert_eq!(config.rates.base_url, "https://api.exchangerate.host");
            },
        );
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("FAIRSHARE__RATES__BASE_URL", Some("http://localhost:9000")),
                ("FAIRSHARE__SETTLEMENT__RATE_TIMEOUT_MS", Some("250")),
                ("FAIRSHARE__SETTLEMENT__DEFAULT_CURRENCY", Some("EUR")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.rates.base_url, "http://localhost:9000");
                assert_eq!(config.settlement.rate_timeout(), Duration::from_millis(250));
                assert_eq!(config.settlement.default_currency, "EUR");
            },
        );
    }
}
