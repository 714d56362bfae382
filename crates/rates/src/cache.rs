//! Exchange-rate caching using Moka.
//!
//! Keeps recently fetched rates in memory so repeated reports for the same
//! currency pair do not hit the provider again.

use std::time::Duration;

use async_trait::async_trait;
use fairshare_core::CurrencyConverter;
use fairshare_shared::Currency;
use fairshare_shared::config::RatesConfig;
use moka::future::Cache;
use rust_decimal::Decimal;
use tracing::debug;

/// Default cache capacity (number of currency pairs).
const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Default time-to-live for cached rates (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Caching decorator around another converter.
///
/// Only successful lookups are stored; a `None` answer is retried on the next
/// call.
pub struct CachedConverter<C> {
    inner: C,
    cache: Option<Cache<(Currency, Currency), Decimal>>,
}

impl<C: CurrencyConverter> CachedConverter<C> {
    /// Wraps `inner` with the default capacity and TTL.
    #[must_use]
    pub fn new(inner: C) -> Self {
        Self::with_config(inner, DEFAULT_CACHE_CAPACITY, Some(Duration::from_secs(DEFAULT_TTL_SECS)))
    }

    /// Wraps `inner` with a custom capacity and TTL; a `None` TTL disables
    /// caching entirely.
    #[must_use]
    pub fn with_config(inner: C, max_capacity: u64, ttl: Option<Duration>) -> Self {
        let cache = ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build()
        });
        Self { inner, cache }
    }

    /// Wraps `inner` using the `rates` configuration section.
    #[must_use]
    pub fn from_config(inner: C, config: &RatesConfig) -> Self {
        Self::with_config(inner, config.cache_capacity, config.cache_ttl())
    }

    /// Returns the wrapped converter.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Drops every cached rate.
    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }

    /// Returns the number of cached pairs.
    ///
    /// Moka updates this lazily; call [`Self::run_pending_tasks`] first for
    /// an exact figure.
    pub fn entry_count(&self) -> u64 {
        self.cache.as_ref().map_or(0, Cache::entry_count)
    }

    /// Runs cache maintenance tasks.
    pub async fn run_pending_tasks(&self) {
        if let Some(cache) = &self.cache {
            cache.run_pending_tasks().await;
        }
    }
}

impl<C> std::fmt::Debug for CachedConverter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedConverter")
            .field("enabled", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C: CurrencyConverter> CurrencyConverter for CachedConverter<C> {
    async fn get_rate(&self, from: Currency, to: Currency) -> Option<Decimal> {
        let Some(cache) = &self.cache else {
            return self.inner.get_rate(from, to).await;
        };

        let key = (from, to);
        if let Some(rate) = cache.get(&key).await {
            debug!(%from, %to, %rate, "Exchange rate cache hit");
            return Some(rate);
        }

        let rate = self.inner.get_rate(from, to).await?;
        cache.insert(key, rate).await;
        Some(rate)
    }
}
