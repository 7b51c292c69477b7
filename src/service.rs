// Payment-status service.
// Applies the fresh / stale / expired policy over the status cache and a payment source.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::backend::Payment;
use crate::cache::{Freshness, StatusCache};
use crate::error::{AppError, Result};
use crate::metrics::{self, Bucket};
use crate::period::Period;

/// Anything that can supply the payment rows for a month.
#[allow(async_fn_in_trait)]
pub trait PaymentSource {
    async fn fetch_payments(&self, period: &Period, member: Option<&str>) -> Result<Vec<Payment>>;
}

/// What to do with an entry past the fresh window but inside the stale window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Return the cached breakdown now; the caller revalidates afterwards.
    #[default]
    ServeStale,
    /// Recompute before returning.
    Recompute,
}

impl FromStr for StalePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "serve-stale" => Ok(StalePolicy::ServeStale),
            "recompute" => Ok(StalePolicy::Recompute),
            other => Err(AppError::Other(format!(
                "unknown stale policy '{}', expected serve-stale or recompute",
                other
            ))),
        }
    }
}

/// Where a breakdown came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Fresh,
    Stale,
    Computed,
}

/// Result of a status lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLookup {
    pub key: String,
    pub breakdown: Vec<Bucket>,
    pub origin: Origin,
    pub computed_at: DateTime<Utc>,
}

impl StatusLookup {
    /// True when the caller should schedule a background refresh.
    pub fn needs_revalidation(&self) -> bool {
        self.origin == Origin::Stale
    }
}

/// Cache key for a month, scoped to one member or to everyone.
pub fn cache_key(period: &Period, member: Option<&str>) -> String {
    format!("payment-status:{}:{}", period, member.unwrap_or("all"))
}

pub struct PaymentStatusService {
    cache: StatusCache,
}

impl PaymentStatusService {
    pub fn new(cache: StatusCache) -> Self {
        Self { cache }
    }

    #[cfg(test)]
    pub fn cache(&self) -> &StatusCache {
        &self.cache
    }

    /// Cached breakdown if still usable, without touching the source.
    pub fn cached(&self, period: &Period, member: Option<&str>) -> Option<StatusLookup> {
        let key = cache_key(period, member);
        let entry = self.cache.get(&key);
        let origin = match self.cache.freshness(entry) {
            Freshness::Fresh => Origin::Fresh,
            Freshness::Stale => Origin::Stale,
            Freshness::Expired => return None,
        };

        entry.map(|entry| StatusLookup {
            breakdown: entry.data().to_vec(),
            computed_at: entry.timestamp(),
            key,
            origin,
        })
    }

    /// Breakdown for a month, recomputing only when the cache cannot answer.
    pub async fn load<S: PaymentSource>(
        &mut self,
        source: &S,
        period: &Period,
        member: Option<&str>,
        policy: StalePolicy,
    ) -> Result<StatusLookup> {
        match self.cached(period, member) {
            Some(lookup) if lookup.origin == Origin::Fresh => {
                tracing::debug!(key = %lookup.key, "payment status served fresh");
                Ok(lookup)
            }
            Some(lookup) if policy == StalePolicy::ServeStale => {
                tracing::debug!(key = %lookup.key, "payment status served stale");
                Ok(lookup)
            }
            _ => self.refresh(source, period, member).await,
        }
    }

    /// Recompute from the source and store the result.
    pub async fn refresh<S: PaymentSource>(
        &mut self,
        source: &S,
        period: &Period,
        member: Option<&str>,
    ) -> Result<StatusLookup> {
        let key = cache_key(period, member);
        let payments = source.fetch_payments(period, member).await?;
        let breakdown = metrics::payment_status(&payments, member);

        let entry = self.cache.entry(breakdown.clone(), false);
        let computed_at = entry.timestamp();
        self.cache.set(key.clone(), entry);

        tracing::info!(
            %key,
            records = payments.len(),
            total = metrics::total(&breakdown),
            "payment status recomputed"
        );

        Ok(StatusLookup {
            key,
            breakdown,
            origin: Origin::Computed,
            computed_at,
        })
    }
}
