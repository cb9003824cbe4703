//! USD pricing of native assets.
//!
//! This module provides a trait-based architecture for fetching a native
//! asset's USD unit price. The benchmark is a point-in-time comparator, so
//! pricing is deliberately coarse: one quote per native asset per run,
//! memoized by [`PriceCache`].
//!
//! # Architecture
//!
//! 1. The [`CostNormalizer`](crate::normalize::CostNormalizer) asks
//!    [`PriceCache::usd_price`] for an asset's quote.
//! 2. On the first request for an asset the cache calls the configured
//!    [`PriceSource`]; concurrent first requests collapse into one in-flight
//!    fetch.
//! 3. The outcome (quote or error) is held for the remainder of the run.
//!
//! Implement [`PriceSource`] to plug in a different oracle; the default is
//! [`CoinGeckoSource`].

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::errors::PriceError;

mod cache;
mod coingecko;

pub use cache::PriceCache;
pub use coingecko::CoinGeckoSource;

/// A source of USD unit prices for native assets.
///
/// Object-safe (`Box<dyn PriceSource>`) so oracles are pluggable at runtime.
/// Implementations are treated as rate-limited black boxes: the cache
/// guarantees at most one call per asset per run, and a returned error is
/// surfaced loudly rather than defaulted to zero.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// USD price of one whole unit of the asset identified by `asset`
    /// (a source-specific identifier, e.g. a CoinGecko asset id).
    async fn usd_price(&self, asset: &str) -> Result<BigDecimal, PriceError>;
}
