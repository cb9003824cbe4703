//! Per-run memoization of USD quotes.

use std::collections::HashMap;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use tokio::sync::{Mutex, OnceCell};

use crate::errors::PriceError;

use super::PriceSource;

type CachedQuote = Arc<OnceCell<Result<BigDecimal, PriceError>>>;

/// Per-run cache of native-asset USD quotes.
///
/// Guarantees at most one [`PriceSource`] call per asset per run: the first
/// caller performs the fetch while concurrent callers for the same asset
/// await the same in-flight request. The outcome is held for the remainder of
/// the run, including a failed fetch, which stays fatal to every USD
/// computation for that asset rather than being retried or masked as zero.
///
/// Staleness beyond one run is irrelevant by design; each run builds a fresh
/// cache.
pub struct PriceCache {
    source: Box<dyn PriceSource>,
    quotes: Mutex<HashMap<String, CachedQuote>>,
}

impl PriceCache {
    pub fn new(source: Box<dyn PriceSource>) -> Self {
        Self {
            source,
            quotes: Mutex::new(HashMap::new()),
        }
    }

    /// USD price of one whole unit of `asset`, fetched on first use.
    pub async fn usd_price(&self, asset: &str) -> Result<BigDecimal, PriceError> {
        let cell = {
            let mut quotes = self.quotes.lock().await;
            Arc::clone(quotes.entry(asset.to_owned()).or_default())
        };
        // The map lock is released before the fetch; only callers for the
        // same asset serialize on the cell.
        cell.get_or_init(|| async {
            let outcome = self.source.usd_price(asset).await;
            match &outcome {
                Ok(price) => tracing::info!(asset, %price, "cached USD quote for run"),
                Err(err) => {
                    tracing::warn!(asset, %err, "price fetch failed; cached for run")
                }
            }
            outcome
        })
        .await
        .clone()
    }
}
