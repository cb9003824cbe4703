//! Per-run price memoization under concurrency.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use ledgerbench::{PriceCache, PriceError, PriceSource};

/// Source that counts fetches and answers slowly, so concurrent lookups
/// genuinely overlap.
struct SlowCountingSource {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PriceSource for SlowCountingSource {
    async fn usd_price(&self, _asset: &str) -> Result<BigDecimal, PriceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(BigDecimal::from_str("2000").unwrap())
    }
}

#[tokio::test]
async fn concurrent_lookups_collapse_into_one_fetch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = Arc::new(PriceCache::new(Box::new(SlowCountingSource {
        calls: Arc::clone(&calls),
    })));

    let lookups: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.usd_price("ethereum").await })
        })
        .collect();

    for lookup in lookups {
        let quote = lookup.await.unwrap().unwrap();
        assert_eq!(quote, BigDecimal::from_str("2000").unwrap());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn distinct_assets_fetch_independently() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = PriceCache::new(Box::new(SlowCountingSource {
        calls: Arc::clone(&calls),
    }));

    cache.usd_price("ethereum").await.unwrap();
    cache.usd_price("ripple").await.unwrap();
    cache.usd_price("ethereum").await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
