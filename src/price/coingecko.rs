//! CoinGecko-backed price source.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::errors::PriceError;

use super::PriceSource;

/// Price source backed by CoinGecko's `/simple/price` endpoint.
///
/// The quote is parsed from its JSON text form straight into a
/// [`BigDecimal`], avoiding an f64 round-trip that could perturb the digits
/// the API actually returned.
pub struct CoinGeckoSource {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoSource {
    /// Create a source against the given API base URL
    /// (e.g. `https://api.coingecko.com/api/v3`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    async fn usd_price(&self, asset: &str) -> Result<BigDecimal, PriceError> {
        let url = format!(
            "{}/simple/price?ids={asset}&vs_currencies=usd",
            self.base_url.trim_end_matches('/')
        );
        tracing::debug!(asset, %url, "fetching USD quote");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PriceError::fetch_failed(asset, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::fetch_failed(
                asset,
                format!("price API returned HTTP {status}"),
            ));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PriceError::fetch_failed(asset, e.to_string()))?;

        // Response shape: {"<asset>": {"usd": 0.52}}
        let quote = body
            .get(asset)
            .and_then(|entry| entry.get("usd"))
            .ok_or_else(|| PriceError::invalid_response(asset, body.to_string()))?;

        let quote = quote
            .as_number()
            .ok_or_else(|| PriceError::invalid_response(asset, quote.to_string()))?;

        BigDecimal::from_str(&quote.to_string())
            .map_err(|e| PriceError::invalid_response(asset, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_is_a_fetch_failure() {
        // Reserved TEST-NET-1 address; nothing listens there.
        let source = CoinGeckoSource::new("http://192.0.2.1:1", Duration::from_millis(200));
        let err = source.usd_price("ethereum").await.unwrap_err();
        assert!(matches!(err, PriceError::FetchFailed { .. }));
    }
}
