//! Conversion of raw fees into exact native-unit and USD costs.
//!
//! All arithmetic is fixed-point decimal: smallest-unit totals are computed
//! in `u128` and shifted with [`BigDecimal::new`], never through floating
//! point, so very small fees keep their exact digits.

use std::sync::Arc;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;

use crate::errors::NormalizeError;
use crate::price::PriceCache;
use crate::types::{ChainConfig, RawFee};

/// A raw fee resolved into comparable cost figures.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCost {
    /// Cost in the chain's native currency.
    pub native: BigDecimal,
    /// Native cost converted at the run's cached USD quote.
    pub usd: BigDecimal,
}

/// Chain-aware converter from [`RawFee`] to [`NormalizedCost`].
///
/// Holds the per-run [`PriceCache`]; cloning shares it, so every normalizer
/// in a run observes the same quotes.
#[derive(Clone)]
pub struct CostNormalizer {
    prices: Arc<PriceCache>,
}

impl CostNormalizer {
    pub fn new(prices: Arc<PriceCache>) -> Self {
        Self { prices }
    }

    /// Convert a raw fee into the chain's native currency.
    ///
    /// Pure and deterministic. `fee_decimals` is the chain's smallest-unit
    /// precision; it applies to the `Gas` and `SmallestUnit` shapes, while a
    /// `Native` amount is already denominated and is used verbatim.
    pub fn native_cost(fee: &RawFee, fee_decimals: u8) -> Result<BigDecimal, NormalizeError> {
        match fee {
            RawFee::Native(amount) => Ok(amount.clone()),
            RawFee::Gas {
                gas_used,
                gas_price,
                additional_cost,
            } => {
                let total = gas_used
                    .checked_mul(*gas_price)
                    .and_then(|cost| cost.checked_add(*additional_cost))
                    .ok_or_else(|| {
                        NormalizeError::overflow(format!(
                            "gas_used={gas_used} gas_price={gas_price} additional={additional_cost}"
                        ))
                    })?;
                Ok(shift(total, fee_decimals))
            }
            RawFee::SmallestUnit(units) => Ok(shift(*units, fee_decimals)),
        }
    }

    /// Resolve a raw fee into native and USD costs for a chain.
    ///
    /// A price-fetch failure propagates as an error; it is never folded into
    /// a zero USD cost.
    pub async fn normalize(
        &self,
        fee: &RawFee,
        config: &ChainConfig,
    ) -> Result<NormalizedCost, NormalizeError> {
        let native = Self::native_cost(fee, config.fee_decimals)?;
        let price = self.prices.usd_price(config.currency.asset_id).await?;
        let usd = (&native * &price).normalized();
        Ok(NormalizedCost { native, usd })
    }
}

/// Exact decimal shift of a smallest-unit amount: `units * 10^-decimals`,
/// with trailing zeros stripped for stable string output.
fn shift(units: u128, decimals: u8) -> BigDecimal {
    if units == 0 {
        return BigDecimal::from(0);
    }
    BigDecimal::new(BigInt::from(units), i64::from(decimals)).normalized()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use async_trait::async_trait;

    use crate::errors::PriceError;
    use crate::price::PriceSource;
    use crate::types::ChainId;

    use super::*;

    struct FixedPrice(&'static str);

    #[async_trait]
    impl PriceSource for FixedPrice {
        async fn usd_price(&self, _asset: &str) -> Result<BigDecimal, PriceError> {
            Ok(BigDecimal::from_str(self.0).unwrap())
        }
    }

    struct NoPrice;

    #[async_trait]
    impl PriceSource for NoPrice {
        async fn usd_price(&self, asset: &str) -> Result<BigDecimal, PriceError> {
            Err(PriceError::fetch_failed(asset, "oracle offline"))
        }
    }

    fn normalizer(source: impl PriceSource + 'static) -> CostNormalizer {
        CostNormalizer::new(Arc::new(PriceCache::new(Box::new(source))))
    }

    #[test]
    fn gas_fee_is_exact_at_18_decimals() {
        // 21000 gas at 50 gwei: 1.05e15 wei.
        let fee = RawFee::gas(21_000, 50_000_000_000);
        let native = CostNormalizer::native_cost(&fee, 18).unwrap();
        assert_eq!(native, BigDecimal::from_str("0.00105").unwrap());
        assert_eq!(native.to_string(), "0.00105");
    }

    #[test]
    fn surcharge_is_added_to_the_gas_cost() {
        let fee = RawFee::Gas {
            gas_used: 100_000,
            gas_price: 1_000_000_000,
            additional_cost: 50_000_000_000_000, // L1 data fee in wei
        };
        let native = CostNormalizer::native_cost(&fee, 18).unwrap();
        assert_eq!(native, BigDecimal::from_str("0.00015").unwrap());
    }

    #[test]
    fn precomputed_native_fee_is_used_verbatim() {
        let amount = BigDecimal::from_str("0.05123456").unwrap();
        let fee = RawFee::Native(amount.clone());
        // fee_decimals must be ignored for this shape.
        assert_eq!(CostNormalizer::native_cost(&fee, 18).unwrap(), amount);
        assert_eq!(CostNormalizer::native_cost(&fee, 0).unwrap(), amount);
    }

    #[test]
    fn drops_shift_by_six_decimals() {
        let fee = RawFee::SmallestUnit(12);
        let native = CostNormalizer::native_cost(&fee, 6).unwrap();
        assert_eq!(native, BigDecimal::from_str("0.000012").unwrap());
    }

    #[test]
    fn zero_fees_are_valid() {
        assert_eq!(
            CostNormalizer::native_cost(&RawFee::SmallestUnit(0), 6).unwrap(),
            BigDecimal::from(0)
        );
        assert_eq!(
            CostNormalizer::native_cost(&RawFee::gas(0, 0), 18).unwrap(),
            BigDecimal::from(0)
        );
    }

    #[test]
    fn overflowing_gas_fields_are_an_error() {
        let fee = RawFee::gas(u128::MAX, 2);
        let err = CostNormalizer::native_cost(&fee, 18).unwrap_err();
        assert!(matches!(err, NormalizeError::Overflow { .. }));
    }

    #[tokio::test]
    async fn usd_cost_multiplies_by_the_cached_quote() {
        let normalizer = normalizer(FixedPrice("2000"));
        let config = ChainId::EthereumSepolia.config();
        let cost = normalizer
            .normalize(&RawFee::gas(21_000, 50_000_000_000), &config)
            .await
            .unwrap();
        assert_eq!(cost.native, BigDecimal::from_str("0.00105").unwrap());
        assert_eq!(cost.usd, BigDecimal::from_str("2.1").unwrap());
    }

    #[tokio::test]
    async fn native_amounts_are_converted_exactly_once() {
        // A pre-computed native fee must not be multiplied into USD twice.
        let normalizer = normalizer(FixedPrice("0.5"));
        let config = ChainId::HederaTestnet.config();
        let fee = RawFee::Native(BigDecimal::from_str("0.2").unwrap());
        let cost = normalizer.normalize(&fee, &config).await.unwrap();
        assert_eq!(cost.usd, BigDecimal::from_str("0.1").unwrap());
    }

    #[tokio::test]
    async fn price_failure_propagates_instead_of_zeroing() {
        let normalizer = normalizer(NoPrice);
        let config = ChainId::XrplTestnet.config();
        let err = normalizer
            .normalize(&RawFee::SmallestUnit(10), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Price(_)));
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            /// Shifting back by the same precision recovers the smallest-unit total.
            #[test]
            fn shift_is_exact(units in 0u128..u128::from(u64::MAX), decimals in 0u8..=18) {
                let native = CostNormalizer::native_cost(
                    &RawFee::SmallestUnit(units),
                    decimals,
                ).unwrap();
                let scale = BigDecimal::new(bigdecimal::num_bigint::BigInt::from(1), -i64::from(decimals));
                prop_assert_eq!(native * scale, BigDecimal::from(units));
            }

            /// Gas normalization agrees with the smallest-unit shape on the
            /// same total.
            #[test]
            fn gas_matches_smallest_unit(
                gas_used in 0u128..30_000_000,
                gas_price in 0u128..1_000_000_000_000,
                extra in 0u128..1_000_000_000_000_000,
                decimals in 0u8..=18,
            ) {
                let gas = CostNormalizer::native_cost(
                    &RawFee::Gas { gas_used, gas_price, additional_cost: extra },
                    decimals,
                ).unwrap();
                let flat = CostNormalizer::native_cost(
                    &RawFee::SmallestUnit(gas_used * gas_price + extra),
                    decimals,
                ).unwrap();
                prop_assert_eq!(gas, flat);
            }
        }
    }
}
