//! Error types for cost normalization.

use super::PriceError;

/// Errors from converting a raw fee into native and USD costs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NormalizeError {
    /// The USD quote for the chain's native asset is unavailable. Fatal to
    /// every USD computation for that asset for the remainder of the run.
    #[error("price unavailable: {0}")]
    Price(#[from] PriceError),

    /// Smallest-unit fee arithmetic overflowed. Only reachable with
    /// nonsensical gas fields; recorded rather than silently saturated.
    #[error("fee arithmetic overflowed: {details}")]
    Overflow { details: String },
}

impl NormalizeError {
    pub fn overflow(details: impl Into<String>) -> Self {
        NormalizeError::Overflow {
            details: details.into(),
        }
    }
}
