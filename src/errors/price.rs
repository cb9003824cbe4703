//! Error types for the price oracle.

/// Errors from fetching a native asset's USD quote.
///
/// `Clone` because the per-run [`PriceCache`](crate::price::PriceCache)
/// memoizes the first fetch outcome, including a failure, and hands it to
/// every subsequent caller for the rest of the run. A price failure must
/// surface on every affected USD computation rather than be masked as zero.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    /// The price source could not be reached or answered with an error.
    #[error("price fetch failed for {asset}: {details}")]
    FetchFailed { asset: String, details: String },

    /// The source answered, but without a usable quote for the asset.
    #[error("no USD quote in price response for {asset}: {details}")]
    InvalidResponse { asset: String, details: String },
}

impl PriceError {
    pub fn fetch_failed(asset: impl Into<String>, details: impl Into<String>) -> Self {
        PriceError::FetchFailed {
            asset: asset.into(),
            details: details.into(),
        }
    }

    pub fn invalid_response(asset: impl Into<String>, details: impl Into<String>) -> Self {
        PriceError::InvalidResponse {
            asset: asset.into(),
            details: details.into(),
        }
    }
}
