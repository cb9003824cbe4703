//! Error types for the ledgerbench library.
//!
//! Follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`AdapterError`],
//!   [`PriceError`], [`NormalizeError`], [`RunError`])
//! - **Unified error type** ([`LedgerbenchError`]) for callers that don't
//!   need to distinguish between error sources
//!
//! Everything below the "no healthy chains" threshold is recovered inside the
//! dispatcher and converted into a failed or not-applicable result row, so
//! these types mostly cross module boundaries, not the public `run` API.

mod adapter;
mod normalize;
mod price;
mod run;

pub use adapter::AdapterError;
pub use normalize::NormalizeError;
pub use price::PriceError;
pub use run::RunError;

/// Unified error type for all ledgerbench operations.
///
/// Module-specific errors convert automatically via `From`, so `?` works
/// across module boundaries.
#[derive(Debug, thiserror::Error)]
pub enum LedgerbenchError {
    /// Error from a chain adapter.
    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),

    /// Error from the price oracle.
    #[error("price error: {0}")]
    Price(#[from] PriceError),

    /// Error from cost normalization.
    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Error from orchestrating a run.
    #[error("run error: {0}")]
    Run(#[from] RunError),
}
