//! Error types for orchestrating a benchmark run.

use crate::types::ChainId;

/// Errors that abort an entire run.
///
/// Per-operation failures never reach this type; they are converted into
/// failed result rows by the dispatcher. A run only fails as a whole when it
/// could not produce any comparative data at all.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Every requested chain failed its health check. No partial output is
    /// produced.
    #[error("no healthy chains available")]
    NoHealthyChains,

    /// An adapter could not be constructed for a requested chain.
    #[error("failed to initialize adapter for {chain}: {details}")]
    AdapterInit { chain: ChainId, details: String },

    /// The run request was empty or otherwise unusable.
    #[error("invalid run request: {details}")]
    InvalidRequest { details: String },
}

impl RunError {
    pub fn adapter_init(chain: ChainId, details: impl Into<String>) -> Self {
        RunError::AdapterInit {
            chain,
            details: details.into(),
        }
    }

    pub fn invalid_request(details: impl Into<String>) -> Self {
        RunError::InvalidRequest {
            details: details.into(),
        }
    }
}
