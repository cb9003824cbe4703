//! Error types for chain adapter operations.

/// Errors produced while executing one operation against one ledger.
///
/// Adapters do not swallow errors (except inside `is_healthy`); anything they
/// raise propagates to the
/// [`OperationDispatcher`](crate::dispatch::OperationDispatcher), which turns
/// it into a structured result row. Two variants are semantically special:
///
/// - [`AdapterError::NotApplicable`] marks an operation the chain's model has
///   no equivalent for: a comparison fact rendered as "N/A", not a failure.
/// - [`AdapterError::NotImplemented`] marks missing wiring (an operation the
///   adapter has no mapping for), recorded as a failed row.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The chain legitimately lacks this capability.
    #[error("not applicable: {reason}")]
    NotApplicable { reason: String },

    /// No adapter method is mapped for this operation.
    #[error("operation not implemented or supported")]
    NotImplemented,

    /// A required credential, artifact, or endpoint was not configured.
    #[error("adapter misconfigured: {details}")]
    Misconfigured { details: String },

    /// RPC or REST transport failure while talking to the ledger.
    #[error("rpc error: {details}")]
    Rpc { details: String },

    /// The ledger rejected the submission.
    #[error("submission rejected: {details}")]
    Submission { details: String },

    /// A response arrived but did not have the expected shape.
    #[error("unexpected response: {details}")]
    UnexpectedResponse { details: String },
}

impl AdapterError {
    /// Mark an operation as not applicable for this chain.
    pub fn not_applicable(reason: impl Into<String>) -> Self {
        AdapterError::NotApplicable {
            reason: reason.into(),
        }
    }

    pub fn misconfigured(details: impl Into<String>) -> Self {
        AdapterError::Misconfigured {
            details: details.into(),
        }
    }

    /// Wrap any transport-level error as an RPC failure.
    pub fn rpc(err: impl std::fmt::Display) -> Self {
        AdapterError::Rpc {
            details: err.to_string(),
        }
    }

    pub fn submission(details: impl Into<String>) -> Self {
        AdapterError::Submission {
            details: details.into(),
        }
    }

    pub fn unexpected(details: impl Into<String>) -> Self {
        AdapterError::UnexpectedResponse {
            details: details.into(),
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        AdapterError::rpc(err)
    }
}
