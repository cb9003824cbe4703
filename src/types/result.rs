//! Final, comparable result rows.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ChainId, OperationId};

/// Outcome of one (chain, operation) attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// The operation executed and its fee was captured.
    Success,
    /// The operation was attempted but failed, or its wiring is missing.
    Failed,
    /// The chain's model has no equivalent for this operation. A comparison
    /// fact, not a defect; rendered as "N/A" downstream.
    NotApplicable,
}

/// One row of the benchmark output.
///
/// Produced exactly once per (chain, operation) attempt and immutable after
/// creation. Costs are exact decimals and serialize as strings, which is the
/// sole contract with downstream reporting.
#[derive(Debug, Clone, Serialize)]
pub struct OperationResult {
    pub chain: ChainId,
    pub operation: OperationId,
    pub status: OperationStatus,
    pub tx_hash: Option<String>,
    /// Cost in the chain's native currency. Present when the fee could be
    /// captured, even for failed (reverted) submissions.
    pub native_cost: Option<BigDecimal>,
    /// Native cost converted at the per-run USD quote. Absent when the price
    /// fetch failed; never silently zero.
    pub usd_cost: Option<BigDecimal>,
    pub currency: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Present only for failed rows.
    pub error: Option<String>,
    /// Present only for not-applicable rows: why the chain has no equivalent
    /// for the operation.
    pub reason: Option<String>,
}

impl OperationResult {
    /// A successful row with captured costs.
    pub fn success(
        chain: ChainId,
        operation: OperationId,
        tx_hash: Option<String>,
        native_cost: BigDecimal,
        usd_cost: BigDecimal,
    ) -> Self {
        Self {
            chain,
            operation,
            status: OperationStatus::Success,
            tx_hash,
            native_cost: Some(native_cost),
            usd_cost: Some(usd_cost),
            currency: chain.config().currency.symbol,
            timestamp: Utc::now(),
            error: None,
            reason: None,
        }
    }

    /// A failed row carrying the underlying error message.
    pub fn failed(chain: ChainId, operation: OperationId, error: impl Into<String>) -> Self {
        Self {
            chain,
            operation,
            status: OperationStatus::Failed,
            tx_hash: None,
            native_cost: None,
            usd_cost: None,
            currency: chain.config().currency.symbol,
            timestamp: Utc::now(),
            error: Some(error.into()),
            reason: None,
        }
    }

    /// A row for an operation the chain has no equivalent for.
    pub fn not_applicable(
        chain: ChainId,
        operation: OperationId,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            chain,
            operation,
            status: OperationStatus::NotApplicable,
            tx_hash: None,
            native_cost: None,
            usd_cost: None,
            currency: chain.config().currency.symbol,
            timestamp: Utc::now(),
            // Not an error: the chain simply has no equivalent operation.
            error: None,
            reason: Some(reason.into()),
        }
    }

    /// Attach the transaction hash, when one exists for a failed row.
    pub fn with_tx_hash(mut self, tx_hash: Option<String>) -> Self {
        self.tx_hash = tx_hash;
        self
    }

    /// Attach captured costs to a failed row (a reverted transaction still
    /// paid its fee).
    pub fn with_costs(mut self, native_cost: BigDecimal, usd_cost: BigDecimal) -> Self {
        self.native_cost = Some(native_cost);
        self.usd_cost = Some(usd_cost);
        self
    }
}
