//! Execution of one operation on one chain, with failure containment.
//!
//! The dispatcher is the boundary between fallible adapter work and the
//! always-produced result rows: every `(chain, operation)` attempt yields
//! exactly one [`OperationResult`], whatever went wrong underneath. Errors
//! become failed rows, never panics and never retries; a retry would submit
//! a second real transaction and double the measured spend.

use crate::adapters::ChainAdapter;
use crate::errors::AdapterError;
use crate::normalize::CostNormalizer;
use crate::types::{ChainId, OperationId, OperationResult, RawOperationResult};

/// Routes an [`OperationId`] to the adapter method implementing it and turns
/// the outcome into a result row.
#[derive(Clone)]
pub struct OperationDispatcher {
    normalizer: CostNormalizer,
}

impl OperationDispatcher {
    pub fn new(normalizer: CostNormalizer) -> Self {
        Self { normalizer }
    }

    /// Execute one operation on one chain. Infallible by contract: adapter
    /// and normalization errors are absorbed into the row.
    pub async fn execute(&self, adapter: &dyn ChainAdapter, op: OperationId) -> OperationResult {
        let chain = adapter.chain();
        tracing::info!(%chain, %op, "executing operation");

        let raw = match dispatch(adapter, op).await {
            Ok(raw) => raw,
            Err(AdapterError::NotApplicable { reason }) => {
                tracing::info!(%chain, %op, %reason, "operation not applicable");
                return OperationResult::not_applicable(chain, op, reason);
            }
            Err(err) => {
                tracing::warn!(%chain, %op, %err, "operation failed");
                return OperationResult::failed(chain, op, err.to_string());
            }
        };

        self.resolve(chain, op, raw).await
    }

    /// Normalize a captured fee into the final row. A reverted submission
    /// still paid its fee, so its row carries costs alongside the failure.
    async fn resolve(
        &self,
        chain: ChainId,
        op: OperationId,
        raw: RawOperationResult,
    ) -> OperationResult {
        let config = chain.config();
        match self.normalizer.normalize(&raw.fee, &config).await {
            Ok(cost) if raw.success => {
                tracing::info!(%chain, %op, native = %cost.native, usd = %cost.usd, "operation succeeded");
                OperationResult::success(chain, op, raw.tx_hash, cost.native, cost.usd)
            }
            Ok(cost) => {
                tracing::warn!(%chain, %op, "transaction included but reported failed");
                OperationResult::failed(chain, op, "transaction included but reported failed")
                    .with_tx_hash(raw.tx_hash)
                    .with_costs(cost.native, cost.usd)
            }
            Err(err) => {
                tracing::warn!(%chain, %op, %err, "cost normalization failed");
                OperationResult::failed(chain, op, err.to_string()).with_tx_hash(raw.tx_hash)
            }
        }
    }
}

/// Exhaustive routing table from operation ids to trait methods.
async fn dispatch(
    adapter: &dyn ChainAdapter,
    op: OperationId,
) -> Result<RawOperationResult, AdapterError> {
    match op {
        OperationId::CreateFungibleToken => adapter.create_fungible_token().await,
        OperationId::MintFungibleToken => adapter.mint_fungible_token().await,
        OperationId::TransferFungibleToken => adapter.transfer_fungible_token().await,
        OperationId::CreateNft => adapter.create_nft().await,
        OperationId::MintNft => adapter.mint_nft().await,
        OperationId::TransferNft => adapter.transfer_nft().await,
        OperationId::SubmitMessage => adapter.submit_message().await,
        OperationId::CreateTokenContract => adapter.create_token_contract().await,
        OperationId::MintTokenContract => adapter.mint_token_contract().await,
        OperationId::TransferTokenContract => adapter.transfer_token_contract().await,
    }
}
