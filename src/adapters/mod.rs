//! Chain adapters: one implementation of the uniform operation vocabulary
//! per ledger family.
//!
//! An adapter translates each logical operation into one or more native
//! transactions against its ledger and reports back a [`RawOperationResult`]
//! in whatever fee shape that ledger uses. Adapters submit *real*
//! transactions: every invocation creates fresh artifacts (a new token, a new
//! NFT, a new throwaway recipient), so calling an operation twice creates two
//! independent artifacts rather than being a safe retry.
//!
//! Operations on the same adapter instance share conversational state (a
//! mint targets the token deployed by the create that ran earlier in the same
//! pass), which is why the orchestrator runs a chain's operations strictly
//! in sequence.

use async_trait::async_trait;

use crate::config::BenchConfig;
use crate::errors::{AdapterError, RunError};
use crate::types::{ChainId, RawOperationResult};

mod evm;
mod hedera;
mod xrpl;

pub use evm::EvmAdapter;
pub use hedera::HederaAdapter;
pub use xrpl::XrplAdapter;

/// Result shorthand for adapter operations.
pub type OpResult = Result<RawOperationResult, AdapterError>;

/// The uniform operation vocabulary, implemented per ledger family.
///
/// One method per [`OperationId`](crate::types::OperationId); the default
/// bodies return [`AdapterError::NotImplemented`], so an adapter that leaves
/// an operation unwired produces the "missing wiring" failed row. A chain
/// that *cannot* express an operation returns
/// [`AdapterError::NotApplicable`] instead; that distinction is a comparison
/// fact, not a defect.
///
/// Errors are not swallowed here (except inside [`is_healthy`]); the
/// [`OperationDispatcher`](crate::dispatch::OperationDispatcher) owns turning
/// them into structured result rows.
///
/// [`is_healthy`]: ChainAdapter::is_healthy
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// The chain this adapter drives.
    fn chain(&self) -> ChainId;

    /// Lightweight read-only probe (latest block / server info). Returns
    /// `false` on any network or timeout error, never errors. Used purely
    /// as a pre-filter, not a correctness gate.
    async fn is_healthy(&self) -> bool;

    async fn create_fungible_token(&self) -> OpResult {
        Err(AdapterError::NotImplemented)
    }

    async fn mint_fungible_token(&self) -> OpResult {
        Err(AdapterError::NotImplemented)
    }

    async fn transfer_fungible_token(&self) -> OpResult {
        Err(AdapterError::NotImplemented)
    }

    async fn create_nft(&self) -> OpResult {
        Err(AdapterError::NotImplemented)
    }

    async fn mint_nft(&self) -> OpResult {
        Err(AdapterError::NotImplemented)
    }

    async fn transfer_nft(&self) -> OpResult {
        Err(AdapterError::NotImplemented)
    }

    async fn submit_message(&self) -> OpResult {
        Err(AdapterError::NotImplemented)
    }

    async fn create_token_contract(&self) -> OpResult {
        Err(AdapterError::NotImplemented)
    }

    async fn mint_token_contract(&self) -> OpResult {
        Err(AdapterError::NotImplemented)
    }

    async fn transfer_token_contract(&self) -> OpResult {
        Err(AdapterError::NotImplemented)
    }
}

/// Construct the adapter for a chain from the run configuration.
///
/// Construction performs local setup only (key parsing, client construction);
/// no network calls happen until the health check.
pub fn adapter_for(
    chain: ChainId,
    config: &BenchConfig,
) -> Result<Box<dyn ChainAdapter>, RunError> {
    let adapter: Box<dyn ChainAdapter> = match chain {
        ChainId::EthereumSepolia
        | ChainId::OptimismSepolia
        | ChainId::BaseSepolia
        | ChainId::PolygonAmoy => Box::new(
            EvmAdapter::new(chain, config)
                .map_err(|e| RunError::adapter_init(chain, e.to_string()))?,
        ),
        ChainId::HederaTestnet => Box::new(
            HederaAdapter::new(chain, config)
                .map_err(|e| RunError::adapter_init(chain, e.to_string()))?,
        ),
        ChainId::XrplTestnet => Box::new(
            XrplAdapter::new(chain, config)
                .map_err(|e| RunError::adapter_init(chain, e.to_string()))?,
        ),
    };
    Ok(adapter)
}
