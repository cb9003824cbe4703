//! Shared test doubles: a scriptable chain adapter and fixed price sources.

#![allow(dead_code)]

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use ledgerbench::adapters::OpResult;
use ledgerbench::{
    AdapterError, ChainAdapter, ChainId, CostNormalizer, OperationId, PriceCache, PriceError,
    PriceSource, RawFee, RawOperationResult,
};

/// Scripted outcome for one operation on a [`MockAdapter`].
#[derive(Debug, Clone)]
pub enum Scripted {
    Ok(RawFee),
    Reverted(RawFee),
    Fail(&'static str),
    NotApplicable(&'static str),
}

/// In-memory chain adapter with scripted health and per-operation outcomes.
/// Operations without a script fall through to the trait's not-implemented
/// default.
pub struct MockAdapter {
    chain: ChainId,
    healthy: bool,
    scripted: HashMap<OperationId, Scripted>,
}

impl MockAdapter {
    pub fn healthy(chain: ChainId) -> Self {
        Self {
            chain,
            healthy: true,
            scripted: HashMap::new(),
        }
    }

    pub fn unhealthy(chain: ChainId) -> Self {
        Self {
            chain,
            healthy: false,
            scripted: HashMap::new(),
        }
    }

    pub fn with(mut self, op: OperationId, outcome: Scripted) -> Self {
        self.scripted.insert(op, outcome);
        self
    }

    /// Every operation scripted to succeed with a small gas fee.
    pub fn all_ok(chain: ChainId) -> Self {
        let mut adapter = Self::healthy(chain);
        for op in OperationId::ALL {
            adapter = adapter.with(op, Scripted::Ok(RawFee::gas(21_000, 50_000_000_000)));
        }
        adapter
    }

    fn respond(&self, op: OperationId) -> OpResult {
        match self.scripted.get(&op) {
            Some(Scripted::Ok(fee)) => Ok(RawOperationResult::ok(format!("0x{op}"), fee.clone())),
            Some(Scripted::Reverted(fee)) => {
                Ok(RawOperationResult::reverted(format!("0x{op}"), fee.clone()))
            }
            Some(Scripted::Fail(message)) => Err(AdapterError::submission(*message)),
            Some(Scripted::NotApplicable(reason)) => Err(AdapterError::not_applicable(*reason)),
            None => Err(AdapterError::NotImplemented),
        }
    }
}

#[async_trait]
impl ChainAdapter for MockAdapter {
    fn chain(&self) -> ChainId {
        self.chain
    }

    async fn is_healthy(&self) -> bool {
        self.healthy
    }

    async fn create_fungible_token(&self) -> OpResult {
        self.respond(OperationId::CreateFungibleToken)
    }

    async fn mint_fungible_token(&self) -> OpResult {
        self.respond(OperationId::MintFungibleToken)
    }

    async fn transfer_fungible_token(&self) -> OpResult {
        self.respond(OperationId::TransferFungibleToken)
    }

    async fn create_nft(&self) -> OpResult {
        self.respond(OperationId::CreateNft)
    }

    async fn mint_nft(&self) -> OpResult {
        self.respond(OperationId::MintNft)
    }

    async fn transfer_nft(&self) -> OpResult {
        self.respond(OperationId::TransferNft)
    }

    async fn submit_message(&self) -> OpResult {
        self.respond(OperationId::SubmitMessage)
    }

    async fn create_token_contract(&self) -> OpResult {
        self.respond(OperationId::CreateTokenContract)
    }

    async fn mint_token_contract(&self) -> OpResult {
        self.respond(OperationId::MintTokenContract)
    }

    async fn transfer_token_contract(&self) -> OpResult {
        self.respond(OperationId::TransferTokenContract)
    }
}

/// Price source returning the same quote for every asset.
pub struct FixedPrice(pub &'static str);

#[async_trait]
impl PriceSource for FixedPrice {
    async fn usd_price(&self, _asset: &str) -> Result<BigDecimal, PriceError> {
        Ok(BigDecimal::from_str(self.0).unwrap())
    }
}

/// Price source that always fails.
pub struct NoPrice;

#[async_trait]
impl PriceSource for NoPrice {
    async fn usd_price(&self, asset: &str) -> Result<BigDecimal, PriceError> {
        Err(PriceError::fetch_failed(asset, "oracle offline"))
    }
}

/// Normalizer over a fresh cache wrapping the given source.
pub fn normalizer(source: impl PriceSource + 'static) -> CostNormalizer {
    CostNormalizer::new(Arc::new(PriceCache::new(Box::new(source))))
}

/// Route dispatcher and orchestrator logs through the test harness, filtered
/// by `RUST_LOG`. Safe to call from every test; only the first installs the
/// subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
