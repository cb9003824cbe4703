//! Top-level run coordination.
//!
//! A run health-gates the requested chains, executes the requested
//! operations on every healthy chain, and flattens the per-chain outcomes
//! into one deterministic collection: chains in request order, operations in
//! request order within each chain. Chains run concurrently with each other,
//! but a chain's operations run strictly in sequence, because later
//! operations consume artifacts created by earlier ones.

use std::sync::Arc;

use futures::future::join_all;

use crate::adapters::{adapter_for, ChainAdapter};
use crate::config::BenchConfig;
use crate::dispatch::OperationDispatcher;
use crate::errors::RunError;
use crate::normalize::CostNormalizer;
use crate::price::{CoinGeckoSource, PriceCache};
use crate::types::{ChainId, OperationId, OperationResult};

/// Coordinates one benchmark pass across a set of chains.
pub struct Orchestrator {
    adapters: Vec<Box<dyn ChainAdapter>>,
    dispatcher: OperationDispatcher,
}

impl Orchestrator {
    /// Assemble an orchestrator from pre-built adapters. The test seam: any
    /// [`ChainAdapter`] implementation plugs in here.
    pub fn new(adapters: Vec<Box<dyn ChainAdapter>>, normalizer: CostNormalizer) -> Self {
        Self {
            adapters,
            dispatcher: OperationDispatcher::new(normalizer),
        }
    }

    /// Build adapters and the price pipeline for the requested chains.
    ///
    /// Fails fast if any adapter cannot be constructed: a run that silently
    /// dropped a misconfigured chain would produce a lopsided comparison.
    pub fn from_config(config: &BenchConfig, chains: &[ChainId]) -> Result<Self, RunError> {
        if chains.is_empty() {
            return Err(RunError::invalid_request("no chains requested"));
        }
        let adapters = chains
            .iter()
            .map(|&chain| adapter_for(chain, config))
            .collect::<Result<Vec<_>, _>>()?;
        let source = CoinGeckoSource::new(&config.price_api_url, config.rpc_timeout);
        let prices = Arc::new(PriceCache::new(Box::new(source)));
        Ok(Self::new(adapters, CostNormalizer::new(prices)))
    }

    /// Execute `operations` on every healthy chain.
    ///
    /// Unhealthy chains are skipped entirely and contribute zero rows; if
    /// every chain fails its health check the run aborts with
    /// [`RunError::NoHealthyChains`]. Output ordering is deterministic
    /// regardless of which chain finishes first.
    pub async fn run(&self, operations: &[OperationId]) -> Result<Vec<OperationResult>, RunError> {
        if operations.is_empty() {
            return Err(RunError::invalid_request("no operations requested"));
        }

        let probes = self.adapters.iter().map(|adapter| async {
            let healthy = adapter.is_healthy().await;
            if !healthy {
                tracing::warn!(chain = %adapter.chain(), "chain failed health check, skipping");
            }
            healthy
        });
        let health = join_all(probes).await;

        let healthy: Vec<&dyn ChainAdapter> = self
            .adapters
            .iter()
            .zip(&health)
            .filter(|(_, healthy)| **healthy)
            .map(|(adapter, _)| adapter.as_ref())
            .collect();
        if healthy.is_empty() {
            return Err(RunError::NoHealthyChains);
        }
        tracing::info!(
            requested = self.adapters.len(),
            healthy = healthy.len(),
            operations = operations.len(),
            "starting benchmark pass"
        );

        let passes = healthy.iter().map(|&adapter| async move {
            let mut rows = Vec::with_capacity(operations.len());
            for &op in operations {
                rows.push(self.dispatcher.execute(adapter, op).await);
            }
            rows
        });
        let per_chain = join_all(passes).await;

        Ok(per_chain.into_iter().flatten().collect())
    }
}
