//! Cross-ledger transaction cost benchmarking.
//!
//! `ledgerbench` executes equivalent operations (token creation, minting,
//! transfers, message submission) against several live ledgers with
//! incompatible fee models, captures the raw fee each ledger charged, and
//! normalizes everything into exact native-unit and USD cost figures so the
//! results can be compared side by side.
//!
//! # Architecture
//!
//! - [`ChainAdapter`] implementations translate the uniform operation
//!   vocabulary ([`OperationId`]) into one ledger family's native calls and
//!   return a [`RawOperationResult`].
//! - [`OperationDispatcher`] maps an operation onto the adapter method that
//!   implements it and isolates per-operation failures into result rows.
//! - [`CostNormalizer`] converts the heterogeneous fee shapes ([`RawFee`])
//!   into exact decimal costs using a per-run [`PriceCache`].
//! - [`Orchestrator`] health-gates the requested chains, runs them in
//!   parallel (operations strictly sequential within a chain), and produces
//!   one deterministic, ordered collection of [`OperationResult`] rows.
//!
//! # Example
//!
//! ```rust,ignore
//! use ledgerbench::{BenchConfig, ChainId, OperationId, Orchestrator};
//!
//! let config = BenchConfig::builder()
//!     .evm_private_key(operator_key)
//!     .build();
//! let orchestrator = Orchestrator::from_config(
//!     &config,
//!     &[ChainId::EthereumSepolia, ChainId::XrplTestnet],
//! )?;
//! let results = orchestrator
//!     .run(&[OperationId::CreateFungibleToken, OperationId::MintFungibleToken])
//!     .await?;
//! for row in &results {
//!     println!("{} {} -> {:?}", row.chain, row.operation, row.status);
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod lock;
pub mod normalize;
pub mod orchestrator;
pub mod price;
pub mod transport;
pub mod types;

pub use adapters::ChainAdapter;
pub use config::{BenchConfig, BenchConfigBuilder, XrplCredentials};
pub use dispatch::OperationDispatcher;
pub use errors::{AdapterError, LedgerbenchError, NormalizeError, PriceError, RunError};
pub use lock::AccountLock;
pub use normalize::{CostNormalizer, NormalizedCost};
pub use orchestrator::Orchestrator;
pub use price::{CoinGeckoSource, PriceCache, PriceSource};
pub use types::{
    ChainConfig, ChainId, NativeCurrency, NetworkKind, OperationId, OperationResult,
    OperationStatus, RawFee, RawOperationResult,
};
