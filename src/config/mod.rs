//! Run configuration.
//!
//! [`BenchConfig`] carries everything the adapters and the price oracle need
//! that is not part of the immutable chain registry: endpoint overrides,
//! operator credentials, contract artifacts, timeouts, and request pacing.
//! Populating it (from environment, files, or flags) is the caller's concern.
//!
//! # Example
//!
//! ```rust
//! use ledgerbench::{BenchConfig, ChainId};
//! use std::time::Duration;
//!
//! let config = BenchConfig::builder()
//!     .rpc_timeout(Duration::from_secs(20))
//!     .rpc_url(ChainId::EthereumSepolia, "http://localhost:8545")
//!     .build();
//! assert_eq!(config.rpc_url(ChainId::EthereumSepolia), "http://localhost:8545");
//! ```

use std::collections::HashMap;
use std::time::Duration;

use crate::types::ChainId;

/// Default public CoinGecko API base.
pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Credentials for the shared XRPL issuer account.
#[derive(Debug, Clone)]
pub struct XrplCredentials {
    /// Classic address of the funded issuer account.
    pub address: String,
    /// Secret used by the rippled sign-and-submit path. Testnet only.
    pub secret: String,
}

/// Configuration for a benchmark run.
///
/// Immutable once built; shared by reference across adapters.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Timeout applied to RPC requests and health probes.
    pub rpc_timeout: Duration,
    /// Optional request pacing for EVM-family providers, in requests per
    /// second. Public testnet endpoints tend to need this.
    pub rate_limit_per_second: Option<u32>,
    /// Per-chain RPC endpoint overrides.
    endpoint_overrides: HashMap<ChainId, String>,
    /// Hex-encoded private key for the shared EVM-family operator account.
    pub evm_private_key: Option<String>,
    /// Creation bytecode (hex) for the fungible-token artifact. When absent,
    /// adapters deploy a built-in minimal measurement contract.
    pub token_bytecode: Option<String>,
    /// Creation bytecode (hex) for the NFT artifact.
    pub nft_bytecode: Option<String>,
    /// Shared XRPL issuer credentials.
    pub xrpl: Option<XrplCredentials>,
    /// Price oracle API base URL.
    pub price_api_url: String,
}

impl BenchConfig {
    pub fn builder() -> BenchConfigBuilder {
        BenchConfigBuilder::default()
    }

    /// Effective RPC endpoint for a chain: the override if set, otherwise the
    /// registry default.
    pub fn rpc_url(&self, chain: ChainId) -> String {
        self.endpoint_overrides
            .get(&chain)
            .cloned()
            .unwrap_or_else(|| chain.config().rpc_url.to_owned())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfigBuilder::default().build()
    }
}

/// Fluent builder for [`BenchConfig`].
#[derive(Debug, Default)]
pub struct BenchConfigBuilder {
    rpc_timeout: Option<Duration>,
    rate_limit_per_second: Option<u32>,
    endpoint_overrides: HashMap<ChainId, String>,
    evm_private_key: Option<String>,
    token_bytecode: Option<String>,
    nft_bytecode: Option<String>,
    xrpl: Option<XrplCredentials>,
    price_api_url: Option<String>,
}

impl BenchConfigBuilder {
    /// Timeout for RPC requests and health probes. Default: 30 seconds.
    #[must_use]
    pub fn rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = Some(timeout);
        self
    }

    /// Pace EVM-family RPC requests to at most this many per second.
    #[must_use]
    pub fn rate_limit_per_second(mut self, requests: u32) -> Self {
        self.rate_limit_per_second = Some(requests);
        self
    }

    /// Override the RPC endpoint for one chain.
    #[must_use]
    pub fn rpc_url(mut self, chain: ChainId, url: impl Into<String>) -> Self {
        self.endpoint_overrides.insert(chain, url.into());
        self
    }

    /// Hex-encoded operator private key shared by all EVM-family chains.
    #[must_use]
    pub fn evm_private_key(mut self, key: impl Into<String>) -> Self {
        self.evm_private_key = Some(key.into());
        self
    }

    /// Creation bytecode (hex) of the fungible-token contract artifact.
    #[must_use]
    pub fn token_bytecode(mut self, hex: impl Into<String>) -> Self {
        self.token_bytecode = Some(hex.into());
        self
    }

    /// Creation bytecode (hex) of the NFT contract artifact.
    #[must_use]
    pub fn nft_bytecode(mut self, hex: impl Into<String>) -> Self {
        self.nft_bytecode = Some(hex.into());
        self
    }

    /// Shared XRPL issuer credentials.
    #[must_use]
    pub fn xrpl_credentials(mut self, address: impl Into<String>, secret: impl Into<String>) -> Self {
        self.xrpl = Some(XrplCredentials {
            address: address.into(),
            secret: secret.into(),
        });
        self
    }

    /// Price oracle API base URL. Default: the public CoinGecko API.
    #[must_use]
    pub fn price_api_url(mut self, url: impl Into<String>) -> Self {
        self.price_api_url = Some(url.into());
        self
    }

    pub fn build(self) -> BenchConfig {
        BenchConfig {
            rpc_timeout: self.rpc_timeout.unwrap_or(Duration::from_secs(30)),
            rate_limit_per_second: self.rate_limit_per_second,
            endpoint_overrides: self.endpoint_overrides,
            evm_private_key: self.evm_private_key,
            token_bytecode: self.token_bytecode,
            nft_bytecode: self.nft_bytecode,
            xrpl: self.xrpl,
            price_api_url: self
                .price_api_url
                .unwrap_or_else(|| DEFAULT_PRICE_API_URL.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = BenchConfig::default();
        assert_eq!(config.rpc_timeout, Duration::from_secs(30));
        assert_eq!(config.price_api_url, DEFAULT_PRICE_API_URL);
        assert!(config.rate_limit_per_second.is_none());
        assert_eq!(
            config.rpc_url(ChainId::XrplTestnet),
            ChainId::XrplTestnet.config().rpc_url
        );
    }

    #[test]
    fn endpoint_override_wins_over_registry_default() {
        let config = BenchConfig::builder()
            .rpc_url(ChainId::BaseSepolia, "http://localhost:8545")
            .build();
        assert_eq!(config.rpc_url(ChainId::BaseSepolia), "http://localhost:8545");
        // Other chains keep their defaults.
        assert_eq!(
            config.rpc_url(ChainId::PolygonAmoy),
            ChainId::PolygonAmoy.config().rpc_url
        );
    }

    #[test]
    fn builder_threads_credentials_through() {
        let config = BenchConfig::builder()
            .evm_private_key("0xdeadbeef")
            .xrpl_credentials("rIssuer", "sSecret")
            .build();
        assert_eq!(config.evm_private_key.as_deref(), Some("0xdeadbeef"));
        let xrpl = config.xrpl.unwrap();
        assert_eq!(xrpl.address, "rIssuer");
        assert_eq!(xrpl.secret, "sSecret");
    }
}
