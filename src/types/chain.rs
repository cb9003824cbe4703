//! Chain identifiers and per-chain static configuration.

use serde::Serialize;

/// Supported ledgers, one identifier per chain + network pair.
///
/// The set is closed and known at build time; every identifier maps to
/// exactly one [`ChainConfig`] via [`ChainId::config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainId {
    EthereumSepolia,
    OptimismSepolia,
    BaseSepolia,
    PolygonAmoy,
    HederaTestnet,
    XrplTestnet,
}

impl ChainId {
    /// Every supported chain, in registry order.
    pub const ALL: [ChainId; 6] = [
        ChainId::EthereumSepolia,
        ChainId::OptimismSepolia,
        ChainId::BaseSepolia,
        ChainId::PolygonAmoy,
        ChainId::HederaTestnet,
        ChainId::XrplTestnet,
    ];

    /// Stable string identifier, used in logs and result rows.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChainId::EthereumSepolia => "ethereum-sepolia",
            ChainId::OptimismSepolia => "optimism-sepolia",
            ChainId::BaseSepolia => "base-sepolia",
            ChainId::PolygonAmoy => "polygon-amoy",
            ChainId::HederaTestnet => "hedera-testnet",
            ChainId::XrplTestnet => "xrpl-testnet",
        }
    }

    /// The immutable configuration for this chain.
    pub fn config(&self) -> ChainConfig {
        match self {
            ChainId::EthereumSepolia => ChainConfig {
                chain: *self,
                network: NetworkKind::Test,
                currency: NativeCurrency::ETH,
                fee_decimals: 18,
                rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
                mirror_url: None,
                op_stack: false,
            },
            ChainId::OptimismSepolia => ChainConfig {
                chain: *self,
                network: NetworkKind::Test,
                currency: NativeCurrency::ETH,
                fee_decimals: 18,
                rpc_url: "https://sepolia.optimism.io",
                mirror_url: None,
                op_stack: true,
            },
            ChainId::BaseSepolia => ChainConfig {
                chain: *self,
                network: NetworkKind::Test,
                currency: NativeCurrency::ETH,
                fee_decimals: 18,
                rpc_url: "https://sepolia.base.org",
                mirror_url: None,
                op_stack: true,
            },
            ChainId::PolygonAmoy => ChainConfig {
                chain: *self,
                network: NetworkKind::Test,
                currency: NativeCurrency::POL,
                fee_decimals: 18,
                rpc_url: "https://rpc-amoy.polygon.technology",
                mirror_url: None,
                op_stack: false,
            },
            ChainId::HederaTestnet => ChainConfig {
                chain: *self,
                network: NetworkKind::Test,
                currency: NativeCurrency::HBAR,
                // The JSON-RPC relay reports fee fields in 18-decimal weibar
                // even though HBAR itself has 8 decimals.
                fee_decimals: 18,
                rpc_url: "https://testnet.hashio.io/api",
                mirror_url: Some("https://testnet.mirrornode.hedera.com"),
                op_stack: false,
            },
            ChainId::XrplTestnet => ChainConfig {
                chain: *self,
                network: NetworkKind::Test,
                currency: NativeCurrency::XRP,
                fee_decimals: 6,
                rpc_url: "https://s.altnet.rippletest.net:51234/",
                mirror_url: None,
                op_stack: false,
            },
        }
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which network tier a chain configuration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Main,
    Test,
    Preview,
}

/// A chain's native currency: display symbol, decimal precision, and the
/// price-oracle asset identifier used to fetch its USD quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCurrency {
    pub symbol: &'static str,
    pub decimals: u8,
    /// CoinGecko asset id. Chains sharing a native asset share this id, so
    /// the per-run price cache fetches the quote once for all of them.
    pub asset_id: &'static str,
}

impl NativeCurrency {
    pub const ETH: Self = Self {
        symbol: "ETH",
        decimals: 18,
        asset_id: "ethereum",
    };
    pub const POL: Self = Self {
        symbol: "POL",
        decimals: 18,
        asset_id: "polygon-ecosystem-token",
    };
    pub const HBAR: Self = Self {
        symbol: "HBAR",
        decimals: 8,
        asset_id: "hedera-hashgraph",
    };
    pub const XRP: Self = Self {
        symbol: "XRP",
        decimals: 6,
        asset_id: "ripple",
    };
}

/// Immutable per-chain configuration.
///
/// Loaded once from the static registry at startup and never mutated during
/// a run. Endpoint defaults can be overridden through
/// [`BenchConfig`](crate::config::BenchConfig).
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chain: ChainId,
    pub network: NetworkKind,
    pub currency: NativeCurrency,
    /// Decimal shift applied to smallest-unit fee fields. Usually equal to
    /// `currency.decimals`, but not always: Hedera's relay reports weibar.
    pub fee_decimals: u8,
    /// Default RPC/JSON-RPC endpoint.
    pub rpc_url: &'static str,
    /// REST mirror/indexer endpoint, for chains that report the charged fee
    /// out of band.
    pub mirror_url: Option<&'static str>,
    /// Whether receipts carry an L1 data-availability surcharge.
    pub op_stack: bool,
}
