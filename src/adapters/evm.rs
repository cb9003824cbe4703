//! Adapter for EVM-family chains (Ethereum, Polygon, OP-stack L2s).
//!
//! Token operations are raw transactions carrying ABI-encoded calldata; only
//! the receipt matters, so no return data is decoded. Fees come back in the
//! `Gas` shape (`gas_used * effective_gas_price`); on OP-stack chains the
//! receipt's L1 data fee is folded in as `additional_cost`.

use std::time::Duration;

use alloy_network::TransactionBuilder;
use alloy_network::EthereumWallet;
use alloy_primitives::{hex, Address, Bytes, B256, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_client::ClientBuilder;
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::BenchConfig;
use crate::errors::AdapterError;
use crate::lock::AccountLock;
use crate::transport::ThrottleLayer;
use crate::types::{ChainId, RawFee, RawOperationResult};

use super::{ChainAdapter, OpResult};

sol! {
    function mint(address to, uint256 amount);
    function transfer(address to, uint256 amount) returns (bool);
    function safeMint(address to, uint256 tokenId);
    function transferFrom(address from, address to, uint256 tokenId);
}

/// Creation bytecode of the built-in measurement contract, used when no
/// artifact is configured. Deploys a 5-byte runtime that accepts any call
/// and returns empty, so mint/transfer calldata never reverts.
const MEASUREMENT_CONTRACT: &str = "6005600c60003960056000f360006000f3";

/// Sink address for transfer operations. Transfers create fresh value flows
/// per invocation; the recipient's identity does not affect the metered cost.
pub(crate) const TRANSFER_SINK: Address = Address::repeat_byte(0xbe);

/// Per-pass conversational state: artifacts deployed by earlier operations
/// in the same run.
#[derive(Debug, Default)]
struct EvmSession {
    token: Option<Address>,
    nft: Option<Address>,
    next_token_id: u64,
}

/// Shared EVM submission machinery: a wallet-filled provider plus the
/// account lock serializing every submission from the operator key.
///
/// Also used by the Hedera adapter, which submits through an EVM-compatible
/// JSON-RPC relay and only differs in fee extraction.
#[derive(Debug)]
pub(crate) struct EvmClient {
    provider: DynProvider,
    operator: Address,
    lock: AccountLock,
    timeout: Duration,
}

impl EvmClient {
    pub(crate) fn new(chain: ChainId, config: &BenchConfig) -> Result<Self, AdapterError> {
        let key = config.evm_private_key.as_deref().ok_or_else(|| {
            AdapterError::misconfigured(format!("no EVM operator key configured for {chain}"))
        })?;
        let signer: PrivateKeySigner = key
            .parse()
            .map_err(|e| AdapterError::misconfigured(format!("invalid operator key: {e}")))?;
        let operator = signer.address();
        let wallet = EthereumWallet::from(signer);

        let url: url::Url = config
            .rpc_url(chain)
            .parse()
            .map_err(|e| AdapterError::misconfigured(format!("invalid RPC url: {e}")))?;

        let provider = match config.rate_limit_per_second {
            Some(rps) => {
                let client = ClientBuilder::default()
                    .layer(ThrottleLayer::per_second(rps))
                    .http(url);
                ProviderBuilder::new()
                    .wallet(wallet)
                    .connect_client(client)
                    .erased()
            }
            None => ProviderBuilder::new()
                .wallet(wallet)
                .connect_http(url)
                .erased(),
        };

        Ok(Self {
            provider,
            operator,
            lock: AccountLock::new(),
            timeout: config.rpc_timeout,
        })
    }

    pub(crate) fn operator(&self) -> Address {
        self.operator
    }

    pub(crate) async fn healthy(&self) -> bool {
        match tokio::time::timeout(self.timeout, self.provider.get_block_number()).await {
            Ok(Ok(block)) => {
                tracing::debug!(block, "health probe ok");
                true
            }
            Ok(Err(err)) => {
                tracing::warn!(%err, "health probe failed");
                false
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "health probe timed out");
                false
            }
        }
    }

    /// Sign, submit, and confirm one transaction. Serialized on the account
    /// lock: the operator key owns a single nonce sequence, and two in-flight
    /// submissions would race on it.
    pub(crate) async fn submit(
        &self,
        tx: TransactionRequest,
    ) -> Result<TransactionReceipt, AdapterError> {
        self.lock
            .with_exclusive_access(async {
                let pending = self
                    .provider
                    .send_transaction(tx)
                    .await
                    .map_err(AdapterError::rpc)?;
                let tx_hash = *pending.tx_hash();
                tracing::debug!(%tx_hash, "submitted, awaiting receipt");
                pending
                    .with_timeout(Some(self.timeout))
                    .get_receipt()
                    .await
                    .map_err(AdapterError::rpc)
            })
            .await
    }

    /// L1 data-availability fee from the raw receipt JSON, for OP-stack
    /// chains. The typed Ethereum receipt does not carry the field.
    pub(crate) async fn l1_data_fee(&self, tx_hash: B256) -> Result<u128, AdapterError> {
        let raw: serde_json::Value = self
            .provider
            .raw_request("eth_getTransactionReceipt".into(), (tx_hash,))
            .await
            .map_err(AdapterError::rpc)?;
        match raw.get("l1Fee").and_then(|fee| fee.as_str()) {
            Some(fee) => u128::from_str_radix(fee.trim_start_matches("0x"), 16)
                .map_err(|e| AdapterError::unexpected(format!("bad l1Fee field: {e}"))),
            None => Ok(0),
        }
    }
}

/// Chain adapter for EVM-family ledgers.
#[derive(Debug)]
pub struct EvmAdapter {
    chain: ChainId,
    client: EvmClient,
    token_code: Bytes,
    nft_code: Bytes,
    session: Mutex<EvmSession>,
}

impl EvmAdapter {
    pub fn new(chain: ChainId, config: &BenchConfig) -> Result<Self, AdapterError> {
        Ok(Self {
            chain,
            client: EvmClient::new(chain, config)?,
            token_code: decode_artifact(config.token_bytecode.as_deref())?,
            nft_code: decode_artifact(config.nft_bytecode.as_deref())?,
            session: Mutex::new(EvmSession::default()),
        })
    }

    /// Turn a confirmed receipt into a raw result, including the OP-stack
    /// L1 surcharge where the chain has one.
    async fn raw_result(&self, receipt: &TransactionReceipt) -> OpResult {
        let additional_cost = if self.chain.config().op_stack {
            self.client.l1_data_fee(receipt.transaction_hash).await?
        } else {
            0
        };
        let fee = RawFee::Gas {
            gas_used: u128::from(receipt.gas_used),
            gas_price: receipt.effective_gas_price,
            additional_cost,
        };
        let tx_hash = format!("{:#x}", receipt.transaction_hash);
        Ok(if receipt.status() {
            RawOperationResult::ok(tx_hash, fee)
        } else {
            RawOperationResult::reverted(tx_hash, fee)
        })
    }

    async fn deploy(&self, code: Bytes) -> Result<(TransactionReceipt, Address), AdapterError> {
        let tx = TransactionRequest::default().with_deploy_code(code);
        let receipt = self.client.submit(tx).await?;
        let address = receipt
            .contract_address
            .ok_or_else(|| AdapterError::unexpected("deployment receipt without address"))?;
        Ok((receipt, address))
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<TransactionReceipt, AdapterError> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(Bytes::from(data));
        self.client.submit(tx).await
    }

    async fn deployed_token(&self) -> Result<Address, AdapterError> {
        self.session.lock().await.token.ok_or_else(|| {
            AdapterError::misconfigured(
                "no fungible token deployed in this pass; run create-fungible-token first",
            )
        })
    }

    async fn deployed_nft(&self) -> Result<Address, AdapterError> {
        self.session.lock().await.nft.ok_or_else(|| {
            AdapterError::misconfigured("no NFT contract deployed in this pass; run create-nft first")
        })
    }

    async fn last_minted_token_id(&self) -> Result<u64, AdapterError> {
        self.session
            .lock()
            .await
            .next_token_id
            .checked_sub(1)
            .ok_or_else(|| {
                AdapterError::misconfigured("no NFT minted in this pass; run mint-nft first")
            })
    }
}

#[async_trait]
impl ChainAdapter for EvmAdapter {
    fn chain(&self) -> ChainId {
        self.chain
    }

    async fn is_healthy(&self) -> bool {
        self.client.healthy().await
    }

    async fn create_fungible_token(&self) -> OpResult {
        let (receipt, address) = self.deploy(self.token_code.clone()).await?;
        self.session.lock().await.token = Some(address);
        tracing::info!(chain = %self.chain, %address, "deployed fungible token");
        self.raw_result(&receipt).await
    }

    async fn mint_fungible_token(&self) -> OpResult {
        let token = self.deployed_token().await?;
        let data = mintCall {
            to: self.client.operator(),
            amount: U256::from(1_000u64),
        }
        .abi_encode();
        let receipt = self.call(token, data).await?;
        self.raw_result(&receipt).await
    }

    async fn transfer_fungible_token(&self) -> OpResult {
        let token = self.deployed_token().await?;
        let data = transferCall {
            to: TRANSFER_SINK,
            amount: U256::from(1u64),
        }
        .abi_encode();
        let receipt = self.call(token, data).await?;
        self.raw_result(&receipt).await
    }

    async fn create_nft(&self) -> OpResult {
        let (receipt, address) = self.deploy(self.nft_code.clone()).await?;
        self.session.lock().await.nft = Some(address);
        tracing::info!(chain = %self.chain, %address, "deployed NFT contract");
        self.raw_result(&receipt).await
    }

    async fn mint_nft(&self) -> OpResult {
        let nft = self.deployed_nft().await?;
        let token_id = {
            let mut session = self.session.lock().await;
            let id = session.next_token_id;
            session.next_token_id += 1;
            id
        };
        let data = safeMintCall {
            to: self.client.operator(),
            tokenId: U256::from(token_id),
        }
        .abi_encode();
        let receipt = self.call(nft, data).await?;
        self.raw_result(&receipt).await
    }

    async fn transfer_nft(&self) -> OpResult {
        let nft = self.deployed_nft().await?;
        let token_id = self.last_minted_token_id().await?;
        let data = transferFromCall {
            from: self.client.operator(),
            to: TRANSFER_SINK,
            tokenId: U256::from(token_id),
        }
        .abi_encode();
        let receipt = self.call(nft, data).await?;
        self.raw_result(&receipt).await
    }

    async fn submit_message(&self) -> OpResult {
        // Calldata-bearing transfer to self: the closest EVM equivalent of a
        // message-submission primitive.
        let tx = TransactionRequest::default()
            .with_to(self.client.operator())
            .with_input(Bytes::from_static(b"ledgerbench message"));
        let receipt = self.client.submit(tx).await?;
        self.raw_result(&receipt).await
    }

    // On EVM chains tokens *are* contracts, so the contract-variant
    // operations measure the same path as the native ones.

    async fn create_token_contract(&self) -> OpResult {
        self.create_fungible_token().await
    }

    async fn mint_token_contract(&self) -> OpResult {
        self.mint_fungible_token().await
    }

    async fn transfer_token_contract(&self) -> OpResult {
        self.transfer_fungible_token().await
    }
}

/// Decode a hex artifact from config, falling back to the built-in
/// measurement contract.
pub(crate) fn decode_artifact(hex_code: Option<&str>) -> Result<Bytes, AdapterError> {
    let code = hex_code.unwrap_or(MEASUREMENT_CONTRACT);
    hex::decode(code.trim_start_matches("0x"))
        .map(Bytes::from)
        .map_err(|e| AdapterError::misconfigured(format!("invalid artifact bytecode: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_artifact_decodes() {
        let code = decode_artifact(None).unwrap();
        assert_eq!(code.len(), 17);
        // Initcode returns the 5-byte runtime at offset 12.
        assert_eq!(&code[12..], &[0x60, 0x00, 0x60, 0x00, 0xf3]);
    }

    #[test]
    fn configured_artifact_wins() {
        let code = decode_artifact(Some("0x6001")).unwrap();
        assert_eq!(code.as_ref(), &[0x60, 0x01]);
    }

    #[test]
    fn garbage_artifact_is_a_config_error() {
        let err = decode_artifact(Some("not-hex")).unwrap_err();
        assert!(matches!(err, AdapterError::Misconfigured { .. }));
    }

    #[test]
    fn missing_operator_key_fails_construction() {
        let config = BenchConfig::default();
        let err = EvmAdapter::new(ChainId::EthereumSepolia, &config).unwrap_err();
        assert!(matches!(err, AdapterError::Misconfigured { .. }));
    }

    #[test]
    fn construction_succeeds_with_a_key() {
        let config = BenchConfig::builder()
            .evm_private_key("0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d")
            .build();
        let adapter = EvmAdapter::new(ChainId::OptimismSepolia, &config).unwrap();
        assert_eq!(adapter.chain(), ChainId::OptimismSepolia);
    }

    fn adapter() -> EvmAdapter {
        let config = BenchConfig::builder()
            .evm_private_key("0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d")
            .build();
        EvmAdapter::new(ChainId::EthereumSepolia, &config).unwrap()
    }

    #[tokio::test]
    async fn nft_transfer_requires_a_prior_mint() {
        let adapter = adapter();
        let err = adapter.last_minted_token_id().await.unwrap_err();
        assert!(matches!(err, AdapterError::Misconfigured { .. }));
    }

    #[tokio::test]
    async fn nft_transfer_targets_the_most_recent_mint() {
        let adapter = adapter();
        adapter.session.lock().await.next_token_id = 3;
        assert_eq!(adapter.last_minted_token_id().await.unwrap(), 2);
    }
}
