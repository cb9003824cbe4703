//! Adapter for the XRP Ledger testnet, via rippled's JSON-RPC API.
//!
//! XRPL has no general-purpose contracts; the operation vocabulary maps onto
//! native ledger primitives instead. "Creating" a fungible token is enabling
//! the issuer's default-ripple flag, minting and transferring are issued
//! currency payments, and NFTs use the XLS-20 `NFToken*` transaction types.
//! There is no NFT collection primitive and no contract deployment at all, so
//! those operations report not-applicable.
//!
//! Fees come back as the `Fee` field of the validated transaction, an integer
//! number of drops.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::config::{BenchConfig, XrplCredentials};
use crate::errors::AdapterError;
use crate::lock::AccountLock;
use crate::types::{ChainId, RawFee, RawOperationResult};

use super::{ChainAdapter, OpResult};

/// Issued-currency code used by the fungible-token operations.
const BENCH_CURRENCY: &str = "LBT";

/// A `tes` engine result is provisional; the minted NFT may take a ledger
/// close or two to become queryable. Bounded polling of the account's NFT
/// page, not resubmission.
const NFT_POLL_ATTEMPTS: u32 = 5;
const NFT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Per-pass conversational state. The recipient account is created lazily on
/// the first operation that needs a counterparty and reused afterwards, since
/// funding a fresh account costs the base reserve each time.
#[derive(Debug, Default)]
struct XrplSession {
    recipient: Option<XrplCredentials>,
    trust_line_ready: bool,
}

/// Chain adapter for the XRP Ledger.
#[derive(Debug)]
pub struct XrplAdapter {
    chain: ChainId,
    http: reqwest::Client,
    url: String,
    issuer: XrplCredentials,
    lock: AccountLock,
    session: Mutex<XrplSession>,
}

impl XrplAdapter {
    pub fn new(chain: ChainId, config: &BenchConfig) -> Result<Self, AdapterError> {
        let issuer = config.xrpl.clone().ok_or_else(|| {
            AdapterError::misconfigured(format!("no XRPL issuer credentials configured for {chain}"))
        })?;
        let http = reqwest::Client::builder()
            .timeout(config.rpc_timeout)
            .build()
            .unwrap_or_default();
        Ok(Self {
            chain,
            http,
            url: config.rpc_url(chain),
            issuer,
            lock: AccountLock::new(),
            session: Mutex::new(XrplSession::default()),
        })
    }

    /// One rippled JSON-RPC call. rippled wraps results in
    /// `{"result": {...}}` and reports request-level failures as
    /// `result.status == "error"`.
    async fn rpc(&self, method: &str, params: Value) -> Result<Value, AdapterError> {
        let body = json!({ "method": method, "params": [params] });
        let response: Value = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(AdapterError::rpc)?
            .json()
            .await?;
        let result = response
            .get("result")
            .cloned()
            .ok_or_else(|| AdapterError::unexpected(format!("{method}: response without result")))?;
        if result.get("status").and_then(Value::as_str) == Some("error") {
            let message = result
                .get("error_message")
                .or_else(|| result.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(AdapterError::rpc(format!("{method}: {message}")));
        }
        Ok(result)
    }

    /// Sign and submit one transaction from `account`, then read back the
    /// engine result and charged fee.
    ///
    /// rippled's server-side signing fills sequence and fee; submissions from
    /// the same account still race on sequence numbers, so callers hold the
    /// account lock.
    async fn sign_and_submit(
        &self,
        account: &XrplCredentials,
        mut tx_json: Value,
    ) -> Result<RawOperationResult, AdapterError> {
        tx_json["Account"] = json!(account.address);
        let result = self
            .rpc(
                "submit",
                json!({
                    "secret": account.secret,
                    "tx_json": tx_json,
                    "fail_hard": true,
                }),
            )
            .await?;

        let engine = result
            .get("engine_result")
            .and_then(Value::as_str)
            .ok_or_else(|| AdapterError::unexpected("submit response without engine result"))?;
        let tx_hash = result
            .pointer("/tx_json/hash")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let drops: u128 = result
            .pointer("/tx_json/Fee")
            .and_then(Value::as_str)
            .and_then(|fee| fee.parse().ok())
            .ok_or_else(|| AdapterError::unexpected("submit response without fee"))?;
        let fee = RawFee::SmallestUnit(drops);

        // `tes*` applied successfully; `tec*` failed but was included in a
        // ledger and charged its fee. Anything else never consumed a fee and
        // is a submission error, not a measured failure.
        if engine.starts_with("tes") {
            tracing::debug!(%engine, %tx_hash, "transaction applied");
            Ok(RawOperationResult::ok(tx_hash, fee))
        } else if engine.starts_with("tec") {
            tracing::warn!(%engine, %tx_hash, "transaction charged but failed");
            Ok(RawOperationResult::reverted(tx_hash, fee))
        } else {
            Err(AdapterError::submission(format!(
                "transaction rejected with {engine}"
            )))
        }
    }

    /// The counterparty account, created and funded on first use.
    ///
    /// Issued-currency payments need a recipient holding a trust line toward
    /// the issuer, so setup is: propose a wallet, fund it past the base
    /// reserve, then set the trust line from the new account. Setup costs are
    /// deliberately not attributed to any operation row.
    async fn recipient(&self) -> Result<XrplCredentials, AdapterError> {
        let mut session = self.session.lock().await;
        if let Some(recipient) = &session.recipient {
            if session.trust_line_ready {
                return Ok(recipient.clone());
            }
        }

        let proposed = self.rpc("wallet_propose", json!({})).await?;
        let recipient = XrplCredentials {
            address: proposed
                .get("account_id")
                .and_then(Value::as_str)
                .ok_or_else(|| AdapterError::unexpected("wallet_propose without account_id"))?
                .to_owned(),
            secret: proposed
                .get("master_seed")
                .and_then(Value::as_str)
                .ok_or_else(|| AdapterError::unexpected("wallet_propose without master_seed"))?
                .to_owned(),
        };

        // Fund the new account past the base reserve (20 XRP in drops).
        self.lock
            .with_exclusive_access(self.sign_and_submit(
                &self.issuer,
                json!({
                    "TransactionType": "Payment",
                    "Destination": recipient.address,
                    "Amount": "20000000",
                }),
            ))
            .await?;

        // Trust line from the recipient toward the issuer, so issued-currency
        // payments can land. Signed by the recipient; no issuer lock needed.
        self.sign_and_submit(
            &recipient,
            json!({
                "TransactionType": "TrustSet",
                "LimitAmount": {
                    "currency": BENCH_CURRENCY,
                    "issuer": self.issuer.address,
                    "value": "1000000",
                },
            }),
        )
        .await?;

        session.recipient = Some(recipient.clone());
        session.trust_line_ready = true;
        Ok(recipient)
    }

    async fn submit_from_issuer(&self, tx_json: Value) -> OpResult {
        self.lock
            .with_exclusive_access(self.sign_and_submit(&self.issuer, tx_json))
            .await
    }

    /// The most recently minted NFT on the issuer account, for the transfer
    /// operation. Reads the current (open) ledger so a provisionally applied
    /// mint is visible, and polls briefly across ledger closes.
    async fn latest_nft_id(&self) -> Result<String, AdapterError> {
        for attempt in 0..NFT_POLL_ATTEMPTS {
            let result = self
                .rpc(
                    "account_nfts",
                    json!({ "account": self.issuer.address, "ledger_index": "current" }),
                )
                .await?;
            if let Some(id) = newest_nft_id(&result) {
                return Ok(id);
            }
            tracing::debug!(attempt, "minted NFT not visible in the account page yet");
            tokio::time::sleep(NFT_POLL_INTERVAL).await;
        }
        Err(AdapterError::misconfigured(
            "no NFT minted in this pass; run mint-nft first",
        ))
    }
}

/// Newest entry of an `account_nfts` response, if the page has any.
fn newest_nft_id(result: &Value) -> Option<String> {
    result
        .get("account_nfts")?
        .as_array()?
        .last()?
        .get("NFTokenID")?
        .as_str()
        .map(str::to_owned)
}

#[async_trait]
impl ChainAdapter for XrplAdapter {
    fn chain(&self) -> ChainId {
        self.chain
    }

    async fn is_healthy(&self) -> bool {
        match self.rpc("server_info", json!({})).await {
            Ok(info) => {
                let state = info
                    .pointer("/info/server_state")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                tracing::debug!(state, "health probe ok");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "health probe failed");
                false
            }
        }
    }

    /// Enable issuing on the account (default-ripple flag). XRPL has no
    /// token-creation transaction; this flag flip is the closest equivalent
    /// and is what actually gates issued-currency payments.
    async fn create_fungible_token(&self) -> OpResult {
        self.submit_from_issuer(json!({
            "TransactionType": "AccountSet",
            "SetFlag": 8,
        }))
        .await
    }

    /// Issue currency to the recipient. On XRPL, issuance *is* a payment of
    /// the issued currency from the issuer.
    async fn mint_fungible_token(&self) -> OpResult {
        let recipient = self.recipient().await?;
        self.submit_from_issuer(json!({
            "TransactionType": "Payment",
            "Destination": recipient.address,
            "Amount": {
                "currency": BENCH_CURRENCY,
                "issuer": self.issuer.address,
                "value": "1000",
            },
        }))
        .await
    }

    async fn transfer_fungible_token(&self) -> OpResult {
        let recipient = self.recipient().await?;
        self.submit_from_issuer(json!({
            "TransactionType": "Payment",
            "Destination": recipient.address,
            "Amount": {
                "currency": BENCH_CURRENCY,
                "issuer": self.issuer.address,
                "value": "1",
            },
        }))
        .await
    }

    async fn create_nft(&self) -> OpResult {
        Err(AdapterError::not_applicable(
            "XRPL has no NFT collection primitive; NFTs are minted directly on the account",
        ))
    }

    async fn mint_nft(&self) -> OpResult {
        self.submit_from_issuer(json!({
            "TransactionType": "NFTokenMint",
            "NFTokenTaxon": 0,
            // Transferable flag, so the transfer operation can move it.
            "Flags": 8,
            "URI": "6C656467657262656E6368",
        }))
        .await
    }

    /// XRPL transfers NFTs through an offer the counterparty accepts; the
    /// metered transaction is the sell offer at zero price, the primitive
    /// closest to a direct transfer.
    async fn transfer_nft(&self) -> OpResult {
        let nft_id = self.latest_nft_id().await?;
        let recipient = self.recipient().await?;
        self.submit_from_issuer(json!({
            "TransactionType": "NFTokenCreateOffer",
            "NFTokenID": nft_id,
            "Amount": "0",
            "Flags": 1,
            "Destination": recipient.address,
        }))
        .await
    }

    /// One-drop payment carrying a memo: XRPL's idiom for anchoring a message
    /// on the ledger.
    async fn submit_message(&self) -> OpResult {
        let recipient = self.recipient().await?;
        self.submit_from_issuer(json!({
            "TransactionType": "Payment",
            "Destination": recipient.address,
            "Amount": "1",
            "Memos": [{
                "Memo": { "MemoData": "6C656467657262656E6368206D657373616765" }
            }],
        }))
        .await
    }

    async fn create_token_contract(&self) -> OpResult {
        Err(AdapterError::not_applicable(
            "XRPL has no smart contracts; tokens are a native ledger primitive",
        ))
    }

    async fn mint_token_contract(&self) -> OpResult {
        Err(AdapterError::not_applicable(
            "XRPL has no smart contracts; tokens are a native ledger primitive",
        ))
    }

    async fn transfer_token_contract(&self) -> OpResult {
        Err(AdapterError::not_applicable(
            "XRPL has no smart contracts; tokens are a native ledger primitive",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> BenchConfig {
        BenchConfig::builder()
            .xrpl_credentials("rIssuerIssuerIssuerIssuerIss", "shhSecretSecretSecretSecret")
            .build()
    }

    #[test]
    fn construction_requires_issuer_credentials() {
        let err = XrplAdapter::new(ChainId::XrplTestnet, &BenchConfig::default()).unwrap_err();
        assert!(matches!(err, AdapterError::Misconfigured { .. }));
    }

    #[test]
    fn construction_succeeds_with_credentials() {
        let adapter = XrplAdapter::new(ChainId::XrplTestnet, &configured()).unwrap();
        assert_eq!(adapter.chain(), ChainId::XrplTestnet);
    }

    #[test]
    fn newest_nft_id_takes_the_most_recent_entry() {
        let page = json!({
            "account_nfts": [
                { "NFTokenID": "000800006203F49C21D5D6E022CB16DE3538F248662FC73C00000001" },
                { "NFTokenID": "000800006203F49C21D5D6E022CB16DE3538F248662FC73C00000002" },
            ]
        });
        assert_eq!(
            newest_nft_id(&page).as_deref(),
            Some("000800006203F49C21D5D6E022CB16DE3538F248662FC73C00000002")
        );
        assert_eq!(newest_nft_id(&json!({ "account_nfts": [] })), None);
        assert_eq!(newest_nft_id(&json!({})), None);
    }

    #[tokio::test]
    async fn contract_operations_are_not_applicable() {
        let adapter = XrplAdapter::new(ChainId::XrplTestnet, &configured()).unwrap();
        for result in [
            adapter.create_nft().await,
            adapter.create_token_contract().await,
            adapter.mint_token_contract().await,
            adapter.transfer_token_contract().await,
        ] {
            assert!(matches!(result, Err(AdapterError::NotApplicable { .. })));
        }
    }
}
