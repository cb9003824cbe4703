//! The uniform operation vocabulary.

use std::str::FromStr;

use serde::Serialize;

/// A benchmarkable operation.
///
/// Identifiers are stable kebab-case strings used both as dispatch keys and
/// as report labels. The set is closed: adding an operation is a source
/// change, which keeps the dispatcher's `match` exhaustive at compile time.
///
/// The `*-token-contract` variants are the smart-contract (RPC) renditions of
/// the token operations, for chains that expose both a native token service
/// and an EVM-style contract path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationId {
    CreateFungibleToken,
    MintFungibleToken,
    TransferFungibleToken,
    CreateNft,
    MintNft,
    TransferNft,
    SubmitMessage,
    CreateTokenContract,
    MintTokenContract,
    TransferTokenContract,
}

impl OperationId {
    /// Every operation, in canonical report order.
    pub const ALL: [OperationId; 10] = [
        OperationId::CreateFungibleToken,
        OperationId::MintFungibleToken,
        OperationId::TransferFungibleToken,
        OperationId::CreateNft,
        OperationId::MintNft,
        OperationId::TransferNft,
        OperationId::SubmitMessage,
        OperationId::CreateTokenContract,
        OperationId::MintTokenContract,
        OperationId::TransferTokenContract,
    ];

    /// Stable string identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OperationId::CreateFungibleToken => "create-fungible-token",
            OperationId::MintFungibleToken => "mint-fungible-token",
            OperationId::TransferFungibleToken => "transfer-fungible-token",
            OperationId::CreateNft => "create-nft",
            OperationId::MintNft => "mint-nft",
            OperationId::TransferNft => "transfer-nft",
            OperationId::SubmitMessage => "submit-message",
            OperationId::CreateTokenContract => "create-token-contract",
            OperationId::MintTokenContract => "mint-token-contract",
            OperationId::TransferTokenContract => "transfer-token-contract",
        }
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationId {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationId::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperation(s.to_owned()))
    }
}

/// Returned when parsing an operation identifier that is not in the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation identifier: {0}")]
pub struct UnknownOperation(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_strings() {
        for op in OperationId::ALL {
            let parsed: OperationId = op.as_str().parse().unwrap();
            assert_eq!(parsed, op);
        }
    }

    #[test]
    fn rejects_unknown_identifiers() {
        let err = "burn-everything".parse::<OperationId>().unwrap_err();
        assert!(err.to_string().contains("burn-everything"));
    }

    #[test]
    fn identifiers_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for op in OperationId::ALL {
            assert!(seen.insert(op.as_str()));
        }
    }
}
