//! Raw fee shapes produced by chain adapters.

use bigdecimal::BigDecimal;

/// The fee an adapter read back from a submitted transaction, in the shape
/// the ledger reports it.
///
/// Different ledger families report fees in materially different forms, so
/// this is a tagged variant consumed exhaustively by the
/// [`CostNormalizer`](crate::normalize::CostNormalizer) rather than a struct
/// of optional fields. A missing field can therefore never be silently
/// treated as zero.
#[derive(Debug, Clone, PartialEq)]
pub enum RawFee {
    /// Gas-metered chains: `gas_used * gas_price`, plus any surcharge that
    /// must be counted as spent (e.g. an OP-stack L1 data fee). All values
    /// are in the chain's smallest unit.
    Gas {
        gas_used: u128,
        gas_price: u128,
        additional_cost: u128,
    },
    /// Chains that report a single pre-computed fee already denominated in
    /// native units. The normalizer uses this amount verbatim.
    Native(BigDecimal),
    /// Chains that report an integer fee in the smallest ledger unit
    /// (XRPL drops, tinybar), requiring a fixed decimal shift.
    SmallestUnit(u128),
}

impl RawFee {
    /// Gas fee with no surcharge.
    pub const fn gas(gas_used: u128, gas_price: u128) -> Self {
        RawFee::Gas {
            gas_used,
            gas_price,
            additional_cost: 0,
        }
    }
}

/// An adapter's unprocessed output for one executed operation.
///
/// Ephemeral: consumed immediately by the cost normalizer and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOperationResult {
    /// Ledger transaction identifier, when the submission got far enough to
    /// have one.
    pub tx_hash: Option<String>,
    /// The fee actually charged, in the ledger's own representation.
    pub fee: RawFee,
    /// Whether the ledger reported the transaction as successful. A reverted
    /// transaction still paid its fee, so it still carries one.
    pub success: bool,
}

impl RawOperationResult {
    /// A successful result with a transaction hash.
    pub fn ok(tx_hash: impl Into<String>, fee: RawFee) -> Self {
        Self {
            tx_hash: Some(tx_hash.into()),
            fee,
            success: true,
        }
    }

    /// A result the ledger reported as failed (fee was still charged).
    pub fn reverted(tx_hash: impl Into<String>, fee: RawFee) -> Self {
        Self {
            tx_hash: Some(tx_hash.into()),
            fee,
            success: false,
        }
    }
}
