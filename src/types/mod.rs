//! Core vocabulary types shared across the crate.
//!
//! These types form the contract between the orchestration layer and the
//! chain adapters: the closed chain and operation enumerations, the raw fee
//! shapes adapters produce, and the final result rows the orchestrator emits.

mod chain;
mod fee;
mod op;
mod result;

pub use chain::{ChainConfig, ChainId, NativeCurrency, NetworkKind};
pub use fee::{RawFee, RawOperationResult};
pub use op::{OperationId, UnknownOperation};
pub use result::{OperationResult, OperationStatus};
