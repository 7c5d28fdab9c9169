//! Rejection reasons for sale calls.

use alloy_primitives::U256;
use thiserror::Error;

/// Reasons a sale call is rejected.
///
/// Every rejection is atomic: the engine state is exactly what it was before
/// the call. Nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleError {
    /// An owner-only operation was called by someone else.
    #[error("unauthorized caller")]
    Unauthorized,
    /// Both sale phases are paused.
    #[error("sale is closed")]
    SaleClosed,
    /// The pre-sale proof does not link `(caller, allocation)` to the stored root.
    #[error("caller is not allowlisted")]
    NotAllowlisted,
    /// The pre-sale mint would take the caller past its allocation.
    #[error("mint exceeds allocation: {minted} minted + {requested} requested > {allocation}")]
    ExceedsAllocation {
        /// Units the caller already holds.
        minted: U256,
        /// Units requested by this call.
        requested: U256,
        /// Allocation committed in the allowlist.
        allocation: U256,
    },
    /// The mint would take the caller past the per-address cap.
    #[error("mint exceeds per-address cap: {minted} minted + {requested} requested > {cap}")]
    ExceedsAddressCap {
        /// Units the caller already holds.
        minted: U256,
        /// Units requested by this call.
        requested: U256,
        /// Per-address cap across both phases.
        cap: U256,
    },
    /// The mint would take total supply past the maximum.
    #[error("mint exceeds max supply: {total} minted + {requested} requested > {max_supply}")]
    ExceedsMaxSupply {
        /// Units minted so far across all addresses.
        total: U256,
        /// Units requested by this call.
        requested: U256,
        /// Fixed supply of the issuance.
        max_supply: U256,
    },
    /// The attached payment does not cover the cost.
    #[error("insufficient payment: cost {cost}, paid {payment}")]
    InsufficientPayment {
        /// Cost of the requested quantity.
        cost: U256,
        /// Payment attached to the call.
        payment: U256,
    },
    /// A cost or counter computation overflowed.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
    /// A mint for zero units.
    #[error("mint quantity must be non-zero")]
    ZeroQuantity,
    /// Ownership cannot be handed to the zero address.
    #[error("zero address")]
    ZeroAddress,
    /// Value was attached to a call that does not accept payment.
    #[error("call is not payable")]
    NonPayable,
    /// Calldata did not decode against the sale interface.
    #[error("invalid calldata: {0}")]
    InvalidCalldata(String),
}

impl SaleError {
    /// Short, stable revert reason handed back to the ledger.
    pub const fn revert_reason(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::SaleClosed => "SaleClosed",
            Self::NotAllowlisted => "NotAllowlisted",
            Self::ExceedsAllocation { .. } => "ExceedsAllocation",
            Self::ExceedsAddressCap { .. } => "ExceedsAddressCap",
            Self::ExceedsMaxSupply { .. } => "ExceedsMaxSupply",
            Self::InsufficientPayment { .. } => "InsufficientPayment",
            Self::ArithmeticOverflow => "ArithmeticOverflow",
            Self::ZeroQuantity => "ZeroQuantity",
            Self::ZeroAddress => "ZeroAddress",
            Self::NonPayable => "NonPayable",
            Self::InvalidCalldata(_) => "InvalidCalldata",
        }
    }
}
