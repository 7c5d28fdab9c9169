//! Records emitted by state changes.

use crate::phase::SalePhase;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Outcome of a successful mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRecord {
    /// Address that minted.
    pub minter: Address,
    /// Phase the mint ran under.
    pub phase: SalePhase,
    /// Units minted.
    pub quantity: U256,
    /// Cost charged for the units.
    pub cost: U256,
    /// Payment attached to the call.
    pub payment: U256,
    /// `payment - cost`; refunding or keeping it is up to settlement.
    pub excess: U256,
    /// Id of the first unit; the mint covers `first_token_id..first_token_id + quantity`.
    pub first_token_id: U256,
    /// Allowlist root the pre-sale proof was checked against.
    pub allowlist_root: Option<B256>,
}

/// State change journal entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum SaleEvent {
    /// Units were minted.
    Minted(MintRecord),
    /// The allowlist commitment was replaced.
    AllowlistUpdated {
        /// Root before the call.
        previous: B256,
        /// Root after the call.
        current: B256,
    },
    /// A pause flag changed.
    PauseChanged {
        /// Phase whose flag changed.
        phase: SalePhase,
        /// New flag value.
        paused: bool,
    },
    /// A unit price changed.
    PriceChanged {
        /// Phase whose price changed.
        phase: SalePhase,
        /// New unit price in wei.
        price: U256,
    },
    /// The per-address cap changed.
    MaxMintablePerAddressChanged {
        /// New cap.
        cap: U256,
    },
    /// Ownership moved to a new address.
    OwnershipTransferred {
        /// Owner before the call.
        previous: Address,
        /// Owner after the call.
        current: Address,
    },
}
