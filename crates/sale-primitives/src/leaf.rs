//! Allowlist entries and their leaf encoding.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the packed leaf preimage: 20 address bytes and a 32-byte word.
pub const LEAF_PREIMAGE_LEN: usize = 20 + 32;

/// Hashes an `(address, allocation)` pair into an allowlist leaf.
///
/// The preimage is `abi.encodePacked(address, uint256)`, which has a fixed
/// width for both fields so distinct pairs never share a preimage.
pub fn leaf_hash(address: Address, allocation: U256) -> B256 {
    keccak256((address, allocation).abi_encode_packed())
}

/// A single allowlisted address together with its pre-sale allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AllowlistEntry {
    /// Address allowed to mint during the pre-sale.
    pub address: Address,
    /// Maximum number of units the address may mint during the pre-sale.
    pub allocation: U256,
}

impl AllowlistEntry {
    /// Creates a new entry.
    pub const fn new(address: Address, allocation: U256) -> Self {
        Self {
            address,
            allocation,
        }
    }

    /// Returns the Merkle leaf committed for this entry.
    pub fn leaf(&self) -> B256 {
        leaf_hash(self.address, self.allocation)
    }
}

impl From<(Address, U256)> for AllowlistEntry {
    fn from((address, allocation): (Address, U256)) -> Self {
        Self::new(address, allocation)
    }
}

impl From<(Address, u64)> for AllowlistEntry {
    fn from((address, allocation): (Address, u64)) -> Self {
        Self::new(address, U256::from(allocation))
    }
}

impl fmt::Display for AllowlistEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.allocation)
    }
}
