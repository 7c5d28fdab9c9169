//! # Allowlist Sale Primitives
//!
//! Hashing rules shared by the off-chain allowlist compiler and the mint
//! accounting engine. Both sides must agree on these byte-for-byte or every
//! proof silently fails, so they live in exactly one place.
//!
//! ## Encoding
//!
//! | Value | Definition |
//! |-------|------------|
//! | leaf | `keccak256(abi.encodePacked(address, uint256 allocation))` |
//! | node | `keccak256(min(a, b) \|\| max(a, b))` |
//! | root | top node of the tree, or the single leaf of a one-entry list |
//!
//! Sibling pairs are hashed in ascending byte order, so proofs carry no
//! direction bits, and OpenZeppelin's `MerkleProof.verify` accepts them.
//! Leaves are also sorted before the tree is built, so the root only matches
//! a `merkletreejs` tree built with both `sortLeaves` and `sortPairs`; a tree
//! built with `sortPairs` alone depends on input order.

pub mod leaf;
pub mod merkle;
pub mod proof;

pub use leaf::{leaf_hash, AllowlistEntry, LEAF_PREIMAGE_LEN};
pub use merkle::{hash_pair, process_proof, verify};
pub use proof::Proof;

/// Re-exported so downstream crates name the same hash and address types.
pub use alloy_primitives::{Address, B256, U256};
