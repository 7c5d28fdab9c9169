//! Proof bundles for publishing alongside a commitment.

use crate::tree::AllowlistTree;
use alloy_primitives::{Address, B256, U256};
use sale_primitives::{AllowlistEntry, Proof};
use serde::{Deserialize, Serialize};

/// One allowlist entry with its leaf and proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    /// Allowlisted address.
    pub address: Address,
    /// Pre-sale allocation.
    pub allocation: U256,
    /// Committed leaf hash.
    pub leaf: B256,
    /// Sibling path to [`ProofBundle::root`].
    pub proof: Proof,
}

impl BundleEntry {
    /// The `(address, allocation)` pair this entry proves.
    pub const fn entry(&self) -> AllowlistEntry {
        AllowlistEntry::new(self.address, self.allocation)
    }
}

/// Every proof of one compiled allowlist, keyed by the root they prove against.
///
/// A proof server hands out [`BundleEntry`] values by address; the bundle must
/// be regenerated whenever the root changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofBundle {
    /// Commitment all proofs in this bundle verify against.
    pub root: B256,
    /// Entries in allowlist input order.
    pub entries: Vec<BundleEntry>,
}

impl ProofBundle {
    /// Collects the proof of every entry in `tree`.
    pub fn from_tree(tree: &AllowlistTree) -> Self {
        let entries = tree
            .proofs()
            .map(|(entry, proof)| BundleEntry {
                address: entry.address,
                allocation: entry.allocation,
                leaf: entry.leaf(),
                proof,
            })
            .collect();
        Self {
            root: tree.root(),
            entries,
        }
    }

    /// Looks up the entry for `address`.
    pub fn find(&self, address: Address) -> Option<&BundleEntry> {
        self.entries.iter().find(|entry| entry.address == address)
    }

    /// Returns the first entry whose leaf or proof does not match the root.
    pub fn first_invalid(&self) -> Option<&BundleEntry> {
        self.entries.iter().find(|bundled| {
            let leaf = bundled.entry().leaf();
            leaf != bundled.leaf || !bundled.proof.verify(leaf, self.root)
        })
    }

    /// Parses a bundle from JSON.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Pretty-printed JSON encoding.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&AllowlistTree> for ProofBundle {
    fn from(tree: &AllowlistTree) -> Self {
        Self::from_tree(tree)
    }
}
