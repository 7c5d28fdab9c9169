//! Membership proof container.

use crate::merkle;
use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// Sibling hashes from a leaf up to the root.
///
/// A proof belongs to one leaf of one tree snapshot. Once the allowlist is
/// recompiled with a different entry set, old proofs no longer verify.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proof(Vec<B256>);

impl Proof {
    /// Wraps an ordered list of sibling hashes.
    pub const fn new(siblings: Vec<B256>) -> Self {
        Self(siblings)
    }

    /// Number of sibling hashes (the depth of the leaf).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the proof of a single-leaf tree.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sibling hashes in leaf-to-root order.
    pub fn as_slice(&self) -> &[B256] {
        &self.0
    }

    /// Iterates the sibling hashes in leaf-to-root order.
    pub fn iter(&self) -> std::slice::Iter<'_, B256> {
        self.0.iter()
    }

    /// Recomputes the root implied by this proof for `leaf`.
    pub fn compute_root(&self, leaf: B256) -> B256 {
        merkle::process_proof(leaf, self.iter())
    }

    /// Checks this proof for `leaf` against `root`.
    pub fn verify(&self, leaf: B256, root: B256) -> bool {
        merkle::verify(leaf, self.iter(), root)
    }

    /// Consumes the proof and returns the sibling hashes.
    pub fn into_inner(self) -> Vec<B256> {
        self.0
    }
}

impl From<Vec<B256>> for Proof {
    fn from(siblings: Vec<B256>) -> Self {
        Self(siblings)
    }
}

impl From<Proof> for Vec<B256> {
    fn from(proof: Proof) -> Self {
        proof.0
    }
}

impl FromIterator<B256> for Proof {
    fn from_iter<T: IntoIterator<Item = B256>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Proof {
    type Item = B256;
    type IntoIter = std::vec::IntoIter<B256>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Proof {
    type Item = &'a B256;
    type IntoIter = std::slice::Iter<'a, B256>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
