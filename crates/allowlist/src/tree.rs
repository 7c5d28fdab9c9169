//! Merkle tree over allowlist leaves.

use crate::error::CompileError;
use alloy_primitives::{Address, B256};
use sale_primitives::{hash_pair, AllowlistEntry, Proof};
use std::collections::{HashMap, HashSet};

/// A compiled allowlist.
///
/// `layers[0]` holds the leaves in ascending order and every following layer
/// pairs adjacent nodes with [`hash_pair`]. An unmatched last node is promoted
/// to the next layer unchanged. The final layer has exactly one node, the root.
#[derive(Clone, Debug)]
pub struct AllowlistTree {
    entries: Vec<AllowlistEntry>,
    layers: Vec<Vec<B256>>,
    positions: HashMap<B256, usize>,
    by_address: HashMap<Address, AllowlistEntry>,
}

impl AllowlistTree {
    /// Compiles `entries` into a tree.
    ///
    /// Fails with [`CompileError::DuplicateAddress`] if an address is listed
    /// twice and [`CompileError::EmptyAllowlist`] if there is nothing to
    /// commit to.
    pub fn build<I>(entries: I) -> Result<Self, CompileError>
    where
        I: IntoIterator,
        I::Item: Into<AllowlistEntry>,
    {
        let entries: Vec<AllowlistEntry> = entries.into_iter().map(Into::into).collect();
        if entries.is_empty() {
            return Err(CompileError::EmptyAllowlist);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.address) {
                return Err(CompileError::DuplicateAddress {
                    address: entry.address,
                });
            }
        }

        let mut leaves: Vec<B256> = entries.iter().map(AllowlistEntry::leaf).collect();
        leaves.sort_unstable();

        let positions = leaves
            .iter()
            .enumerate()
            .map(|(index, leaf)| (*leaf, index))
            .collect();
        let by_address = entries.iter().map(|e| (e.address, *e)).collect();

        let mut layers = vec![leaves];
        while let Some(level) = layers.last().filter(|level| level.len() > 1) {
            let next = level
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(*left, *right),
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            layers.push(next);
        }

        let tree = Self {
            entries,
            layers,
            positions,
            by_address,
        };
        tracing::debug!(
            target: "allowlist",
            entries = tree.len(),
            depth = tree.depth(),
            root = %tree.root(),
            "compiled allowlist"
        );
        Ok(tree)
    }

    /// The commitment to publish to the ledger.
    pub fn root(&self) -> B256 {
        self.layers
            .last()
            .and_then(|top| top.first())
            .copied()
            .unwrap_or_default()
    }

    /// Number of entries in the allowlist.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; empty allowlists are rejected by [`Self::build`].
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of hashing levels above the leaves.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Entries in input order.
    pub fn entries(&self) -> &[AllowlistEntry] {
        &self.entries
    }

    /// Sorted leaf hashes.
    pub fn leaves(&self) -> &[B256] {
        &self.layers[0]
    }

    /// Returns `true` if the exact pair is a leaf of this tree.
    pub fn contains(&self, entry: &AllowlistEntry) -> bool {
        self.positions.contains_key(&entry.leaf())
    }

    /// Returns the entry listed for `address`, if any.
    pub fn entry_for(&self, address: Address) -> Option<&AllowlistEntry> {
        self.by_address.get(&address)
    }

    /// Builds the membership proof for `entry`.
    pub fn proof_for(&self, entry: &AllowlistEntry) -> Result<Proof, CompileError> {
        let position = self
            .positions
            .get(&entry.leaf())
            .copied()
            .ok_or(CompileError::EntryNotFound { entry: *entry })?;
        Ok(self.proof_at(position))
    }

    /// Builds the membership proof for whichever allocation `address` holds.
    pub fn proof_for_address(
        &self,
        address: Address,
    ) -> Result<(AllowlistEntry, Proof), CompileError> {
        let entry = *self
            .entry_for(address)
            .ok_or(CompileError::AddressNotFound { address })?;
        let proof = self.proof_for(&entry)?;
        Ok((entry, proof))
    }

    /// Checks `proof` for `entry` against this tree's root.
    pub fn verify(&self, entry: &AllowlistEntry, proof: &Proof) -> bool {
        proof.verify(entry.leaf(), self.root())
    }

    /// Proofs for every entry, in input order.
    pub fn proofs(&self) -> impl Iterator<Item = (AllowlistEntry, Proof)> + '_ {
        self.entries.iter().map(move |entry| {
            let position = self.positions[&entry.leaf()];
            (*entry, self.proof_at(position))
        })
    }

    fn proof_at(&self, mut position: usize) -> Proof {
        let mut siblings = Vec::with_capacity(self.depth());
        for level in &self.layers[..self.depth()] {
            let sibling = position ^ 1;
            if let Some(node) = level.get(sibling) {
                siblings.push(*node);
            }
            position /= 2;
        }
        Proof::new(siblings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, U256};
    use sale_primitives::verify;

    fn entry(last: u8, allocation: u64) -> AllowlistEntry {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        AllowlistEntry::new(Address::from(bytes), U256::from(allocation))
    }

    #[test]
    fn single_entry_root_is_leaf() {
        let a = entry(1, 2);
        let tree = AllowlistTree::build([a]).unwrap();
        assert_eq!(tree.root(), a.leaf());
        assert_eq!(tree.depth(), 0);
        assert!(tree.proof_for(&a).unwrap().is_empty());
    }

    #[test]
    fn two_entries_hash_sorted_pair() {
        let a = entry(1, 2);
        let b = entry(2, 1);
        let tree = AllowlistTree::build([a, b]).unwrap();
        assert_eq!(tree.root(), hash_pair(a.leaf(), b.leaf()));
        assert_eq!(tree.proof_for(&a).unwrap().as_slice(), &[b.leaf()]);
    }

    #[test]
    fn odd_node_is_promoted() {
        let entries: Vec<_> = (1..=3).map(|i| entry(i, u64::from(i))).collect();
        let tree = AllowlistTree::build(entries.clone()).unwrap();

        let leaves = tree.leaves().to_vec();
        let expected = hash_pair(hash_pair(leaves[0], leaves[1]), leaves[2]);
        assert_eq!(tree.root(), expected);

        let last = entries
            .iter()
            .find(|e| e.leaf() == leaves[2])
            .copied()
            .unwrap();
        let proof = tree.proof_for(&last).unwrap();
        assert_eq!(proof.len(), 1, "promoted node skips the level without a sibling");
        assert!(verify(last.leaf(), &proof, tree.root()));
    }

    #[test]
    fn duplicate_address_is_rejected() {
        let addr = address!("0x00000000000000000000000000000000000000a1");
        let err = AllowlistTree::build([(addr, 1u64), (addr, 2u64)]).unwrap_err();
        assert!(matches!(err, CompileError::DuplicateAddress { address } if address == addr));
    }

    #[test]
    fn empty_allowlist_is_rejected() {
        let err = AllowlistTree::build(Vec::<AllowlistEntry>::new()).unwrap_err();
        assert!(matches!(err, CompileError::EmptyAllowlist));
    }

    #[test]
    fn unknown_entry_has_no_proof() {
        let tree = AllowlistTree::build([entry(1, 2), entry(2, 1)]).unwrap();

        let wrong_allocation = entry(1, 3);
        assert!(matches!(
            tree.proof_for(&wrong_allocation),
            Err(CompileError::EntryNotFound { .. })
        ));
        assert!(matches!(
            tree.proof_for_address(entry(9, 1).address),
            Err(CompileError::AddressNotFound { .. })
        ));
    }

    #[test]
    fn proof_for_address_returns_listed_allocation() {
        let a = entry(1, 2);
        let tree = AllowlistTree::build([a, entry(2, 1)]).unwrap();
        let (found, proof) = tree.proof_for_address(a.address).unwrap();
        assert_eq!(found, a);
        assert!(tree.verify(&found, &proof));
    }
}
