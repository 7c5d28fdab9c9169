//! Canonical pair hashing and proof verification.

use alloy_primitives::{keccak256, B256};
use std::borrow::Borrow;

/// Hashes two nodes in ascending byte order.
///
/// Used both when building a tree and when folding a proof.
pub fn hash_pair(a: B256, b: B256) -> B256 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo.as_slice());
    buf[32..].copy_from_slice(hi.as_slice());
    keccak256(buf)
}

/// Recomputes the root implied by `leaf` and a sequence of sibling hashes.
pub fn process_proof<I>(leaf: B256, proof: I) -> B256
where
    I: IntoIterator,
    I::Item: Borrow<B256>,
{
    proof
        .into_iter()
        .fold(leaf, |acc, sibling| hash_pair(acc, *sibling.borrow()))
}

/// Returns `true` iff `proof` links `leaf` to `root`.
pub fn verify<I>(leaf: B256, proof: I, root: B256) -> bool
where
    I: IntoIterator,
    I::Item: Borrow<B256>,
{
    process_proof(leaf, proof) == root
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    const A: B256 = b256!("0x1111111111111111111111111111111111111111111111111111111111111111");
    const B: B256 = b256!("0x2222222222222222222222222222222222222222222222222222222222222222");
    const C: B256 = b256!("0x3333333333333333333333333333333333333333333333333333333333333333");

    #[test]
    fn pair_hash_is_commutative() {
        assert_eq!(hash_pair(A, B), hash_pair(B, A));
    }

    #[test]
    fn pair_hash_puts_smaller_first() {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(A.as_slice());
        buf[32..].copy_from_slice(B.as_slice());
        assert_eq!(hash_pair(B, A), keccak256(buf));
    }

    #[test]
    fn empty_proof_means_leaf_is_root() {
        assert!(verify(A, Vec::<B256>::new(), A));
        assert!(!verify(A, Vec::<B256>::new(), B));
    }

    #[test]
    fn two_level_proof_verifies() {
        let root = hash_pair(hash_pair(A, B), C);
        assert!(verify(A, [B, C], root));
        assert!(verify(B, &[A, C], root));
        assert!(verify(C, [hash_pair(A, B)], root));
    }

    #[test]
    fn wrong_sibling_fails() {
        let root = hash_pair(hash_pair(A, B), C);
        assert!(!verify(A, [C, B], root), "siblings are order sensitive across levels");
        assert!(!verify(C, [A], root));
    }
}
