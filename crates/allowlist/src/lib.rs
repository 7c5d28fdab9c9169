//! # Allowlist Compiler
//!
//! Turns a list of `(address, allocation)` pairs into a Merkle commitment and
//! per-entry membership proofs. The compiler is a pure function of its input:
//! it never talks to the ledger, and the resulting root is published by a
//! separate step.
//!
//! ```ignore
//! use sale_allowlist::{source, AllowlistTree};
//!
//! let entries = source::load("allowlist.json")?;
//! let tree = AllowlistTree::build(entries)?;
//! println!("root: {}", tree.root());
//! let proof = tree.proof_for_address(minter)?;
//! ```
//!
//! Leaves are sorted before the tree is built, so any permutation of the same
//! entry set yields the same root.

pub mod bundle;
pub mod error;
pub mod source;
pub mod tree;

pub use bundle::{BundleEntry, ProofBundle};
pub use error::CompileError;
pub use tree::AllowlistTree;

pub use sale_primitives::{AllowlistEntry, Proof};
