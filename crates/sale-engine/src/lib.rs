//! # Allowlist Sale Engine
//!
//! Mint accounting for a fixed-supply issuance sold in two phases:
//!
//! | Phase | Who may mint | Price | Extra limit |
//! |-------|--------------|-------|-------------|
//! | Pre-sale | Proven against the allowlist root | `preSalePrice` | Per-entry allocation |
//! | Public sale | Anyone | `publicSalePrice` | None |
//!
//! Both phases share the per-address cap and the maximum supply. The owner
//! controls the allowlist root, the pause flags, prices and the cap.
//!
//! ## Architecture
//!
//! - [`SaleState`] validates and applies one transition at a time.
//! - [`SaleEngine`] shares the state behind a lock and logs every outcome.
//! - [`SaleDispatcher`] decodes Solidity calldata into engine calls.
//! - [`PricingPolicy`] turns a unit price and a quantity into a cost.
//!
//! ```ignore
//! use sale_engine::{SaleConfig, SaleEngine};
//!
//! let engine = SaleEngine::new(SaleConfig::with_owner(owner))?;
//! engine.set_allowlist(owner, tree.root())?;
//! let (entry, proof) = tree.proof_for_address(buyer)?;
//! engine.mint(buyer, entry.allocation, &proof, quantity, payment)?;
//! ```

pub mod abi;
pub mod config;
pub mod engine;
mod error;
pub mod phase;
pub mod pricing;
pub mod record;
pub mod state;

pub use abi::{IAllowlistSale, SaleCall, SaleDispatcher};
pub use config::{ConfigError, SaleConfig};
pub use engine::SaleEngine;
pub use error::SaleError;
pub use phase::{PauseFlags, SalePhase, SaleStage};
pub use pricing::{BulkPricing, FlatPricing, PricingPolicy};
pub use record::{MintRecord, SaleEvent};
pub use state::{MintRequest, SaleSnapshot, SaleState};
