//! Shared, serialised access to the sale state.

use crate::{
    config::{ConfigError, SaleConfig},
    error::SaleError,
    phase::{PauseFlags, SalePhase, SaleStage},
    pricing::{FlatPricing, PricingPolicy},
    record::{MintRecord, SaleEvent},
    state::{MintRequest, SaleSnapshot, SaleState},
};
use alloy_primitives::{Address, B256, U256};
use parking_lot::RwLock;
use sale_primitives::Proof;
use std::sync::Arc;

/// Mint accounting engine.
///
/// Cloning is cheap and every clone shares the same state. Each mutating call
/// holds the write lock for its entire duration, phase determination
/// included, so calls behave as if executed one after another. Views take
/// the read lock.
#[derive(Debug)]
pub struct SaleEngine<P = FlatPricing> {
    state: Arc<RwLock<SaleState>>,
    pricing: Arc<P>,
}

impl<P> Clone for SaleEngine<P> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            pricing: Arc::clone(&self.pricing),
        }
    }
}

impl SaleEngine<FlatPricing> {
    /// Creates an engine with flat pricing.
    pub fn new(config: SaleConfig) -> Result<Self, ConfigError> {
        Self::with_pricing(config, FlatPricing)
    }
}

impl<P: PricingPolicy> SaleEngine<P> {
    /// Creates an engine with a custom pricing policy.
    pub fn with_pricing(config: SaleConfig, pricing: P) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::info!(
            target: "sale_engine",
            owner = ?config.owner,
            max_supply = %config.max_supply,
            root = %config.allowlist_root,
            ?pricing,
            "sale engine initialised"
        );
        Ok(Self {
            state: Arc::new(RwLock::new(SaleState::new(&config))),
            pricing: Arc::new(pricing),
        })
    }

    /// The pricing policy in use.
    pub fn pricing(&self) -> &P {
        &self.pricing
    }

    // === Minting ===

    /// Mints `quantity` units for `caller`.
    ///
    /// During the pre-sale `(caller, allocation)` must be proven against the
    /// stored root; during the public sale `allocation` and `proof` are
    /// ignored. See [`SaleState::mint`] for the check order.
    pub fn mint(
        &self,
        caller: Address,
        allocation: U256,
        proof: &Proof,
        quantity: U256,
        payment: U256,
    ) -> Result<MintRecord, SaleError> {
        self.submit(&MintRequest {
            caller,
            allocation,
            proof: proof.clone(),
            quantity,
            payment,
        })
    }

    /// Same as [`Self::mint`] for a prepared request.
    pub fn submit(&self, request: &MintRequest) -> Result<MintRecord, SaleError> {
        let result = self.state.write().mint(self.pricing.as_ref(), request);
        match &result {
            Ok(record) => tracing::info!(
                target: "sale_engine",
                minter = ?record.minter,
                phase = %record.phase,
                quantity = %record.quantity,
                cost = %record.cost,
                first_token_id = %record.first_token_id,
                "mint committed"
            ),
            Err(err) => tracing::warn!(
                target: "sale_engine",
                caller = ?request.caller,
                quantity = %request.quantity,
                payment = %request.payment,
                reason = err.revert_reason(),
                "mint rejected"
            ),
        }
        result
    }

    /// Public-sale cost of `quantity` units.
    pub fn calculate_cost(&self, quantity: U256) -> Result<U256, SaleError> {
        self.quote(SalePhase::PublicSale, quantity)
    }

    /// Cost of `quantity` units in `phase` at current prices.
    pub fn quote(&self, phase: SalePhase, quantity: U256) -> Result<U256, SaleError> {
        let price = self.state.read().price(phase);
        self.pricing.cost(phase, price, quantity)
    }

    // === Owner Operations ===

    /// Replaces the allowlist commitment.
    ///
    /// Proofs built for the previous root stop verifying immediately. Units
    /// already minted stay counted against each address.
    pub fn set_allowlist(&self, caller: Address, root: B256) -> Result<(), SaleError> {
        let previous = self
            .state
            .write()
            .set_allowlist(caller, root)
            .inspect_err(|_| Self::log_denied(caller, "setAllowlist"))?;
        tracing::info!(target: "sale_engine", %previous, current = %root, "allowlist updated");
        Ok(())
    }

    /// Pauses or resumes the pre-sale.
    pub fn set_pre_sale_paused(&self, caller: Address, paused: bool) -> Result<(), SaleError> {
        self.set_paused(caller, SalePhase::PreSale, paused)
    }

    /// Pauses or resumes the public sale.
    pub fn set_public_sale_paused(&self, caller: Address, paused: bool) -> Result<(), SaleError> {
        self.set_paused(caller, SalePhase::PublicSale, paused)
    }

    fn set_paused(&self, caller: Address, phase: SalePhase, paused: bool) -> Result<(), SaleError> {
        self.state
            .write()
            .set_paused(caller, phase, paused)
            .inspect_err(|_| Self::log_denied(caller, "setPaused"))?;
        tracing::info!(target: "sale_engine", %phase, paused, "pause flag updated");
        Ok(())
    }

    /// Moves to `stage` by setting both pause flags in one step.
    pub fn transition_to(&self, caller: Address, stage: SaleStage) -> Result<(), SaleError> {
        let previous = self
            .state
            .write()
            .set_flags(caller, PauseFlags::for_stage(stage))
            .inspect_err(|_| Self::log_denied(caller, "transition"))?;
        tracing::info!(
            target: "sale_engine",
            from = ?previous.stage(),
            to = ?stage,
            "sale stage transitioned"
        );
        Ok(())
    }

    /// Switches between the two phases and returns the new stage.
    ///
    /// A paused public sale is opened and the pre-sale paused; otherwise the
    /// pre-sale is opened and the public sale paused.
    pub fn toggle_sale(&self, caller: Address) -> Result<SaleStage, SaleError> {
        let mut state = self.state.write();
        let next = state.flags().toggled();
        state
            .set_flags(caller, next)
            .inspect_err(|_| Self::log_denied(caller, "toggleSale"))?;
        tracing::info!(target: "sale_engine", stage = ?next.stage(), "sale toggled");
        Ok(next.stage())
    }

    /// Sets the pre-sale unit price.
    pub fn set_pre_sale_price(&self, caller: Address, price: U256) -> Result<(), SaleError> {
        self.set_price(caller, SalePhase::PreSale, price)
    }

    /// Sets the public-sale unit price.
    pub fn set_public_sale_price(&self, caller: Address, price: U256) -> Result<(), SaleError> {
        self.set_price(caller, SalePhase::PublicSale, price)
    }

    fn set_price(&self, caller: Address, phase: SalePhase, price: U256) -> Result<(), SaleError> {
        self.state
            .write()
            .set_price(caller, phase, price)
            .inspect_err(|_| Self::log_denied(caller, "setPrice"))?;
        tracing::info!(target: "sale_engine", %phase, %price, "price updated");
        Ok(())
    }

    /// Sets the per-address cap.
    pub fn set_max_mintable_per_address(
        &self,
        caller: Address,
        cap: U256,
    ) -> Result<(), SaleError> {
        self.state
            .write()
            .set_max_mintable_per_address(caller, cap)
            .inspect_err(|_| Self::log_denied(caller, "setMaxMintablePerAddress"))?;
        tracing::info!(target: "sale_engine", %cap, "per-address cap updated");
        Ok(())
    }

    /// Hands ownership to `new_owner`.
    pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<(), SaleError> {
        self.state
            .write()
            .transfer_ownership(caller, new_owner)
            .inspect_err(|_| Self::log_denied(caller, "transferOwnership"))?;
        tracing::info!(target: "sale_engine", ?new_owner, "ownership transferred");
        Ok(())
    }

    fn log_denied(caller: Address, operation: &'static str) {
        tracing::warn!(target: "sale_engine", ?caller, operation, "owner operation denied");
    }

    // === Views ===

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.state.read().owner()
    }

    /// Current allowlist commitment.
    pub fn allowlist_root(&self) -> B256 {
        self.state.read().allowlist_root()
    }

    /// Pre-sale unit price.
    pub fn pre_sale_price(&self) -> U256 {
        self.state.read().price(SalePhase::PreSale)
    }

    /// Public-sale unit price.
    pub fn public_sale_price(&self) -> U256 {
        self.state.read().price(SalePhase::PublicSale)
    }

    /// Fixed supply.
    pub fn max_supply(&self) -> U256 {
        self.state.read().max_supply()
    }

    /// Per-address cap.
    pub fn max_mintable_per_address(&self) -> U256 {
        self.state.read().max_mintable_per_address()
    }

    /// Units minted so far.
    pub fn total_minted(&self) -> U256 {
        self.state.read().total_minted()
    }

    /// Units still available.
    pub fn remaining_supply(&self) -> U256 {
        let state = self.state.read();
        state.max_supply().saturating_sub(state.total_minted())
    }

    /// Units minted by `address`.
    pub fn minted_by(&self, address: Address) -> U256 {
        self.state.read().minted_by(address)
    }

    /// Whether the pre-sale is paused.
    pub fn pre_sale_paused(&self) -> bool {
        self.state.read().flags().pre_sale_paused
    }

    /// Whether the public sale is paused.
    pub fn public_sale_paused(&self) -> bool {
        self.state.read().flags().public_sale_paused
    }

    /// Phase a mint would run under right now.
    pub fn active_phase(&self) -> Option<SalePhase> {
        self.state.read().flags().active_phase()
    }

    /// Copy of the state change journal.
    pub fn events(&self) -> Vec<SaleEvent> {
        self.state.read().events().to_vec()
    }

    /// Takes the state change journal.
    pub fn drain_events(&self) -> Vec<SaleEvent> {
        self.state.write().drain_events()
    }

    /// Point-in-time view of parameters and counters.
    pub fn snapshot(&self) -> SaleSnapshot {
        self.state.read().snapshot()
    }
}
