//! Sale state and its transitions.
//!
//! [`SaleState`] holds everything a mint reads or writes. Every transition
//! validates first and mutates last, so a rejected call leaves the state
//! untouched. Serialising access is the job of [`crate::SaleEngine`].

use crate::{
    config::SaleConfig,
    error::SaleError,
    phase::{PauseFlags, SalePhase},
    pricing::PricingPolicy,
    record::{MintRecord, SaleEvent},
};
use alloy_primitives::{Address, B256, U256};
use sale_primitives::{leaf_hash, Proof};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Arguments of one mint call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintRequest {
    /// Address minting and paying.
    pub caller: Address,
    /// Allocation the caller claims in the allowlist; ignored in the public sale.
    pub allocation: U256,
    /// Membership proof for `(caller, allocation)`; ignored in the public sale.
    pub proof: Proof,
    /// Units requested.
    pub quantity: U256,
    /// Payment attached to the call, in wei.
    pub payment: U256,
}

impl MintRequest {
    /// A public-sale request, which needs no allowlist data.
    pub fn public(caller: Address, quantity: U256, payment: U256) -> Self {
        Self {
            caller,
            allocation: U256::ZERO,
            proof: Proof::default(),
            quantity,
            payment,
        }
    }
}

/// Point-in-time view of the sale parameters and counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleSnapshot {
    /// Current owner.
    pub owner: Address,
    /// Current allowlist commitment.
    pub allowlist_root: B256,
    /// Pause flags.
    pub flags: PauseFlags,
    /// Pre-sale unit price.
    pub pre_sale_price: U256,
    /// Public-sale unit price.
    pub public_sale_price: U256,
    /// Fixed supply.
    pub max_supply: U256,
    /// Per-address cap.
    pub max_mintable_per_address: U256,
    /// Units minted so far.
    pub total_minted: U256,
    /// Number of distinct addresses that minted.
    pub minters: usize,
}

/// All mutable sale state.
#[derive(Clone, Debug)]
pub struct SaleState {
    owner: Address,
    allowlist_root: B256,
    flags: PauseFlags,
    pre_sale_price: U256,
    public_sale_price: U256,
    max_supply: U256,
    max_mintable_per_address: U256,
    total_minted: U256,
    minted: HashMap<Address, U256>,
    events: Vec<SaleEvent>,
}

impl SaleState {
    /// Fresh state with nothing minted.
    pub fn new(config: &SaleConfig) -> Self {
        Self {
            owner: config.owner,
            allowlist_root: config.allowlist_root,
            flags: config.pause_flags(),
            pre_sale_price: config.pre_sale_price,
            public_sale_price: config.public_sale_price,
            max_supply: config.max_supply,
            max_mintable_per_address: config.max_mintable_per_address,
            total_minted: U256::ZERO,
            minted: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Current owner.
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Current allowlist commitment.
    pub const fn allowlist_root(&self) -> B256 {
        self.allowlist_root
    }

    /// Current pause flags.
    pub const fn flags(&self) -> PauseFlags {
        self.flags
    }

    /// Unit price of `phase`.
    pub const fn price(&self, phase: SalePhase) -> U256 {
        match phase {
            SalePhase::PreSale => self.pre_sale_price,
            SalePhase::PublicSale => self.public_sale_price,
        }
    }

    /// Fixed supply.
    pub const fn max_supply(&self) -> U256 {
        self.max_supply
    }

    /// Per-address cap.
    pub const fn max_mintable_per_address(&self) -> U256 {
        self.max_mintable_per_address
    }

    /// Units minted so far.
    pub const fn total_minted(&self) -> U256 {
        self.total_minted
    }

    /// Units minted by `address` across both phases.
    pub fn minted_by(&self, address: Address) -> U256 {
        self.minted.get(&address).copied().unwrap_or_default()
    }

    /// Journal of state changes since the last drain.
    pub fn events(&self) -> &[SaleEvent] {
        &self.events
    }

    /// Takes the journal, leaving it empty.
    pub fn drain_events(&mut self) -> Vec<SaleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Point-in-time view of the state.
    pub fn snapshot(&self) -> SaleSnapshot {
        SaleSnapshot {
            owner: self.owner,
            allowlist_root: self.allowlist_root,
            flags: self.flags,
            pre_sale_price: self.pre_sale_price,
            public_sale_price: self.public_sale_price,
            max_supply: self.max_supply,
            max_mintable_per_address: self.max_mintable_per_address,
            total_minted: self.total_minted,
            minters: self.minted.len(),
        }
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), SaleError> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(SaleError::Unauthorized)
        }
    }

    /// Validates and applies a mint.
    ///
    /// # Validation Order
    ///
    /// 1. Active phase (pre-sale first, then public sale)
    /// 2. Pre-sale only: allowlist proof, then allocation
    /// 3. Cost from the pricing policy
    /// 4. Payment covers cost
    /// 5. Per-address cap
    /// 6. Max supply
    /// 7. Non-zero quantity
    ///
    /// Counters and the journal are only touched once every check passed.
    pub fn mint<P>(&mut self, pricing: &P, request: &MintRequest) -> Result<MintRecord, SaleError>
    where
        P: PricingPolicy + ?Sized,
    {
        let MintRequest {
            caller,
            allocation,
            ref proof,
            quantity,
            payment,
        } = *request;

        // 1. Phase
        let phase = self.flags.active_phase().ok_or(SaleError::SaleClosed)?;

        let minted = self.minted_by(caller);
        let minted_after = |minted: U256| {
            minted
                .checked_add(quantity)
                .ok_or(SaleError::ArithmeticOverflow)
        };

        // 2. Allowlist membership and allocation
        let allowlist_root = if phase == SalePhase::PreSale {
            let leaf = leaf_hash(caller, allocation);
            if !proof.verify(leaf, self.allowlist_root) {
                return Err(SaleError::NotAllowlisted);
            }
            if minted_after(minted)? > allocation {
                return Err(SaleError::ExceedsAllocation {
                    minted,
                    requested: quantity,
                    allocation,
                });
            }
            Some(self.allowlist_root)
        } else {
            None
        };

        // 3. Cost
        let cost = pricing.cost(phase, self.price(phase), quantity)?;

        // 4. Payment
        if payment < cost {
            return Err(SaleError::InsufficientPayment { cost, payment });
        }

        // 5. Per-address cap
        let new_minted = minted_after(minted)?;
        if new_minted > self.max_mintable_per_address {
            return Err(SaleError::ExceedsAddressCap {
                minted,
                requested: quantity,
                cap: self.max_mintable_per_address,
            });
        }

        // 6. Supply
        let new_total = self
            .total_minted
            .checked_add(quantity)
            .ok_or(SaleError::ArithmeticOverflow)?;
        if new_total > self.max_supply {
            return Err(SaleError::ExceedsMaxSupply {
                total: self.total_minted,
                requested: quantity,
                max_supply: self.max_supply,
            });
        }

        // 7. Quantity
        if quantity.is_zero() {
            return Err(SaleError::ZeroQuantity);
        }

        let record = MintRecord {
            minter: caller,
            phase,
            quantity,
            cost,
            payment,
            excess: payment - cost,
            first_token_id: self.total_minted,
            allowlist_root,
        };

        self.minted.insert(caller, new_minted);
        self.total_minted = new_total;
        self.events.push(SaleEvent::Minted(record.clone()));
        Ok(record)
    }

    /// Replaces the allowlist commitment and returns the previous one.
    ///
    /// Minted counters are kept as they are; nothing minted under the old
    /// root is reconciled against the new one.
    pub fn set_allowlist(&mut self, caller: Address, root: B256) -> Result<B256, SaleError> {
        self.ensure_owner(caller)?;
        let previous = std::mem::replace(&mut self.allowlist_root, root);
        self.events.push(SaleEvent::AllowlistUpdated {
            previous,
            current: root,
        });
        Ok(previous)
    }

    /// Sets the pause flag of one phase.
    pub fn set_paused(
        &mut self,
        caller: Address,
        phase: SalePhase,
        paused: bool,
    ) -> Result<(), SaleError> {
        self.ensure_owner(caller)?;
        self.flags.set_paused(phase, paused);
        self.events.push(SaleEvent::PauseChanged { phase, paused });
        Ok(())
    }

    /// Replaces both pause flags at once and returns the previous flags.
    pub fn set_flags(
        &mut self,
        caller: Address,
        flags: PauseFlags,
    ) -> Result<PauseFlags, SaleError> {
        self.ensure_owner(caller)?;
        let previous = std::mem::replace(&mut self.flags, flags);
        for phase in [SalePhase::PreSale, SalePhase::PublicSale] {
            if previous.is_paused(phase) != flags.is_paused(phase) {
                self.events.push(SaleEvent::PauseChanged {
                    phase,
                    paused: flags.is_paused(phase),
                });
            }
        }
        Ok(previous)
    }

    /// Sets the unit price of `phase`.
    pub fn set_price(
        &mut self,
        caller: Address,
        phase: SalePhase,
        price: U256,
    ) -> Result<(), SaleError> {
        self.ensure_owner(caller)?;
        match phase {
            SalePhase::PreSale => self.pre_sale_price = price,
            SalePhase::PublicSale => self.public_sale_price = price,
        }
        self.events.push(SaleEvent::PriceChanged { phase, price });
        Ok(())
    }

    /// Sets the per-address cap.
    ///
    /// Lowering the cap below what an address already holds only blocks
    /// further mints by that address.
    pub fn set_max_mintable_per_address(
        &mut self,
        caller: Address,
        cap: U256,
    ) -> Result<(), SaleError> {
        self.ensure_owner(caller)?;
        self.max_mintable_per_address = cap;
        self.events.push(SaleEvent::MaxMintablePerAddressChanged { cap });
        Ok(())
    }

    /// Hands ownership to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), SaleError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(SaleError::ZeroAddress);
        }
        let previous = std::mem::replace(&mut self.owner, new_owner);
        self.events.push(SaleEvent::OwnershipTransferred {
            previous,
            current: new_owner,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::FlatPricing;
    use alloy_primitives::address;
    use sale_primitives::hash_pair;

    const OWNER: Address = address!("0x00000000000000000000000000000000000000a0");
    const ALICE: Address = address!("0x00000000000000000000000000000000000000a1");
    const BOB: Address = address!("0x00000000000000000000000000000000000000b1");

    fn state_with_list() -> (SaleState, Proof) {
        let alice_leaf = leaf_hash(ALICE, U256::from(2u64));
        let bob_leaf = leaf_hash(BOB, U256::from(1u64));
        let mut config = SaleConfig::with_owner(OWNER);
        config.pre_sale_price = U256::from(500u64);
        config.allowlist_root = hash_pair(alice_leaf, bob_leaf);
        (SaleState::new(&config), Proof::new(vec![bob_leaf]))
    }

    fn request(proof: &Proof, quantity: u64, payment: u64) -> MintRequest {
        MintRequest {
            caller: ALICE,
            allocation: U256::from(2u64),
            proof: proof.clone(),
            quantity: U256::from(quantity),
            payment: U256::from(payment),
        }
    }

    #[test]
    fn mint_commits_counters_and_journal() {
        let (mut state, proof) = state_with_list();
        let record = state.mint(&FlatPricing, &request(&proof, 2, 1200)).unwrap();

        assert_eq!(record.cost, U256::from(1000u64));
        assert_eq!(record.excess, U256::from(200u64));
        assert_eq!(record.first_token_id, U256::ZERO);
        assert_eq!(record.allowlist_root, Some(state.allowlist_root()));
        assert_eq!(state.minted_by(ALICE), U256::from(2u64));
        assert_eq!(state.total_minted(), U256::from(2u64));
        assert_eq!(state.events(), &[SaleEvent::Minted(record)]);
    }

    #[test]
    fn rejected_mint_leaves_state_untouched() {
        let (mut state, proof) = state_with_list();
        let before = state.snapshot();

        let err = state.mint(&FlatPricing, &request(&proof, 2, 999)).unwrap_err();
        assert!(matches!(err, SaleError::InsufficientPayment { .. }));
        assert_eq!(state.snapshot(), before);
        assert!(state.events().is_empty());
    }

    #[test]
    fn zero_quantity_is_rejected_last() {
        let (mut state, proof) = state_with_list();
        let err = state.mint(&FlatPricing, &request(&proof, 0, 0)).unwrap_err();
        assert_eq!(err, SaleError::ZeroQuantity);

        state.set_flags(OWNER, PauseFlags::for_stage(crate::SaleStage::Closed)).unwrap();
        let err = state.mint(&FlatPricing, &request(&proof, 0, 0)).unwrap_err();
        assert_eq!(err, SaleError::SaleClosed, "phase check comes first");
    }

    #[test]
    fn set_flags_journals_only_changes() {
        let (mut state, _) = state_with_list();
        state
            .set_flags(OWNER, PauseFlags::for_stage(crate::SaleStage::PublicSale))
            .unwrap();
        assert_eq!(state.drain_events().len(), 2);

        state
            .set_flags(OWNER, PauseFlags::for_stage(crate::SaleStage::Closed))
            .unwrap();
        assert_eq!(
            state.drain_events(),
            vec![SaleEvent::PauseChanged {
                phase: SalePhase::PublicSale,
                paused: true
            }]
        );
    }

    #[test]
    fn owner_operations_require_owner() {
        let (mut state, _) = state_with_list();
        assert_eq!(state.set_allowlist(ALICE, B256::ZERO), Err(SaleError::Unauthorized));
        assert_eq!(
            state.set_price(BOB, SalePhase::PreSale, U256::ZERO),
            Err(SaleError::Unauthorized)
        );
        assert_eq!(
            state.transfer_ownership(OWNER, Address::ZERO),
            Err(SaleError::ZeroAddress)
        );
        state.transfer_ownership(OWNER, ALICE).unwrap();
        assert_eq!(state.owner(), ALICE);
        assert_eq!(
            state.set_max_mintable_per_address(OWNER, U256::from(1u64)),
            Err(SaleError::Unauthorized)
        );
    }
}
