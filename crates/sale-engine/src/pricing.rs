//! Purchase cost policies.

use crate::{config::ConfigError, error::SaleError, phase::SalePhase};
use alloy_primitives::U256;
use std::fmt;

/// Basis-point denominator (100%).
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Computes what a mint of `quantity` units costs in a given phase.
///
/// Implementations must use checked arithmetic and report overflow as
/// [`SaleError::ArithmeticOverflow`].
pub trait PricingPolicy: fmt::Debug + Send + Sync + 'static {
    /// Cost of `quantity` units at `unit_price` during `phase`.
    fn cost(&self, phase: SalePhase, unit_price: U256, quantity: U256) -> Result<U256, SaleError>;
}

/// `unit_price * quantity` in every phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlatPricing;

impl PricingPolicy for FlatPricing {
    fn cost(&self, _phase: SalePhase, unit_price: U256, quantity: U256) -> Result<U256, SaleError> {
        unit_price
            .checked_mul(quantity)
            .ok_or(SaleError::ArithmeticOverflow)
    }
}

/// Flat pricing with a discount on large public-sale orders.
///
/// Orders of at least `threshold` units during the public sale pay
/// `flat - flat * discount_bps / 10_000`. Pre-sale orders are never discounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BulkPricing {
    threshold: U256,
    discount_bps: u16,
}

impl BulkPricing {
    /// Creates a bulk policy.
    ///
    /// Fails if `discount_bps` exceeds [`BPS_DENOMINATOR`].
    pub fn new(threshold: U256, discount_bps: u16) -> Result<Self, ConfigError> {
        if discount_bps > BPS_DENOMINATOR {
            return Err(ConfigError::Invalid {
                var: "discount_bps".into(),
                reason: format!("{discount_bps} exceeds {BPS_DENOMINATOR}"),
            });
        }
        Ok(Self {
            threshold,
            discount_bps,
        })
    }

    /// Minimum order size that receives the discount.
    pub const fn threshold(&self) -> U256 {
        self.threshold
    }

    /// Discount in basis points.
    pub const fn discount_bps(&self) -> u16 {
        self.discount_bps
    }
}

impl PricingPolicy for BulkPricing {
    fn cost(&self, phase: SalePhase, unit_price: U256, quantity: U256) -> Result<U256, SaleError> {
        let flat = FlatPricing.cost(phase, unit_price, quantity)?;
        if phase != SalePhase::PublicSale || quantity < self.threshold {
            return Ok(flat);
        }

        // floor(flat * bps / d) without a full-width product.
        let bps = U256::from(self.discount_bps);
        let denominator = U256::from(BPS_DENOMINATOR);
        let discount = flat / denominator * bps + flat % denominator * bps / denominator;
        Ok(flat - discount)
    }
}
