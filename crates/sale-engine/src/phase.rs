//! Sale phases and pause flags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The sale mechanism accepting a mint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SalePhase {
    /// Restricted sale for allowlisted addresses, bounded by their allocation.
    PreSale,
    /// Open sale for any address.
    PublicSale,
}

impl fmt::Display for SalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreSale => f.write_str("pre-sale"),
            Self::PublicSale => f.write_str("public-sale"),
        }
    }
}

/// Target of an atomic phase transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SaleStage {
    /// Only the pre-sale is open.
    PreSale,
    /// Only the public sale is open.
    PublicSale,
    /// Both phases are paused.
    Closed,
}

impl From<SalePhase> for SaleStage {
    fn from(phase: SalePhase) -> Self {
        match phase {
            SalePhase::PreSale => Self::PreSale,
            SalePhase::PublicSale => Self::PublicSale,
        }
    }
}

/// The two independent pause flags.
///
/// Both phases may be open at once when the flags are set one at a time; the
/// pre-sale then takes precedence. [`PauseFlags::for_stage`] always yields a
/// combination with at most one open phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseFlags {
    /// Whether the pre-sale is paused.
    pub pre_sale_paused: bool,
    /// Whether the public sale is paused.
    pub public_sale_paused: bool,
}

impl Default for PauseFlags {
    /// Pre-sale open, public sale paused.
    fn default() -> Self {
        Self::for_stage(SaleStage::PreSale)
    }
}

impl PauseFlags {
    /// Flags that open exactly the phase named by `stage`.
    pub const fn for_stage(stage: SaleStage) -> Self {
        match stage {
            SaleStage::PreSale => Self {
                pre_sale_paused: false,
                public_sale_paused: true,
            },
            SaleStage::PublicSale => Self {
                pre_sale_paused: true,
                public_sale_paused: false,
            },
            SaleStage::Closed => Self {
                pre_sale_paused: true,
                public_sale_paused: true,
            },
        }
    }

    /// The phase a mint would run under right now.
    pub const fn active_phase(&self) -> Option<SalePhase> {
        if !self.pre_sale_paused {
            Some(SalePhase::PreSale)
        } else if !self.public_sale_paused {
            Some(SalePhase::PublicSale)
        } else {
            None
        }
    }

    /// The stage implied by [`Self::active_phase`].
    pub const fn stage(&self) -> SaleStage {
        match self.active_phase() {
            Some(SalePhase::PreSale) => SaleStage::PreSale,
            Some(SalePhase::PublicSale) => SaleStage::PublicSale,
            None => SaleStage::Closed,
        }
    }

    /// Returns the pause flag of `phase`.
    pub const fn is_paused(&self, phase: SalePhase) -> bool {
        match phase {
            SalePhase::PreSale => self.pre_sale_paused,
            SalePhase::PublicSale => self.public_sale_paused,
        }
    }

    /// Sets the pause flag of `phase`, leaving the other untouched.
    pub fn set_paused(&mut self, phase: SalePhase, paused: bool) {
        match phase {
            SalePhase::PreSale => self.pre_sale_paused = paused,
            SalePhase::PublicSale => self.public_sale_paused = paused,
        }
    }

    /// Flips between the two phases.
    ///
    /// A paused public sale is opened and the pre-sale paused; otherwise the
    /// pre-sale is opened and the public sale paused.
    pub const fn toggled(&self) -> Self {
        if self.public_sale_paused {
            Self::for_stage(SaleStage::PublicSale)
        } else {
            Self::for_stage(SaleStage::PreSale)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_sale_wins_when_both_open() {
        let flags = PauseFlags {
            pre_sale_paused: false,
            public_sale_paused: false,
        };
        assert_eq!(flags.active_phase(), Some(SalePhase::PreSale));
    }

    #[test]
    fn both_paused_is_closed() {
        let flags = PauseFlags::for_stage(SaleStage::Closed);
        assert_eq!(flags.active_phase(), None);
        assert_eq!(flags.stage(), SaleStage::Closed);
    }

    #[test]
    fn toggle_alternates_phases() {
        let pre = PauseFlags::default();
        let public = pre.toggled();
        assert_eq!(public.active_phase(), Some(SalePhase::PublicSale));
        assert!(public.pre_sale_paused);
        assert_eq!(public.toggled(), pre);
    }

    #[test]
    fn toggle_from_closed_opens_public_sale() {
        let closed = PauseFlags::for_stage(SaleStage::Closed);
        assert_eq!(closed.toggled().stage(), SaleStage::PublicSale);
    }

    #[test]
    fn set_paused_touches_one_flag() {
        let mut flags = PauseFlags::default();
        flags.set_paused(SalePhase::PublicSale, false);
        assert!(!flags.pre_sale_paused);
        assert!(!flags.public_sale_paused);
        assert!(!flags.is_paused(SalePhase::PublicSale));
    }
}
