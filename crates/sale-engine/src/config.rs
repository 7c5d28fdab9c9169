//! Sale parameters and their loaders.

use crate::phase::PauseFlags;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::{env, str::FromStr};
use thiserror::Error;

/// Default supply of the issuance.
pub const DEFAULT_MAX_SUPPLY: u64 = 1_000;

/// Default per-address cap.
pub const DEFAULT_MAX_MINTABLE_PER_ADDRESS: u64 = 1_000;

/// Default unit price in whole ether, for both phases.
const DEFAULT_PRICE_ETHER: u64 = 500;

/// Wei per ether (10^18).
fn wei_per_ether() -> U256 {
    U256::from(10u64).pow(U256::from(18))
}

/// Default unit price: 500 ether, in wei.
pub fn default_price() -> U256 {
    U256::from(DEFAULT_PRICE_ETHER) * wei_per_ether()
}

/// Environment variable holding the owner address.
pub const ENV_OWNER: &str = "SALE_OWNER";
/// Environment variable holding the pre-sale unit price in wei.
pub const ENV_PRE_SALE_PRICE: &str = "SALE_PRE_SALE_PRICE";
/// Environment variable holding the public-sale unit price in wei.
pub const ENV_PUBLIC_SALE_PRICE: &str = "SALE_PUBLIC_SALE_PRICE";
/// Environment variable holding the maximum supply.
pub const ENV_MAX_SUPPLY: &str = "SALE_MAX_SUPPLY";
/// Environment variable holding the per-address cap.
pub const ENV_MAX_PER_ADDRESS: &str = "SALE_MAX_PER_ADDRESS";
/// Environment variable holding the initial allowlist root.
pub const ENV_ALLOWLIST_ROOT: &str = "SALE_ALLOWLIST_ROOT";

/// Initial parameters of a sale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleConfig {
    /// Address allowed to run owner-only operations.
    pub owner: Address,
    /// Unit price during the pre-sale, in wei.
    #[serde(default = "default_price")]
    pub pre_sale_price: U256,
    /// Unit price during the public sale, in wei.
    #[serde(default = "default_price")]
    pub public_sale_price: U256,
    /// Fixed supply of the issuance.
    #[serde(default = "default_max_supply")]
    pub max_supply: U256,
    /// Cap on units minted by one address across both phases.
    #[serde(default = "default_max_mintable_per_address")]
    pub max_mintable_per_address: U256,
    /// Initial allowlist commitment.
    #[serde(default)]
    pub allowlist_root: B256,
    /// Whether the pre-sale starts paused.
    #[serde(default)]
    pub pre_sale_paused: bool,
    /// Whether the public sale starts paused.
    #[serde(default = "default_true")]
    pub public_sale_paused: bool,
}

fn default_max_supply() -> U256 {
    U256::from(DEFAULT_MAX_SUPPLY)
}

fn default_max_mintable_per_address() -> U256 {
    U256::from(DEFAULT_MAX_MINTABLE_PER_ADDRESS)
}

const fn default_true() -> bool {
    true
}

impl Default for SaleConfig {
    /// Default configuration for testing only.
    ///
    /// # Warning
    ///
    /// The owner is `Address::ZERO`, which [`SaleConfig::validate`] rejects.
    /// Use [`SaleConfig::with_owner`] for real deployments.
    fn default() -> Self {
        let flags = PauseFlags::default();
        Self {
            owner: Address::ZERO,
            pre_sale_price: default_price(),
            public_sale_price: default_price(),
            max_supply: default_max_supply(),
            max_mintable_per_address: default_max_mintable_per_address(),
            allowlist_root: B256::ZERO,
            pre_sale_paused: flags.pre_sale_paused,
            public_sale_paused: flags.public_sale_paused,
        }
    }
}

impl SaleConfig {
    /// Default parameters owned by `owner`.
    pub fn with_owner(owner: Address) -> Self {
        Self {
            owner,
            ..Self::default()
        }
    }

    /// Pause flags described by this configuration.
    pub const fn pause_flags(&self) -> PauseFlags {
        PauseFlags {
            pre_sale_paused: self.pre_sale_paused,
            public_sale_paused: self.public_sale_paused,
        }
    }

    /// Checks the configuration can back a sale.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.is_zero() {
            return Err(ConfigError::ZeroOwner);
        }
        if self.max_supply.is_zero() {
            return Err(ConfigError::ZeroMaxSupply);
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from `SALE_*` environment variables.
    ///
    /// `SALE_OWNER` is required; every other variable falls back to the
    /// default when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| -> Result<Option<String>, ConfigError> {
            match lookup(var) {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => {
                    Err(ConfigError::EmptyEnv { var: var.into() })
                }
                Some(raw) => Ok(Some(raw.trim().to_string())),
            }
        };

        let owner = read(ENV_OWNER)?.ok_or_else(|| ConfigError::MissingEnv {
            var: ENV_OWNER.into(),
        })?;

        let mut config = Self::with_owner(parse_value(ENV_OWNER, &owner)?);
        if let Some(raw) = read(ENV_PRE_SALE_PRICE)? {
            config.pre_sale_price = parse_value(ENV_PRE_SALE_PRICE, &raw)?;
        }
        if let Some(raw) = read(ENV_PUBLIC_SALE_PRICE)? {
            config.public_sale_price = parse_value(ENV_PUBLIC_SALE_PRICE, &raw)?;
        }
        if let Some(raw) = read(ENV_MAX_SUPPLY)? {
            config.max_supply = parse_value(ENV_MAX_SUPPLY, &raw)?;
        }
        if let Some(raw) = read(ENV_MAX_PER_ADDRESS)? {
            config.max_mintable_per_address = parse_value(ENV_MAX_PER_ADDRESS, &raw)?;
        }
        if let Some(raw) = read(ENV_ALLOWLIST_ROOT)? {
            config.allowlist_root = parse_value(ENV_ALLOWLIST_ROOT, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(raw).map_err(|err| ConfigError::Invalid {
        var: var.into(),
        reason: err.to_string(),
    })
}

/// Errors that can occur while building a [`SaleConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("environment variable {var} is not set")]
    MissingEnv {
        /// Name of the missing variable.
        var: String,
    },
    /// An environment variable was empty or whitespace.
    #[error("environment variable {var} is empty")]
    EmptyEnv {
        /// Name of the empty variable.
        var: String,
    },
    /// A value could not be parsed.
    #[error("invalid value for {var}: {reason}")]
    Invalid {
        /// Variable or field name.
        var: String,
        /// Parser message.
        reason: String,
    },
    /// The owner is the zero address.
    #[error("sale owner cannot be the zero address")]
    ZeroOwner,
    /// The maximum supply is zero.
    #[error("max supply must be non-zero")]
    ZeroMaxSupply,
    /// The TOML document was malformed.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    /// The JSON document was malformed.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}
