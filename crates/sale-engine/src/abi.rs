//! Solidity ABI front end for the sale engine.
//!
//! The ledger hands each transaction over as a caller, an attached value and
//! raw calldata. [`SaleDispatcher`] decodes the calldata against
//! [`IAllowlistSale`], runs the matching engine operation and ABI-encodes the
//! return value.

use crate::{
    engine::SaleEngine,
    error::SaleError,
    pricing::{FlatPricing, PricingPolicy},
};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolInterface, SolValue};
use sale_primitives::Proof;

sol! {
    /// Allowlist sale interface
    interface IAllowlistSale {
        /// Mint `quantity` units, proving `(msg.sender, allocation)` during the pre-sale
        function mint(uint256 allocation, bytes32[] proof, uint256 quantity) external payable;

        /// Replace the allowlist commitment
        function setAllowlist(bytes32 root) external;

        /// Pause or resume the pre-sale
        function setPreSalePaused(bool paused) external;

        /// Pause or resume the public sale
        function setPublicSalePaused(bool paused) external;

        /// Set the pre-sale unit price in wei
        function setPreSalePrice(uint256 price) external;

        /// Set the public-sale unit price in wei
        function setPublicSalePrice(uint256 price) external;

        /// Set the per-address cap across both phases
        function setMaxMintablePerAddress(uint256 cap) external;

        /// Hand ownership to a new address
        function transferOwnership(address newOwner) external;

        /// Public-sale cost of `quantity` units
        function calculateCost(uint256 quantity) external view returns (uint256);

        function preSalePrice() external view returns (uint256);
        function publicSalePrice() external view returns (uint256);
        function maxSupply() external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function maxMintablePerAddress() external view returns (uint256);
        function preSalePaused() external view returns (bool);
        function publicSalePaused() external view returns (bool);
        function allowlistRoot() external view returns (bytes32);
        function numberMinted(address account) external view returns (uint256);
        function owner() external view returns (address);
    }
}

use IAllowlistSale::IAllowlistSaleCalls as Call;

/// One ledger transaction addressed to the sale.
#[derive(Clone, Copy, Debug)]
pub struct SaleCall<'a> {
    /// Sender of the transaction.
    pub caller: Address,
    /// Value attached to the transaction, in wei.
    pub value: U256,
    /// ABI calldata.
    pub data: &'a [u8],
}

/// Routes ABI calls to a [`SaleEngine`].
#[derive(Debug)]
pub struct SaleDispatcher<P = FlatPricing> {
    engine: SaleEngine<P>,
}

impl<P> Clone for SaleDispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl<P: PricingPolicy> SaleDispatcher<P> {
    /// Wraps `engine`.
    pub const fn new(engine: SaleEngine<P>) -> Self {
        Self { engine }
    }

    /// The engine behind this dispatcher.
    pub const fn engine(&self) -> &SaleEngine<P> {
        &self.engine
    }

    /// Decodes and executes one call, returning the ABI-encoded output.
    pub fn dispatch(&self, call: SaleCall<'_>) -> Result<Bytes, SaleError> {
        let SaleCall {
            caller,
            value,
            data,
        } = call;

        tracing::debug!(
            target: "sale_engine",
            ?caller,
            %value,
            calldata_len = data.len(),
            "sale call received"
        );

        let decoded =
            Call::abi_decode(data).map_err(|err| SaleError::InvalidCalldata(err.to_string()))?;

        if !matches!(decoded, Call::mint(_)) && !value.is_zero() {
            return Err(SaleError::NonPayable);
        }

        let engine = &self.engine;
        let output = match decoded {
            Call::mint(call) => {
                let proof = Proof::new(call.proof);
                engine.mint(caller, call.allocation, &proof, call.quantity, value)?;
                Bytes::new()
            }
            Call::setAllowlist(call) => {
                engine.set_allowlist(caller, call.root)?;
                Bytes::new()
            }
            Call::setPreSalePaused(call) => {
                engine.set_pre_sale_paused(caller, call.paused)?;
                Bytes::new()
            }
            Call::setPublicSalePaused(call) => {
                engine.set_public_sale_paused(caller, call.paused)?;
                Bytes::new()
            }
            Call::setPreSalePrice(call) => {
                engine.set_pre_sale_price(caller, call.price)?;
                Bytes::new()
            }
            Call::setPublicSalePrice(call) => {
                engine.set_public_sale_price(caller, call.price)?;
                Bytes::new()
            }
            Call::setMaxMintablePerAddress(call) => {
                engine.set_max_mintable_per_address(caller, call.cap)?;
                Bytes::new()
            }
            Call::transferOwnership(call) => {
                engine.transfer_ownership(caller, call.newOwner)?;
                Bytes::new()
            }
            Call::calculateCost(call) => engine.calculate_cost(call.quantity)?.abi_encode().into(),
            Call::preSalePrice(_) => engine.pre_sale_price().abi_encode().into(),
            Call::publicSalePrice(_) => engine.public_sale_price().abi_encode().into(),
            Call::maxSupply(_) => engine.max_supply().abi_encode().into(),
            Call::totalSupply(_) => engine.total_minted().abi_encode().into(),
            Call::maxMintablePerAddress(_) => engine.max_mintable_per_address().abi_encode().into(),
            Call::preSalePaused(_) => engine.pre_sale_paused().abi_encode().into(),
            Call::publicSalePaused(_) => engine.public_sale_paused().abi_encode().into(),
            Call::allowlistRoot(_) => engine.allowlist_root().abi_encode().into(),
            Call::numberMinted(call) => engine.minted_by(call.account).abi_encode().into(),
            Call::owner(_) => engine.owner().abi_encode().into(),
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SaleConfig;
    use alloy_primitives::{address, B256};
    use alloy_sol_types::SolCall;
    use sale_primitives::{hash_pair, leaf_hash};

    const OWNER: Address = address!("0x00000000000000000000000000000000000000a0");
    const ALICE: Address = address!("0x00000000000000000000000000000000000000a1");
    const BOB: Address = address!("0x00000000000000000000000000000000000000b1");

    fn setup() -> (SaleDispatcher, B256) {
        let alice_leaf = leaf_hash(ALICE, U256::from(2u64));
        let bob_leaf = leaf_hash(BOB, U256::from(1u64));
        let mut config = SaleConfig::with_owner(OWNER);
        config.pre_sale_price = U256::from(500u64);
        config.public_sale_price = U256::from(700u64);
        config.allowlist_root = hash_pair(alice_leaf, bob_leaf);
        let engine = SaleEngine::new(config).expect("valid config");
        (SaleDispatcher::new(engine), bob_leaf)
    }

    fn run_call(
        dispatcher: &SaleDispatcher,
        caller: Address,
        value: U256,
        data: &[u8],
    ) -> Result<Bytes, SaleError> {
        dispatcher.dispatch(SaleCall {
            caller,
            value,
            data,
        })
    }

    #[test]
    fn pre_sale_mint_through_calldata() {
        let (dispatcher, bob_leaf) = setup();
        let calldata = IAllowlistSale::mintCall {
            allocation: U256::from(2u64),
            proof: vec![bob_leaf],
            quantity: U256::from(2u64),
        }
        .abi_encode();

        let output = run_call(&dispatcher, ALICE, U256::from(1000u64), &calldata)
            .expect("mint should succeed");
        assert!(output.is_empty());

        let query = IAllowlistSale::numberMintedCall { account: ALICE }.abi_encode();
        let output = run_call(&dispatcher, BOB, U256::ZERO, &query).expect("view succeeds");
        let minted = U256::abi_decode(&output).expect("decode result");
        assert_eq!(minted, U256::from(2u64));
    }

    #[test]
    fn unauthorized_caller_cannot_set_allowlist() {
        let (dispatcher, _) = setup();
        let calldata = IAllowlistSale::setAllowlistCall { root: B256::ZERO }.abi_encode();

        match run_call(&dispatcher, ALICE, U256::ZERO, &calldata) {
            Err(err) => assert_eq!(err.to_string(), "unauthorized caller"),
            other => panic!("expected unauthorized error, got {other:?}"),
        }
    }

    #[test]
    fn value_on_non_payable_call_is_rejected() {
        let (dispatcher, _) = setup();
        let calldata = IAllowlistSale::setPreSalePausedCall { paused: true }.abi_encode();
        let result = run_call(&dispatcher, OWNER, U256::from(1u64), &calldata);
        assert_eq!(result, Err(SaleError::NonPayable));
        assert!(!dispatcher.engine().pre_sale_paused(), "rejected call must not apply");
    }

    #[test]
    fn calculate_cost_uses_public_price() {
        let (dispatcher, _) = setup();
        let calldata = IAllowlistSale::calculateCostCall {
            quantity: U256::from(3u64),
        }
        .abi_encode();
        let output = run_call(&dispatcher, BOB, U256::ZERO, &calldata).expect("view succeeds");
        assert_eq!(U256::abi_decode(&output).unwrap(), U256::from(2100u64));
    }

    #[test]
    fn pause_queries_reflect_owner_toggles() {
        let (dispatcher, _) = setup();
        for calldata in [
            IAllowlistSale::setPublicSalePausedCall { paused: false }.abi_encode(),
            IAllowlistSale::setPreSalePausedCall { paused: true }.abi_encode(),
        ] {
            run_call(&dispatcher, OWNER, U256::ZERO, &calldata).expect("owner toggle");
        }

        let output = run_call(
            &dispatcher,
            BOB,
            U256::ZERO,
            &IAllowlistSale::publicSalePausedCall {}.abi_encode(),
        )
        .unwrap();
        assert!(!bool::abi_decode(&output).unwrap());

        let calldata = IAllowlistSale::mintCall {
            allocation: U256::ZERO,
            proof: Vec::new(),
            quantity: U256::from(1u64),
        }
        .abi_encode();
        run_call(&dispatcher, BOB, U256::from(700u64), &calldata)
            .expect("public mint needs no proof");
        let output = run_call(
            &dispatcher,
            BOB,
            U256::ZERO,
            &IAllowlistSale::totalSupplyCall {}.abi_encode(),
        )
        .unwrap();
        assert_eq!(U256::abi_decode(&output).unwrap(), U256::from(1u64));
    }

    #[test]
    fn owner_and_root_queries() {
        let (dispatcher, _) = setup();
        let output = run_call(
            &dispatcher,
            BOB,
            U256::ZERO,
            &IAllowlistSale::ownerCall {}.abi_encode(),
        )
        .unwrap();
        assert_eq!(Address::abi_decode(&output).unwrap(), OWNER);

        let output = run_call(
            &dispatcher,
            BOB,
            U256::ZERO,
            &IAllowlistSale::allowlistRootCall {}.abi_encode(),
        )
        .unwrap();
        assert_eq!(
            B256::abi_decode(&output).unwrap(),
            dispatcher.engine().allowlist_root()
        );
    }

    #[test]
    fn invalid_calldata_returns_error() {
        let (dispatcher, _) = setup();
        let result = run_call(&dispatcher, OWNER, U256::ZERO, b"not_valid_abi_data");
        assert!(matches!(result, Err(SaleError::InvalidCalldata(_))));
    }
}
