use alloy_primitives::Address;
use sale_primitives::AllowlistEntry;
use thiserror::Error;

/// Errors raised while compiling an allowlist or looking up proofs.
///
/// All of these are operator input problems: fix the list and rebuild.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The same address appears more than once in one allowlist round.
    #[error("duplicate allowlist address {address}")]
    DuplicateAddress {
        /// Address listed more than once.
        address: Address,
    },
    /// The exact `(address, allocation)` pair is not a leaf of the tree.
    #[error("entry {entry} is not part of the allowlist")]
    EntryNotFound {
        /// Entry that was looked up.
        entry: AllowlistEntry,
    },
    /// No entry for the address exists in the tree.
    #[error("address {address} is not part of the allowlist")]
    AddressNotFound {
        /// Address that was looked up.
        address: Address,
    },
    /// A tree needs at least one leaf to have a root.
    #[error("allowlist is empty")]
    EmptyAllowlist,
    /// The allowlist source could not be parsed.
    #[error("invalid allowlist source at {location}: {reason}")]
    Source {
        /// Line number or JSON index of the offending record.
        location: String,
        /// Parser message.
        reason: String,
    },
    /// The allowlist file could not be read.
    #[error("failed to read allowlist: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub(crate) fn invalid_source(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Source {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}
