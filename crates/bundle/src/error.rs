use solana_sdk::{hash::Hash, program_error::ProgramError, pubkey::Pubkey, signer::SignerError};

/// Reasons an associated token address cannot be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DerivationFailure {
    /// The owner is a program address, and off-curve owners were not allowed.
    #[error("owner is not on the ed25519 curve")]
    OwnerOffCurve,
    /// No bump seed produced a valid program address.
    #[error("no viable bump seed")]
    NoViableBump,
}

/// Errors that can occur while assembling or encoding a bundle.
///
/// These are local and not retryable without new inputs.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    /// Transfer amounts must be positive.
    #[error("transfer amount must be positive")]
    ZeroAmount,

    /// The associated token address of a party could not be derived.
    #[error("cannot derive associated token address for owner {owner} and mint {mint}: {reason}")]
    AddressDerivation {
        /// The account owner.
        owner: Pubkey,
        /// The token mint.
        mint: Pubkey,
        /// Why derivation failed.
        reason: DerivationFailure,
    },

    /// The signer could not sign the transaction.
    #[error("failed to sign transaction: {0}")]
    Signing(#[from] SignerError),

    /// The transfer instruction could not be built.
    #[error("failed to build transfer instruction: {0}")]
    Instruction(#[from] ProgramError),

    /// Bundles must contain at least one transaction.
    #[error("bundle must contain at least one transaction")]
    EmptyBundle,

    /// A transaction in the bundle is missing signatures.
    #[error("transaction {index} is not fully signed")]
    Unsigned {
        /// Index of the transaction in the bundle.
        index: usize,
    },

    /// A transaction references a different blockhash than the rest of the
    /// bundle.
    #[error("transaction {index} uses blockhash {found}, bundle uses {expected}")]
    MixedBlockhash {
        /// Index of the offending transaction in the bundle.
        index: usize,
        /// The blockhash of the first transaction.
        expected: Hash,
        /// The blockhash of the offending transaction.
        found: Hash,
    },

    /// Transaction serialization failed.
    #[error("failed to serialize transaction: {0}")]
    Serialize(#[from] bincode::Error),

    /// An encoded transaction could not be decoded.
    #[error("failed to decode transaction {index}: {reason}")]
    Decode {
        /// Index of the transaction in the bundle.
        index: usize,
        /// Decoder error message.
        reason: String,
    },
}
