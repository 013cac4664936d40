//! Lander Bundle Library
//!
//! Contains the bundle assembler, which builds the signed transactions of a
//! bundle around a single shared blockhash, and the [`Bundle`] type, which
//! encodes those transactions for submission to a relay.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod assemble;
pub use assemble::{
    associated_token_address, build_transfer_transaction, tip_instruction, TokenTransfer,
    Transfer,
};

mod bundle;
pub use bundle::{Bundle, TransactionEncoding};

mod error;
pub use error::{AssemblyError, DerivationFailure};
