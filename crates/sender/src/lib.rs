//! Lander Sender Library
//!
//! Runs the full lifecycle of a bundle: fetch a tip account and a blockhash,
//! assemble and sign the transactions, optionally simulate them, submit the
//! bundle to a relay and track it until it lands, fails or times out.
//!
//! The ledger and relay are reached through the traits in this crate, which
//! are implemented for [`RpcClient`] and [`RelayClient`].
//!
//! [`RpcClient`]: solana_client::nonblocking::rpc_client::RpcClient
//! [`RelayClient`]: lander_relay::RelayClient

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
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::{LedgerError, SendError};

mod impls;

mod sender;
pub use sender::{
    Balances, BundleReport, BundleSender, SendOptions, TokenBalance, TransferRequest,
};

mod traits;
pub use traits::{BundleSimulator, BundleSubmitter, BundleTracker, Ledger, TipSource};
