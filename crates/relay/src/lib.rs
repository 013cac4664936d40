//! Lander relay client.
//!
//! A JSON-RPC client for a block engine relay. It fetches tip accounts,
//! submits encoded bundles, polls their status until they land, fail or run
//! out of time, fetches the final per-transaction outcome, and can simulate a
//! bundle against a bundle-aware ledger RPC before it is sent.
//!
//! Running out of time is a result, not an error: [`RelayClient::confirm_inflight_bundle`]
//! returns a [`BundleStatus`] in the [`BundleState::TimedOut`] state when the
//! deadline elapses.

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

mod client;
pub use client::RelayClient;

/// Relay configuration, loadable from the environment.
pub mod config;
pub use config::{ConfigError, RelayConfig};

mod error;
pub use error::{RelayError, Result};

mod poll;

mod rpc;
pub use rpc::RpcErrorPayload;

/// Request and response types for the relay.
pub mod types;
pub use types::{
    BundleDetail, BundleId, BundleState, BundleStatus, ConfirmationStatus, InflightBundleStatus,
    InflightStatus, SimulationOutcome, SimulationSummary,
};
