//! Lander system constants.
//!
//! This crate contains the constants shared by the bundle assembler and the
//! relay client: the relay and ledger endpoints for each known network,
//! well-known mints, the minimum tip accepted by the relay, and the default
//! timings used when polling for bundle status.

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

mod chains;
pub use chains::{mainnet, testnet};

#[cfg(any(test, feature = "test-utils"))]
pub use chains::test_utils;

mod types;
pub use types::{KnownNetworks, NetworkConstants, ParseNetworkError};

use core::{fmt::Display, time::Duration};

/// Minimum tip, in lamports, that the relay accepts for a bundle.
///
/// Bundles tipping less than this are rejected by the relay, so the assembler
/// never pays below it.
pub const MINIMUM_TIP_LAMPORTS: u64 = 1_000;

/// Maximum number of transactions the relay accepts in a single bundle.
///
/// This is informational. The client passes larger bundles through and
/// surfaces the relay's own rejection.
pub const MAX_BUNDLE_TRANSACTIONS: usize = 5;

/// Default interval between two bundle status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Smallest interval between two bundle status polls. Shorter intervals are
/// raised to this value.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Default timeout applied to every individual relay request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default deadline for a bundle to reach a terminal state.
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(120);

/// Upper bound on the delay between two poll attempts after failures.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Consecutive failed poll attempts tolerated before giving up.
pub const DEFAULT_MAX_POLL_FAILURES: u32 = 5;

/// Prefix of the bundle explorer URL. The bundle id is appended.
pub const BUNDLE_EXPLORER_URL: &str = "https://explorer.jito.wtf/bundle/";

/// Prefix of the transaction explorer URL. The signature is appended.
pub const TX_EXPLORER_URL: &str = "https://solscan.io/tx/";

/// Explorer URL for a bundle id.
pub fn bundle_explorer_url(bundle_id: impl Display) -> String {
    format!("{BUNDLE_EXPLORER_URL}{bundle_id}")
}

/// Explorer URL for a transaction signature.
pub fn tx_explorer_url(signature: impl Display) -> String {
    format!("{TX_EXPLORER_URL}{signature}")
}
