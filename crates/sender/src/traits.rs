use crate::TokenBalance;
use core::{future::Future, time::Duration};
use lander_bundle::Bundle;
use lander_relay::{BundleDetail, BundleId, BundleStatus, SimulationOutcome};
use solana_sdk::{hash::Hash, pubkey::Pubkey};
use tokio_util::sync::CancellationToken;

/// Read access to the ledger.
///
/// Implementors provide the account balances and the recent blockhash that
/// transactions reference.
pub trait Ledger {
    /// The error type returned by ledger queries.
    type Error;

    /// Get the lamport balance of `owner`.
    fn get_balance(&self, owner: &Pubkey) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// Get the balance of the token account at `token_account`.
    fn get_token_balance(
        &self,
        token_account: &Pubkey,
    ) -> impl Future<Output = Result<TokenBalance, Self::Error>> + Send;

    /// Get the latest blockhash. Every transaction in a bundle shares one.
    fn get_latest_blockhash(&self) -> impl Future<Output = Result<Hash, Self::Error>> + Send;
}

/// A trait for choosing where a bundle's tip is paid.
pub trait TipSource {
    /// The error type returned by tip account lookups.
    type Error;

    /// Pick a tip account for one submission.
    ///
    /// Implementors should not cache the result across submissions.
    fn tip_account(&self) -> impl Future<Output = Result<Pubkey, Self::Error>> + Send;
}

/// A trait for submitting bundles to a relay.
pub trait BundleSubmitter {
    /// The error type returned by submission.
    type Error;

    /// Submit a bundle, returning the id the relay assigned to it.
    fn submit_bundle(
        &self,
        bundle: &Bundle,
    ) -> impl Future<Output = Result<BundleId, Self::Error>> + Send;
}

/// A trait for following a submitted bundle until it lands or fails.
pub trait BundleTracker {
    /// The error type returned by status lookups.
    type Error;

    /// Wait for the bundle to reach a terminal state, for at most `timeout`
    /// or until `cancel` fires.
    fn track_bundle(
        &self,
        bundle_id: &str,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<BundleStatus, Self::Error>> + Send;

    /// Fetch the final detail of a bundle. Returns an empty detail when the
    /// bundle is not indexed yet.
    fn bundle_detail(
        &self,
        bundle_id: &str,
    ) -> impl Future<Output = Result<BundleDetail, Self::Error>> + Send;
}

/// A trait for simulating a bundle before it is submitted.
pub trait BundleSimulator {
    /// The error type returned by simulation requests.
    type Error;

    /// Simulate the bundle. A failing bundle is reported in the outcome.
    fn simulate_bundle(
        &self,
        bundle: &Bundle,
    ) -> impl Future<Output = Result<SimulationOutcome, Self::Error>> + Send;
}
