use lander_bundle::AssemblyError;
use serde_json::Value;
use solana_client::client_error::ClientError;
use solana_sdk::pubkey::Pubkey;

/// Errors returned by the [`Ledger`] implementation for [`RpcClient`].
///
/// [`Ledger`]: crate::Ledger
/// [`RpcClient`]: solana_client::nonblocking::rpc_client::RpcClient
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The RPC request failed.
    #[error("ledger rpc error: {0}")]
    Rpc(#[from] Box<ClientError>),
    /// The RPC returned a token amount that is not an integer.
    #[error("invalid token amount {amount:?} for account {account}")]
    InvalidAmount {
        /// The token account.
        account: Pubkey,
        /// The amount as returned by the RPC.
        amount: String,
    },
}

impl From<ClientError> for LedgerError {
    fn from(err: ClientError) -> Self {
        Self::Rpc(Box::new(err))
    }
}

/// Errors returned by [`BundleSender`].
///
/// [`BundleSender`]: crate::BundleSender
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SendError {
    /// No transfers were given.
    #[error("no transfers to bundle")]
    NoTransfers,
    /// The bundle could not be assembled.
    #[error("failed to assemble bundle: {0}")]
    Assembly(#[from] AssemblyError),
    /// The ledger could not be queried.
    #[error("ledger error: {0}")]
    Ledger(#[source] Box<dyn core::error::Error + Send + Sync>),
    /// No tip account could be obtained.
    #[error("failed to get tip account: {0}")]
    TipAccount(#[source] Box<dyn core::error::Error + Send + Sync>),
    /// The simulation request failed.
    #[error("failed to simulate bundle: {0}")]
    Simulation(#[source] Box<dyn core::error::Error + Send + Sync>),
    /// The bundle would fail. Nothing was submitted.
    #[error("bundle simulation failed: {error}")]
    SimulationFailed {
        /// The bundle execution error, verbatim.
        error: Value,
        /// Signature of the offending transaction, if known.
        tx_signature: Option<String>,
    },
    /// The relay did not accept the bundle.
    #[error("failed to submit bundle: {0}")]
    Submission(#[source] Box<dyn core::error::Error + Send + Sync>),
    /// The bundle status could not be tracked.
    #[error("failed to track bundle {bundle_id}: {source}")]
    Tracking {
        /// The id of the submitted bundle.
        bundle_id: String,
        /// The tracking error.
        #[source]
        source: Box<dyn core::error::Error + Send + Sync>,
    },
}

impl SendError {
    pub(crate) fn ledger(error: impl core::error::Error + Send + Sync + 'static) -> Self {
        Self::Ledger(Box::new(error))
    }
}
