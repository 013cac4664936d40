use crate::{BundleSimulator, BundleSubmitter, BundleTracker, Ledger, SendError, TipSource};
use core::time::Duration;
use lander_bundle::{
    associated_token_address, build_transfer_transaction, Bundle, TransactionEncoding, Transfer,
};
use lander_constants::{bundle_explorer_url, tx_explorer_url, DEFAULT_CONFIRM_TIMEOUT};
use lander_relay::{
    BundleDetail, BundleId, BundleStatus, RelayConfig, SimulationOutcome, SimulationSummary,
};
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, signer::Signer};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// A token balance in the smallest unit of its mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBalance {
    /// Raw amount.
    pub amount: u64,
    /// Decimals of the mint.
    pub decimals: u8,
}

impl TokenBalance {
    /// Create a new token balance.
    pub const fn new(amount: u64, decimals: u8) -> Self {
        Self { amount, decimals }
    }

    /// The amount in whole tokens, for display.
    pub fn ui_amount(&self) -> f64 {
        self.amount as f64 / 10f64.powi(self.decimals as i32)
    }
}

/// Balances of the sending wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balances {
    /// Lamport balance.
    pub lamports: u64,
    /// Balance of the wallet's associated token account, if a mint was given.
    pub token: Option<TokenBalance>,
}

/// One transfer in a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    /// The receiving wallet.
    pub receiver: Pubkey,
    /// The amount, in the smallest unit of the asset.
    pub amount: u64,
    /// The asset moved.
    pub transfer: Transfer,
}

impl TransferRequest {
    /// Create a new transfer request.
    pub const fn new(receiver: Pubkey, amount: u64, transfer: Transfer) -> Self {
        Self { receiver, amount, transfer }
    }
}

/// Options for configuring the [`BundleSender`].
#[derive(Debug, Clone, Copy)]
pub struct SendOptions {
    /// How long to wait for the bundle to land.
    pub confirm_timeout: Duration,
    /// The encoding used for submission.
    pub encoding: TransactionEncoding,
    /// Simulate the bundle before submitting it.
    pub simulate_first: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SendOptions {
    /// Create a new [`SendOptions`] with default values.
    pub const fn new() -> Self {
        Self {
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
            encoding: TransactionEncoding::Base58,
            simulate_first: false,
        }
    }

    /// Default options, simulating first if the relay config asks for it.
    pub const fn from_config(config: &RelayConfig) -> Self {
        Self::new().with_simulate_first(config.simulate_first())
    }

    /// Set the confirmation timeout.
    pub const fn with_confirm_timeout(mut self, timeout: Duration) -> Self {
        self.confirm_timeout = timeout;
        self
    }

    /// Set the transaction encoding.
    pub const fn with_encoding(mut self, encoding: TransactionEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Simulate bundles before submitting them.
    pub const fn with_simulate_first(mut self, simulate_first: bool) -> Self {
        self.simulate_first = simulate_first;
        self
    }
}

/// The outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    /// The id the relay assigned to the bundle.
    pub bundle_id: BundleId,
    /// The tracked status. Confirmed, failed or timed out.
    pub status: BundleStatus,
    /// The final detail, fetched once the bundle confirmed.
    pub detail: Option<BundleDetail>,
    /// Signatures of the bundle's transactions, in execution order.
    pub signatures: Vec<Signature>,
    /// Where the tip was paid.
    pub tip_account: Pubkey,
    /// The blockhash shared by the bundle's transactions.
    pub blockhash: Hash,
}

impl BundleReport {
    /// Explorer URL of the bundle.
    pub fn bundle_url(&self) -> String {
        bundle_explorer_url(&self.bundle_id)
    }

    /// Explorer URLs of the bundle's transactions.
    ///
    /// Uses the signatures reported by the relay when available.
    pub fn transaction_urls(&self) -> Vec<String> {
        match &self.detail {
            Some(detail) if !detail.transactions.is_empty() => {
                detail.transactions.iter().map(tx_explorer_url).collect()
            }
            _ => self.signatures.iter().map(tx_explorer_url).collect(),
        }
    }

    /// True if the bundle confirmed.
    pub const fn is_confirmed(&self) -> bool {
        self.status.is_confirmed()
    }
}

/// Assembles, submits and tracks bundles.
///
/// `BundleSender` is generic over:
/// - `Sign`: A [`Signer`] paying for and signing every transaction
/// - `L`: A [`Ledger`] for balances and blockhashes
/// - `R`: A relay, providing tip accounts, submission, tracking and simulation
#[derive(Debug, Clone)]
pub struct BundleSender<Sign, L, R> {
    signer: Sign,
    ledger: L,
    relay: R,
    options: SendOptions,
}

impl<Sign, L, R> BundleSender<Sign, L, R> {
    /// Create a new bundle sender instance.
    pub const fn new(signer: Sign, ledger: L, relay: R, options: SendOptions) -> Self {
        Self { signer, ledger, relay, options }
    }

    /// Get a reference to the signer.
    pub const fn signer(&self) -> &Sign {
        &self.signer
    }

    /// Get a reference to the ledger.
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Get a reference to the relay.
    pub const fn relay(&self) -> &R {
        &self.relay
    }

    /// Get the send options.
    pub const fn options(&self) -> &SendOptions {
        &self.options
    }
}

impl<Sign, L, R> BundleSender<Sign, L, R>
where
    Sign: Signer + Send + Sync,
    L: Ledger + Send + Sync,
    L::Error: core::error::Error + Send + Sync + 'static,
{
    /// Get the lamport balance of the signer and, if `mint` is given, the
    /// balance of its associated token account for that mint.
    #[instrument(skip_all)]
    pub async fn balances(&self, mint: Option<&Pubkey>) -> Result<Balances, SendError> {
        let owner = self.signer.try_pubkey().map_err(lander_bundle::AssemblyError::from)?;
        let lamports = self.ledger.get_balance(&owner).await.map_err(SendError::ledger)?;

        let token = match mint {
            Some(mint) => {
                let account = associated_token_address(&owner, mint, &spl_token::ID)?;
                Some(self.ledger.get_token_balance(&account).await.map_err(SendError::ledger)?)
            }
            None => None,
        };

        Ok(Balances { lamports, token })
    }
}

impl<Sign, L, R> BundleSender<Sign, L, R>
where
    Sign: Signer + Send + Sync,
    L: Ledger + Send + Sync,
    L::Error: core::error::Error + Send + Sync + 'static,
    R: TipSource + Send + Sync,
    R::Error: core::error::Error + Send + Sync + 'static,
{
    /// Fetch a tip account and a fresh blockhash, then build and encode the
    /// bundle. Only the last transfer carries the tip.
    #[instrument(skip_all, fields(transfers = transfers.len()))]
    pub async fn assemble(
        &self,
        transfers: &[TransferRequest],
    ) -> Result<(Bundle, Pubkey), SendError> {
        if transfers.is_empty() {
            return Err(SendError::NoTransfers);
        }

        let tip_account =
            self.relay.tip_account().await.map_err(|e| SendError::TipAccount(Box::new(e)))?;
        let blockhash = self.ledger.get_latest_blockhash().await.map_err(SendError::ledger)?;
        debug!(%tip_account, %blockhash, "Fetched tip account and blockhash");

        let last = transfers.len() - 1;
        let mut transactions = Vec::with_capacity(transfers.len() + 1);
        for (i, request) in transfers.iter().enumerate() {
            transactions.extend(build_transfer_transaction(
                &self.signer,
                &request.receiver,
                request.amount,
                request.transfer,
                blockhash,
                (i == last).then_some(&tip_account),
            )?);
        }

        let bundle = Bundle::with_encoding(&transactions, self.options.encoding)?;
        Ok((bundle, tip_account))
    }
}

impl<Sign, L, R> BundleSender<Sign, L, R>
where
    Sign: Signer + Send + Sync,
    L: Ledger + Send + Sync,
    L::Error: core::error::Error + Send + Sync + 'static,
    R: TipSource + BundleSimulator + Send + Sync,
    <R as TipSource>::Error: core::error::Error + Send + Sync + 'static,
    <R as BundleSimulator>::Error: core::error::Error + Send + Sync + 'static,
{
    /// Assemble the bundle and simulate it without submitting anything.
    #[instrument(skip_all, fields(transfers = transfers.len()))]
    pub async fn simulate_transfers(
        &self,
        transfers: &[TransferRequest],
    ) -> Result<SimulationOutcome, SendError> {
        let (bundle, _) = self.assemble(transfers).await?;
        self.simulate(&bundle).await
    }

    async fn simulate(&self, bundle: &Bundle) -> Result<SimulationOutcome, SendError> {
        self.relay.simulate_bundle(bundle).await.map_err(|e| SendError::Simulation(Box::new(e)))
    }
}

impl<Sign, L, R> BundleSender<Sign, L, R>
where
    Sign: Signer + Send + Sync,
    L: Ledger + Send + Sync,
    L::Error: core::error::Error + Send + Sync + 'static,
    R: TipSource + BundleSimulator + BundleSubmitter + BundleTracker + Send + Sync,
    <R as TipSource>::Error: core::error::Error + Send + Sync + 'static,
    <R as BundleSimulator>::Error: core::error::Error + Send + Sync + 'static,
    <R as BundleSubmitter>::Error: core::error::Error + Send + Sync + 'static,
    <R as BundleTracker>::Error: core::error::Error + Send + Sync + 'static,
{
    /// Run one full submission attempt and wait for the outcome.
    ///
    /// See [`Self::send_transfers_with_cancel`].
    pub async fn send_transfers(
        &self,
        transfers: &[TransferRequest],
    ) -> Result<BundleReport, SendError> {
        self.send_transfers_with_cancel(transfers, CancellationToken::new()).await
    }

    /// Run one full submission attempt: fetch a tip account and a blockhash,
    /// assemble the bundle, simulate it if configured, submit it, and track
    /// it until it confirms, fails, times out or `cancel` fires.
    ///
    /// A bundle that fails or times out is reported in the returned
    /// [`BundleReport`], not as an error. Retrying requires a new call, which
    /// fetches a fresh blockhash.
    #[instrument(skip_all, fields(transfers = transfers.len()))]
    pub async fn send_transfers_with_cancel(
        &self,
        transfers: &[TransferRequest],
        cancel: CancellationToken,
    ) -> Result<BundleReport, SendError> {
        let (bundle, tip_account) = self.assemble(transfers).await?;

        if self.options.simulate_first {
            let outcome = self.simulate(&bundle).await?;
            if let SimulationSummary::Failed { error, tx_signature } = outcome.summary {
                warn!(%error, "Simulation failed. Not submitting bundle.");
                return Err(SendError::SimulationFailed { error, tx_signature });
            }
        }

        let bundle_id = self
            .relay
            .submit_bundle(&bundle)
            .await
            .map_err(|e| SendError::Submission(Box::new(e)))?;
        info!(%bundle_id, txs = bundle.len(), "Bundle submitted");

        let status = self
            .relay
            .track_bundle(&bundle_id, self.options.confirm_timeout, cancel)
            .await
            .map_err(|e| SendError::Tracking { bundle_id: bundle_id.clone(), source: Box::new(e) })?;
        info!(%bundle_id, state = %status.state, slot = ?status.slot, "Bundle tracking finished");

        let detail = if status.is_confirmed() {
            match self.relay.bundle_detail(&bundle_id).await {
                Ok(detail) => Some(detail),
                Err(e) => {
                    warn!(%e, %bundle_id, "Failed to fetch bundle detail");
                    None
                }
            }
        } else {
            None
        };

        Ok(BundleReport {
            bundle_id,
            status,
            detail,
            signatures: bundle.signatures().to_vec(),
            tip_account,
            blockhash: bundle.blockhash(),
        })
    }
}
