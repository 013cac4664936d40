use crate::{
    config::SIMULATION_URL,
    poll::{backoff_delay, next_wake},
    rpc::{error_payload, Request, Response, WithContext},
    types::{
        BundleDetail, BundleId, BundleState, BundleStatus, InflightBundleStatus, InflightStatus,
        SimulationOutcome,
    },
    ConfigError, RelayConfig, RelayError, Result,
};
use lander_bundle::{Bundle, TransactionEncoding};
use lander_constants::NetworkConstants;
use rand::seq::IndexedRandom;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use std::{collections::HashMap, time::Duration};
use tokio::time::{sleep_until, timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

/// The endpoints of the relay.
const BUNDLES: &str = "bundles";
const INFLIGHT_BUNDLE_STATUSES: &str = "getInflightBundleStatuses";

/// Header carrying the relay auth UUID.
const AUTH_HEADER: &str = "x-jito-auth";

/// Deadline used when `now + timeout` overflows.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Client for a block engine relay's JSON-RPC API.
///
/// Holds only endpoint configuration and a pooled HTTP client, so it is cheap
/// to clone and may track many bundles concurrently.
#[derive(Debug, Clone)]
pub struct RelayClient {
    /// Endpoints, auth and timings.
    config: RelayConfig,
    /// The reqwest client used to send requests.
    client: reqwest::Client,
}

impl RelayClient {
    /// Create a new client with the given config and HTTP client.
    ///
    /// The HTTP client's own timeout is used for every request.
    pub const fn new_with_client(config: RelayConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Create a new client with the given config. Every request is bounded by
    /// [`RelayConfig::request_timeout`].
    pub fn new(config: RelayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(RelayError::Client)?;
        Ok(Self::new_with_client(config, client))
    }

    /// Create a new client given a string URL, with default timings.
    pub fn new_from_string(url: &str) -> Result<Self> {
        Self::new(RelayConfig::from_url(url)?)
    }

    /// Connect to the mainnet relay.
    pub fn mainnet() -> Result<Self> {
        Self::new(RelayConfig::for_network(NetworkConstants::mainnet())?)
    }

    /// Connect to the testnet relay.
    pub fn testnet() -> Result<Self> {
        Self::new(RelayConfig::for_network(NetworkConstants::testnet())?)
    }

    /// Load the config from the environment and create a client.
    pub fn from_env() -> Result<Self> {
        Self::new(RelayConfig::from_env()?)
    }

    /// Get the client config.
    pub const fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Get the client used to send requests.
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn endpoint(&self, join: &'static str) -> Result<Url> {
        self.config
            .relay_url()
            .join(join)
            .inspect_err(|e| warn!(%e, "Failed to join URL. Not contacting relay."))
            .map_err(Into::into)
    }

    /// Make a JSON-RPC call, returning the result (if any) and the raw body.
    async fn call_inner<P, R>(
        &self,
        url: &Url,
        method: &'static str,
        params: P,
    ) -> Result<(Option<R>, String)>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let id = uuid::Uuid::new_v4().to_string();

        let mut request = self.client.post(url.clone()).json(&Request::new(&id, method, params));
        if let Some(auth) = self.config.auth_uuid() {
            request = request.header(AUTH_HEADER, auth);
        }

        let response = request
            .send()
            .await
            .inspect_err(|e| warn!(%e, method, "Failed to reach relay"))
            .map_err(|source| RelayError::Unavailable { source, body: None })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .inspect_err(|e| warn!(%e, method, "Failed to read relay response"))
            .map_err(|source| RelayError::Unavailable { source, body: None })?;

        if !status.is_success() {
            warn!(%status, method, "Relay returned an error status");
            return Err(RelayError::Rejected {
                status: Some(status),
                payload: error_payload(&body),
                body,
            });
        }

        let response: Response<R> = match serde_json::from_str(&body) {
            Ok(response) => response,
            Err(e) => {
                warn!(%e, method, "Failed to parse response from relay");
                return Err(RelayError::malformed(e.to_string(), body));
            }
        };

        if let Some(payload) = response.error {
            warn!(%payload, method, "Relay returned an error");
            return Err(RelayError::Rejected { status: None, payload: Some(payload), body });
        }

        if response.id.as_str() != Some(id.as_str()) {
            warn!(expected = %id, received = %response.id, method, "Relay response id mismatch");
            return Err(RelayError::malformed(
                format!("response id {} does not match request id {id}", response.id),
                body,
            ));
        }

        Ok((response.result, body))
    }

    /// Make a JSON-RPC call whose result must be present.
    async fn call<P, R>(&self, url: &Url, method: &'static str, params: P) -> Result<R>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let (result, body) = self.call_inner(url, method, params).await?;
        result.ok_or_else(|| {
            RelayError::malformed(format!("{method} response has no result"), body)
        })
    }

    /// Get the relay's tip accounts.
    ///
    /// Unparseable entries are skipped. Fails with [`RelayError::Malformed`]
    /// if none are usable.
    #[instrument(skip_all)]
    pub async fn get_tip_accounts(&self) -> Result<Vec<Pubkey>> {
        let url = self.endpoint(BUNDLES)?;
        let (raw, body) =
            self.call_inner::<_, Vec<String>>(&url, "getTipAccounts", [(); 0]).await?;

        let accounts: Vec<Pubkey> = raw
            .unwrap_or_default()
            .iter()
            .filter_map(|account| {
                account
                    .parse::<Pubkey>()
                    .inspect_err(|e| warn!(%e, %account, "Ignoring unparseable tip account"))
                    .ok()
            })
            .collect();

        if accounts.is_empty() {
            return Err(RelayError::malformed("no usable tip account", body));
        }
        Ok(accounts)
    }

    /// Get a tip account picked at random from the relay's pool.
    ///
    /// The pool is fetched on every call.
    #[instrument(skip_all)]
    pub async fn get_random_tip_account(&self) -> Result<Pubkey> {
        let accounts = self.get_tip_accounts().await?;
        let account = accounts
            .choose(&mut rand::rng())
            .copied()
            .ok_or_else(|| RelayError::malformed("no usable tip account", String::new()))?;
        debug!(%account, "Selected tip account");
        Ok(account)
    }

    /// Submit a bundle, returning the relay's bundle id.
    ///
    /// Acceptance only means the relay will try to land the bundle.
    #[instrument(skip_all, fields(txs = bundle.len()))]
    pub async fn send_bundle(&self, bundle: &Bundle) -> Result<BundleId> {
        self.send_encoded(bundle.encoding(), bundle.transactions()).await
    }

    /// Submit already-encoded transactions as a bundle.
    ///
    /// Fails with [`RelayError::EmptyBundle`] before any request is made if
    /// `transactions` is empty. The relay's bundle size limit is not checked
    /// here; the relay's rejection is returned instead.
    #[instrument(skip_all, fields(txs = transactions.len(), %encoding))]
    pub async fn send_encoded(
        &self,
        encoding: TransactionEncoding,
        transactions: &[String],
    ) -> Result<BundleId> {
        if transactions.is_empty() {
            return Err(RelayError::EmptyBundle);
        }

        let url = self.endpoint(BUNDLES)?;
        let params = match encoding {
            TransactionEncoding::Base58 => json!([transactions]),
            TransactionEncoding::Base64 => json!([transactions, { "encoding": encoding.as_str() }]),
        };

        let (bundle_id, body) = self.call_inner::<_, BundleId>(&url, "sendBundle", params).await?;
        match bundle_id {
            Some(bundle_id) if !bundle_id.is_empty() => {
                debug!(%bundle_id, "Bundle accepted by relay");
                Ok(bundle_id)
            }
            _ => Err(RelayError::malformed("sendBundle returned no bundle id", body)),
        }
    }

    /// Look up the in-flight status of bundles submitted in the last few
    /// minutes. Bundles the relay does not report are omitted.
    #[instrument(skip_all, fields(count = bundle_ids.len()))]
    pub async fn get_inflight_bundle_statuses(
        &self,
        bundle_ids: &[BundleId],
    ) -> Result<Vec<InflightBundleStatus>> {
        let url = self.endpoint(INFLIGHT_BUNDLE_STATUSES)?;
        let (result, _) = self
            .call_inner::<_, WithContext<Option<Vec<Option<InflightBundleStatus>>>>>(
                &url,
                "getInflightBundleStatuses",
                [bundle_ids],
            )
            .await?;

        Ok(result.and_then(|r| r.value).unwrap_or_default().into_iter().flatten().collect())
    }

    /// Look up the final status of bundles.
    ///
    /// The returned map has an entry for every requested id. Bundles the
    /// relay has not indexed yet map to an empty [`BundleDetail`].
    #[instrument(skip_all, fields(count = bundle_ids.len()))]
    pub async fn get_bundle_statuses(
        &self,
        bundle_ids: &[BundleId],
    ) -> Result<HashMap<BundleId, BundleDetail>> {
        let url = self.endpoint(BUNDLES)?;
        let (result, _) = self
            .call_inner::<_, WithContext<Option<Vec<Option<BundleDetail>>>>>(
                &url,
                "getBundleStatuses",
                [bundle_ids],
            )
            .await?;

        let mut details: HashMap<_, _> = result
            .and_then(|r| r.value)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(|detail| (detail.bundle_id.clone(), detail))
            .collect();

        for id in bundle_ids {
            details.entry(id.clone()).or_default();
        }
        Ok(details)
    }

    /// Poll the relay once, returning a non-terminal status if the bundle is
    /// still in flight.
    async fn poll_once(&self, bundle_id: &str) -> Result<BundleStatus> {
        let ids = [bundle_id.to_string()];
        let mut status = BundleStatus::new(bundle_id.to_string());

        let inflight = self.get_inflight_bundle_statuses(&ids).await?;
        let Some(entry) = inflight.into_iter().find(|entry| entry.bundle_id == bundle_id) else {
            debug!("Bundle not reported by relay yet");
            return Ok(status);
        };
        status.slot = entry.landed_slot;

        match entry.status {
            InflightStatus::Invalid => debug!("Bundle not tracked by relay yet"),
            InflightStatus::Pending => status.state = BundleState::Pending,
            InflightStatus::Failed => {
                status.state = BundleState::Failed;
                status.err = serde_json::to_value(&entry).ok();
            }
            InflightStatus::Landed => {
                let detail =
                    self.get_bundle_statuses(&ids).await?.remove(bundle_id).unwrap_or_default();
                if detail.is_empty() {
                    debug!("Bundle landed but is not indexed yet");
                    status.state = BundleState::Pending;
                } else {
                    let landed_slot = status.slot;
                    status = BundleStatus::from_detail(bundle_id.to_string(), detail);
                    status.slot = status.slot.or(landed_slot);
                }
            }
        }

        debug!(state = %status.state, slot = ?status.slot, "Polled bundle status");
        Ok(status)
    }

    /// Wait for a submitted bundle to confirm or fail, for at most `timeout`.
    ///
    /// See [`Self::confirm_inflight_bundle_with_cancel`].
    pub async fn confirm_inflight_bundle(
        &self,
        bundle_id: &str,
        timeout: Duration,
    ) -> Result<BundleStatus> {
        self.confirm_inflight_bundle_with_cancel(bundle_id, timeout, CancellationToken::new())
            .await
    }

    /// Wait for a submitted bundle to confirm or fail, for at most `timeout`
    /// or until `cancel` fires.
    ///
    /// Polls `getInflightBundleStatuses` every poll interval. Once the bundle
    /// lands, `getBundleStatuses` decides the outcome: `confirmed` or
    /// `finalized` commitment confirms it, an execution error fails it, and
    /// anything else keeps polling.
    ///
    /// Running out of time or being cancelled is not an error: the returned
    /// status is [`BundleState::TimedOut`], carrying the elapsed time and the
    /// last observed slot. A zero `timeout` returns immediately without
    /// contacting the relay.
    ///
    /// Transient failures back off exponentially, up to the configured
    /// maximum backoff. After the configured number of consecutive transient
    /// failures the last error is returned. Any other error reported by the
    /// relay fails the bundle: the returned status is [`BundleState::Failed`]
    /// with the HTTP status, JSON-RPC error and raw body in `err`. Local and
    /// malformed-response errors are returned immediately.
    #[instrument(skip_all, fields(%bundle_id, ?timeout))]
    pub async fn confirm_inflight_bundle_with_cancel(
        &self,
        bundle_id: &str,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<BundleStatus> {
        let start = Instant::now();
        let deadline = start.checked_add(timeout).unwrap_or_else(|| start + FAR_FUTURE);
        let mut status = BundleStatus::new(bundle_id.to_string());

        if timeout.is_zero() {
            debug!("Zero timeout. Not polling relay.");
            return Ok(status.into_timed_out(start.elapsed()));
        }

        let mut failures = 0u32;
        loop {
            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Confirmation cancelled");
                    return Ok(status.into_timed_out(start.elapsed()));
                }
                attempt = timeout_at(deadline, self.poll_once(bundle_id)) => attempt,
            };

            match attempt {
                Err(_) => {
                    debug!("Deadline elapsed while polling");
                    return Ok(status.into_timed_out(start.elapsed()));
                }
                Ok(Ok(mut observed)) => {
                    failures = 0;
                    if observed.state.is_terminal() {
                        observed.slot = observed.slot.or(status.slot);
                        observed.elapsed = start.elapsed();
                        debug!(
                            state = %observed.state,
                            slot = ?observed.slot,
                            "Bundle reached terminal state"
                        );
                        return Ok(observed);
                    }
                    if observed.state == BundleState::Pending {
                        status.state = BundleState::Pending;
                    }
                    status.slot = observed.slot.or(status.slot);
                }
                Ok(Err(e)) if e.is_transient() => {
                    failures += 1;
                    warn!(%e, failures, "Transient failure polling bundle status");
                    if failures >= self.config.max_poll_failures() {
                        return Err(e);
                    }
                }
                Ok(Err(RelayError::Rejected { status: http_status, payload, body })) => {
                    warn!(?http_status, %body, "Relay reported an error while polling");
                    status.state = BundleState::Failed;
                    status.err = Some(json!({
                        "status": http_status.map(|s| s.as_u16()),
                        "error": payload,
                        "body": body,
                    }));
                    status.elapsed = start.elapsed();
                    return Ok(status);
                }
                Ok(Err(e)) => {
                    warn!(%e, "Failed to poll bundle status");
                    return Err(e);
                }
            }

            let delay =
                backoff_delay(self.config.poll_interval(), failures, self.config.max_backoff());
            let wake = next_wake(Instant::now(), delay, deadline);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Confirmation cancelled");
                    return Ok(status.into_timed_out(start.elapsed()));
                }
                _ = sleep_until(wake) => {}
            }

            if Instant::now() >= deadline {
                debug!("Deadline elapsed");
                return Ok(status.into_timed_out(start.elapsed()));
            }
        }
    }

    /// Simulate a bundle against the configured simulation RPC.
    ///
    /// Fails with [`RelayError::Config`] if no simulation URL is configured.
    /// A failing bundle is reported in the returned outcome, not as an error.
    #[instrument(skip_all, fields(txs = bundle.len()))]
    pub async fn simulate_bundle(&self, bundle: &Bundle) -> Result<SimulationOutcome> {
        let url = self
            .config
            .simulation_url()
            .cloned()
            .ok_or_else(|| ConfigError::missing(SIMULATION_URL))?;

        let accounts = vec![Value::Null; bundle.len()];
        let params = json!([
            { "encodedTransactions": bundle.transactions() },
            {
                "preExecutionAccountsConfigs": accounts,
                "postExecutionAccountsConfigs": accounts,
                "transactionEncoding": bundle.encoding().as_str(),
                "skipSigVerify": false,
                "replaceRecentBlockhash": false
            }
        ]);

        let outcome: WithContext<SimulationOutcome> =
            self.call(&url, "simulateBundle", params).await?;
        if let Some(error) = outcome.value.error() {
            warn!(%error, "Bundle simulation failed");
        } else {
            debug!("Bundle simulation succeeded");
        }
        Ok(outcome.value)
    }
}
