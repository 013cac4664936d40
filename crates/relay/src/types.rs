use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// A bundle id, as returned by `sendBundle`.
pub type BundleId = String;

/// Status of a bundle that the relay is still tracking, as reported by
/// `getInflightBundleStatuses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InflightStatus {
    /// Unknown to the relay, or no longer tracked.
    Invalid,
    /// Not yet failed, landed, or invalid.
    Pending,
    /// All leader slots passed without the bundle landing.
    Failed,
    /// Landed on-chain.
    Landed,
}

/// An entry of a `getInflightBundleStatuses` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflightBundleStatus {
    /// The bundle id.
    pub bundle_id: BundleId,
    /// The relay's view of the bundle.
    pub status: InflightStatus,
    /// The slot the bundle landed in, if it landed.
    #[serde(default)]
    pub landed_slot: Option<u64>,
}

/// Commitment level reported for a landed bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationStatus {
    /// Processed by a leader but not yet voted on.
    Processed,
    /// Voted on by a supermajority.
    Confirmed,
    /// Rooted.
    Finalized,
}

/// Final per-bundle outcome, as reported by `getBundleStatuses`.
///
/// The default value is the "empty" detail returned for bundles the relay has
/// not indexed yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDetail {
    /// The bundle id.
    #[serde(default)]
    pub bundle_id: BundleId,
    /// Signatures of the transactions in the bundle.
    #[serde(default)]
    pub transactions: Vec<String>,
    /// The slot the bundle landed in.
    #[serde(default)]
    pub slot: Option<u64>,
    /// The commitment level reached.
    #[serde(default)]
    pub confirmation_status: Option<ConfirmationStatus>,
    /// The execution result, verbatim. `{"Ok": null}` means success.
    #[serde(default)]
    pub err: Option<Value>,
}

impl BundleDetail {
    /// True if the relay had nothing to say about this bundle.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
            && self.slot.is_none()
            && self.confirmation_status.is_none()
            && self.err.is_none()
    }

    /// The execution error, if the bundle failed.
    ///
    /// Both a missing `err` and the success marker `{"Ok": null}` count as no
    /// error.
    pub fn failure(&self) -> Option<&Value> {
        self.err.as_ref().filter(|err| !is_success_marker(err))
    }

    /// True if the bundle reached `confirmed` or `finalized` without error.
    pub fn is_confirmed(&self) -> bool {
        matches!(
            self.confirmation_status,
            Some(ConfirmationStatus::Confirmed | ConfirmationStatus::Finalized)
        ) && self.failure().is_none()
    }
}

fn is_success_marker(err: &Value) -> bool {
    match err {
        Value::Null => true,
        Value::Object(map) => map.len() == 1 && map.get("Ok").is_some_and(Value::is_null),
        _ => false,
    }
}

/// Lifecycle state of a submitted bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleState {
    /// Not yet seen by the relay.
    #[default]
    Unknown,
    /// Seen by the relay, not yet terminal.
    Pending,
    /// Landed at `confirmed` or `finalized` commitment.
    Confirmed,
    /// The relay reported an error, or a transaction in the bundle failed.
    Failed,
    /// The deadline elapsed first.
    TimedOut,
}

impl BundleState {
    /// True for [`Self::Confirmed`], [`Self::Failed`] and [`Self::TimedOut`].
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed | Self::TimedOut)
    }
}

impl core::fmt::Display for BundleState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
            Self::TimedOut => "timed-out",
        })
    }
}

/// The outcome of tracking a bundle.
///
/// Serializes to `{ confirmation_status, slot?, err?, transactions? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleStatus {
    /// The bundle id.
    #[serde(skip)]
    pub bundle_id: BundleId,
    /// The lifecycle state.
    #[serde(rename = "confirmation_status")]
    pub state: BundleState,
    /// The slot the bundle landed in, or the last slot observed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<u64>,
    /// The failure reason, verbatim from the relay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<Value>,
    /// Signatures of the transactions in the bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<String>>,
    /// Time spent tracking the bundle.
    #[serde(skip)]
    pub elapsed: Duration,
}

impl BundleStatus {
    /// A status in the [`BundleState::Unknown`] state.
    pub const fn new(bundle_id: BundleId) -> Self {
        Self {
            bundle_id,
            state: BundleState::Unknown,
            slot: None,
            err: None,
            transactions: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Build a status from a `getBundleStatuses` detail.
    pub(crate) fn from_detail(bundle_id: BundleId, detail: BundleDetail) -> Self {
        let state = if detail.failure().is_some() {
            BundleState::Failed
        } else if detail.is_confirmed() {
            BundleState::Confirmed
        } else {
            BundleState::Pending
        };
        let transactions = (!detail.transactions.is_empty()).then_some(detail.transactions);
        let err = if state == BundleState::Failed { detail.err } else { None };

        Self { bundle_id, state, slot: detail.slot, err, transactions, elapsed: Duration::ZERO }
    }

    /// Mark the status timed out after `elapsed`, keeping the last observed
    /// slot.
    pub(crate) fn into_timed_out(mut self, elapsed: Duration) -> Self {
        self.state = BundleState::TimedOut;
        self.elapsed = elapsed;
        self
    }

    /// True if the bundle confirmed.
    pub const fn is_confirmed(&self) -> bool {
        matches!(self.state, BundleState::Confirmed)
    }

    /// True if the bundle failed.
    pub const fn is_failed(&self) -> bool {
        matches!(self.state, BundleState::Failed)
    }

    /// True if the deadline elapsed first.
    pub const fn is_timed_out(&self) -> bool {
        matches!(self.state, BundleState::TimedOut)
    }
}

/// Summary of a `simulateBundle` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimulationSummary {
    /// A transaction in the bundle failed.
    Failed {
        /// The bundle execution error, verbatim.
        error: Value,
        /// Signature of the offending transaction, if known.
        #[serde(default, rename = "txSignature")]
        tx_signature: Option<String>,
    },
    /// Every transaction executed successfully.
    Succeeded,
}

/// Result of simulating a single transaction of a bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedTransaction {
    /// The transaction error, if it failed.
    #[serde(default)]
    pub err: Option<Value>,
    /// Program logs.
    #[serde(default)]
    pub logs: Option<Vec<String>>,
    /// Compute units consumed.
    #[serde(default)]
    pub units_consumed: Option<u64>,
}

/// Result of `simulateBundle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    /// Whether the bundle would succeed.
    pub summary: SimulationSummary,
    /// Per-transaction results, in bundle order.
    #[serde(default)]
    pub transaction_results: Vec<SimulatedTransaction>,
}

impl SimulationOutcome {
    /// True if every transaction in the bundle would succeed.
    pub const fn is_success(&self) -> bool {
        matches!(self.summary, SimulationSummary::Succeeded)
    }

    /// The bundle execution error, if simulation failed.
    pub const fn error(&self) -> Option<&Value> {
        match &self.summary {
            SimulationSummary::Failed { error, .. } => Some(error),
            SimulationSummary::Succeeded => None,
        }
    }
}
