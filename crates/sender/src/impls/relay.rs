use crate::{BundleSimulator, BundleSubmitter, BundleTracker, TipSource};
use core::time::Duration;
use lander_bundle::Bundle;
use lander_relay::{
    BundleDetail, BundleId, BundleStatus, RelayClient, RelayError, SimulationOutcome,
};
use solana_sdk::pubkey::Pubkey;
use tokio_util::sync::CancellationToken;

impl TipSource for RelayClient {
    type Error = RelayError;

    async fn tip_account(&self) -> Result<Pubkey, Self::Error> {
        self.get_random_tip_account().await
    }
}

impl BundleSubmitter for RelayClient {
    type Error = RelayError;

    async fn submit_bundle(&self, bundle: &Bundle) -> Result<BundleId, Self::Error> {
        self.send_bundle(bundle).await
    }
}

impl BundleTracker for RelayClient {
    type Error = RelayError;

    async fn track_bundle(
        &self,
        bundle_id: &str,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<BundleStatus, Self::Error> {
        self.confirm_inflight_bundle_with_cancel(bundle_id, timeout, cancel).await
    }

    async fn bundle_detail(&self, bundle_id: &str) -> Result<BundleDetail, Self::Error> {
        let bundle_id = bundle_id.to_string();
        let mut details = self.get_bundle_statuses(core::slice::from_ref(&bundle_id)).await?;
        Ok(details.remove(&bundle_id).unwrap_or_default())
    }
}

impl BundleSimulator for RelayClient {
    type Error = RelayError;

    async fn simulate_bundle(&self, bundle: &Bundle) -> Result<SimulationOutcome, Self::Error> {
        RelayClient::simulate_bundle(self, bundle).await
    }
}
