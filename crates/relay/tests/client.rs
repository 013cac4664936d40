use lander_bundle::{build_transfer_transaction, Bundle, TransactionEncoding, Transfer};
use lander_constants::DEFAULT_MAX_POLL_FAILURES;
use lander_relay::{BundleState, RelayClient, RelayConfig, RelayError};
use lander_test_utils::{
    init_tracing,
    relay::{MockRelay, MockReply},
    test_constants::{TEST_BLOCKHASH, TEST_TIP_ACCOUNTS},
    users::{TEST_KEYPAIRS, TEST_USERS},
};
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const BUNDLE_ID: &str = "892b79ed49138bfb3aa5441f0df6e06ef34f9ee8f3976c15b323605bae0cf51d";

const TIMEOUT: Duration = Duration::from_secs(5);

fn bundle(encoding: TransactionEncoding) -> Bundle {
    let mut txs = build_transfer_transaction(
        &TEST_KEYPAIRS[0],
        &TEST_USERS[1],
        10_000,
        Transfer::Native,
        TEST_BLOCKHASH,
        None,
    )
    .unwrap();
    txs.extend(
        build_transfer_transaction(
            &TEST_KEYPAIRS[0],
            &TEST_USERS[2],
            20_000,
            Transfer::Native,
            TEST_BLOCKHASH,
            Some(&TEST_TIP_ACCOUNTS[0]),
        )
        .unwrap(),
    );
    Bundle::with_encoding(&txs, encoding).unwrap()
}

async fn setup() -> (MockRelay, RelayClient) {
    init_tracing();
    let relay = MockRelay::spawn().await;
    let client = relay.client();
    (relay, client)
}

#[tokio::test]
async fn tip_accounts() {
    let (relay, client) = setup().await;
    relay.push("getTipAccounts", MockReply::tip_accounts(&TEST_TIP_ACCOUNTS));

    assert_eq!(client.get_tip_accounts().await.unwrap(), TEST_TIP_ACCOUNTS.to_vec());

    let account = client.get_random_tip_account().await.unwrap();
    assert!(TEST_TIP_ACCOUNTS.contains(&account));

    let requests = relay.requests_for("getTipAccounts");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].endpoint, "bundles");
    assert_eq!(requests[0].params, json!([]));
    assert_eq!(requests[0].auth, None);
}

#[tokio::test]
async fn unparseable_tip_accounts_are_skipped() {
    let (relay, client) = setup().await;
    relay.push(
        "getTipAccounts",
        MockReply::Result(json!(["not-a-pubkey", TEST_TIP_ACCOUNTS[1].to_string()])),
    );
    assert_eq!(client.get_tip_accounts().await.unwrap(), vec![TEST_TIP_ACCOUNTS[1]]);

    let (relay, client) = setup().await;
    relay.push("getTipAccounts", MockReply::Result(json!(["not-a-pubkey"])));
    assert!(matches!(
        client.get_random_tip_account().await.unwrap_err(),
        RelayError::Malformed { .. }
    ));
}

#[tokio::test]
async fn send_base58_bundle() {
    let (relay, client) = setup().await;
    relay.push("sendBundle", MockReply::bundle_id(BUNDLE_ID));

    let bundle = bundle(TransactionEncoding::Base58);
    assert_eq!(bundle.len(), 3);
    assert_eq!(client.send_bundle(&bundle).await.unwrap(), BUNDLE_ID);

    let request = &relay.requests_for("sendBundle")[0];
    assert_eq!(request.endpoint, "bundles");
    assert_eq!(request.params, json!([bundle.transactions()]));
    assert!(!request.id.as_str().unwrap().is_empty());
}

#[tokio::test]
async fn send_base64_bundle() {
    let (relay, client) = setup().await;
    relay.push("sendBundle", MockReply::bundle_id(BUNDLE_ID));

    let bundle = bundle(TransactionEncoding::Base64);
    assert_eq!(client.send_bundle(&bundle).await.unwrap(), BUNDLE_ID);

    let request = &relay.requests_for("sendBundle")[0];
    assert_eq!(request.params, json!([bundle.transactions(), { "encoding": "base64" }]));
}

#[tokio::test]
async fn empty_bundle_is_not_sent() {
    let (relay, client) = setup().await;
    let err = client.send_encoded(TransactionEncoding::Base58, &[]).await.unwrap_err();
    assert!(matches!(err, RelayError::EmptyBundle));
    assert_eq!(relay.request_count(), 0);
}

#[tokio::test]
async fn rejected_bundle_keeps_payload() {
    let (relay, client) = setup().await;
    relay.push(
        "sendBundle",
        MockReply::RpcError { code: -32602, message: "bundle contains an expired blockhash".into() },
    );

    let err = client.send_bundle(&bundle(TransactionEncoding::Base58)).await.unwrap_err();
    let payload = err.payload().unwrap();
    assert_eq!(payload.code, -32602);
    assert_eq!(payload.message, "bundle contains an expired blockhash");
    assert!(err.body().unwrap().contains("expired blockhash"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn empty_bundle_id_is_malformed() {
    let (relay, client) = setup().await;
    relay.push("sendBundle", MockReply::bundle_id(""));
    let err = client.send_bundle(&bundle(TransactionEncoding::Base58)).await.unwrap_err();
    assert!(matches!(err, RelayError::Malformed { .. }));
}

#[tokio::test]
async fn mismatched_id_is_malformed() {
    let (relay, client) = setup().await;
    relay.push("getTipAccounts", MockReply::WrongId(json!([TEST_TIP_ACCOUNTS[0].to_string()])));
    let err = client.get_tip_accounts().await.unwrap_err();
    assert!(matches!(err, RelayError::Malformed { .. }));
    assert!(err.body().unwrap().contains("someone-else"));
}

#[tokio::test]
async fn unparseable_body_is_malformed() {
    let (relay, client) = setup().await;
    relay.push("sendBundle", MockReply::Raw("<html>gateway</html>".into()));
    let err = client.send_bundle(&bundle(TransactionEncoding::Base58)).await.unwrap_err();
    assert!(matches!(err, RelayError::Malformed { .. }));
    assert_eq!(err.body(), Some("<html>gateway</html>"));
}

#[tokio::test]
async fn unreachable_relay_is_transient() {
    init_tracing();
    let config = RelayConfig::from_url("http://127.0.0.1:1/api/v1/")
        .unwrap()
        .with_request_timeout(Duration::from_secs(1));
    let err = RelayClient::new(config).unwrap().get_tip_accounts().await.unwrap_err();
    assert!(matches!(err, RelayError::Unavailable { .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn auth_header_is_sent() {
    init_tracing();
    let relay = MockRelay::spawn().await;
    relay.push("getTipAccounts", MockReply::tip_accounts(&TEST_TIP_ACCOUNTS));

    let client = RelayClient::new(relay.config().with_auth_uuid("a0b1c2d3")).unwrap();
    client.get_tip_accounts().await.unwrap();

    assert_eq!(relay.requests()[0].auth.as_deref(), Some("a0b1c2d3"));
}

#[tokio::test]
async fn inflight_and_final_statuses() {
    let (relay, client) = setup().await;
    relay.push("getInflightBundleStatuses", MockReply::inflight(BUNDLE_ID, "Landed", Some(100)));
    relay.push("getBundleStatuses", MockReply::bundle_status(BUNDLE_ID, 100, "finalized", json!(null)));

    let ids = vec![BUNDLE_ID.to_string(), "unknown".to_string()];

    let inflight = client.get_inflight_bundle_statuses(&ids).await.unwrap();
    assert_eq!(inflight.len(), 1);
    assert_eq!(inflight[0].landed_slot, Some(100));

    let details = client.get_bundle_statuses(&ids).await.unwrap();
    assert_eq!(details.len(), 2);
    assert!(details[BUNDLE_ID].is_confirmed());
    assert!(details["unknown"].is_empty());

    assert_eq!(relay.requests_for("getInflightBundleStatuses")[0].endpoint, "getInflightBundleStatuses");
    assert_eq!(relay.requests_for("getBundleStatuses")[0].endpoint, "bundles");
    assert_eq!(relay.requests_for("getBundleStatuses")[0].params, json!([ids]));
}

#[tokio::test]
async fn unindexed_bundle_has_empty_detail() {
    let (relay, client) = setup().await;
    relay.push("getBundleStatuses", MockReply::no_bundle_status());

    let details = client.get_bundle_statuses(&[BUNDLE_ID.to_string()]).await.unwrap();
    assert!(details[BUNDLE_ID].is_empty());
}

#[tokio::test]
async fn confirm_pending_then_confirmed() {
    let (relay, client) = setup().await;
    relay
        .push("getInflightBundleStatuses", MockReply::inflight(BUNDLE_ID, "Pending", None))
        .push("getInflightBundleStatuses", MockReply::inflight(BUNDLE_ID, "Pending", None))
        .push("getInflightBundleStatuses", MockReply::inflight(BUNDLE_ID, "Landed", Some(280999028)));
    relay.push(
        "getBundleStatuses",
        MockReply::bundle_status(BUNDLE_ID, 280999028, "confirmed", json!({ "Ok": null })),
    );

    let status = client.confirm_inflight_bundle(BUNDLE_ID, TIMEOUT).await.unwrap();
    assert_eq!(status.state, BundleState::Confirmed);
    assert_eq!(status.bundle_id, BUNDLE_ID);
    assert_eq!(status.slot, Some(280999028));
    assert_eq!(status.err, None);
    assert_eq!(status.transactions.as_ref().map(Vec::len), Some(1));
    assert_eq!(relay.requests_for("getInflightBundleStatuses").len(), 3);
}

#[tokio::test]
async fn landed_but_unindexed_keeps_polling() {
    let (relay, client) = setup().await;
    relay.push("getInflightBundleStatuses", MockReply::inflight(BUNDLE_ID, "Landed", Some(77)));
    relay
        .push("getBundleStatuses", MockReply::no_bundle_status())
        .push("getBundleStatuses", MockReply::bundle_status(BUNDLE_ID, 77, "processed", json!(null)))
        .push("getBundleStatuses", MockReply::bundle_status(BUNDLE_ID, 77, "finalized", json!(null)));

    let status = client.confirm_inflight_bundle(BUNDLE_ID, TIMEOUT).await.unwrap();
    assert!(status.is_confirmed());
    assert_eq!(status.slot, Some(77));
    assert_eq!(relay.requests_for("getBundleStatuses").len(), 3);
}

#[tokio::test]
async fn execution_error_fails_bundle() {
    let (relay, client) = setup().await;
    let err = json!({ "InstructionError": [0, { "Custom": 1 }] });
    relay.push("getInflightBundleStatuses", MockReply::inflight(BUNDLE_ID, "Landed", Some(5)));
    relay.push("getBundleStatuses", MockReply::bundle_status(BUNDLE_ID, 5, "confirmed", err.clone()));

    let status = client.confirm_inflight_bundle(BUNDLE_ID, TIMEOUT).await.unwrap();
    assert!(status.is_failed());
    assert_eq!(status.err, Some(err));
    assert_eq!(status.slot, Some(5));
}

#[tokio::test]
async fn inflight_failure_fails_bundle() {
    let (relay, client) = setup().await;
    relay.push("getInflightBundleStatuses", MockReply::inflight(BUNDLE_ID, "Failed", None));

    let status = client.confirm_inflight_bundle(BUNDLE_ID, TIMEOUT).await.unwrap();
    assert!(status.is_failed());
    assert_eq!(status.err.unwrap()["status"], "Failed");
    assert!(relay.requests_for("getBundleStatuses").is_empty());
}

#[tokio::test]
async fn zero_timeout_makes_no_request() {
    let (relay, client) = setup().await;
    let status = client.confirm_inflight_bundle(BUNDLE_ID, Duration::ZERO).await.unwrap();
    assert!(status.is_timed_out());
    assert_eq!(relay.request_count(), 0);
}

#[tokio::test]
async fn pending_bundle_times_out() {
    let (relay, client) = setup().await;
    relay.push("getInflightBundleStatuses", MockReply::inflight(BUNDLE_ID, "Pending", Some(9)));

    let timeout = Duration::from_millis(150);
    let status = client.confirm_inflight_bundle(BUNDLE_ID, timeout).await.unwrap();
    assert!(status.is_timed_out());
    assert_eq!(status.slot, Some(9));
    assert!(status.elapsed >= timeout);
    assert!(relay.requests_for("getInflightBundleStatuses").len() > 1);
}

#[tokio::test]
async fn slow_relay_times_out() {
    let (relay, client) = setup().await;
    relay.push(
        "getInflightBundleStatuses",
        MockReply::inflight(BUNDLE_ID, "Landed", Some(1)).delayed(Duration::from_secs(1)),
    );

    let status = client.confirm_inflight_bundle(BUNDLE_ID, Duration::from_millis(100)).await.unwrap();
    assert!(status.is_timed_out());
    assert!(status.elapsed < Duration::from_secs(1));
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let (relay, client) = setup().await;
    relay
        .push("getInflightBundleStatuses", MockReply::Http { status: 503, body: "busy".into() })
        .push("getInflightBundleStatuses", MockReply::Http { status: 429, body: "slow down".into() })
        .push("getInflightBundleStatuses", MockReply::inflight(BUNDLE_ID, "Landed", Some(12)));
    relay.push("getBundleStatuses", MockReply::bundle_status(BUNDLE_ID, 12, "confirmed", json!(null)));

    let status = client.confirm_inflight_bundle(BUNDLE_ID, TIMEOUT).await.unwrap();
    assert!(status.is_confirmed());
    assert_eq!(relay.requests_for("getInflightBundleStatuses").len(), 3);
}

#[tokio::test]
async fn persistent_failures_are_surfaced() {
    let (relay, client) = setup().await;
    relay.push("getInflightBundleStatuses", MockReply::Http { status: 503, body: "overloaded".into() });

    let err = client.confirm_inflight_bundle(BUNDLE_ID, TIMEOUT).await.unwrap_err();
    assert!(matches!(err, RelayError::Rejected { status: Some(s), .. } if s.as_u16() == 503));
    assert_eq!(err.body(), Some("overloaded"));
    assert_eq!(
        relay.requests_for("getInflightBundleStatuses").len(),
        DEFAULT_MAX_POLL_FAILURES as usize
    );
}

#[tokio::test]
async fn relay_error_fails_bundle() {
    let (relay, client) = setup().await;
    relay.push(
        "getInflightBundleStatuses",
        MockReply::RpcError { code: -32000, message: "bundle expired".into() },
    );

    let status = client.confirm_inflight_bundle(BUNDLE_ID, TIMEOUT).await.unwrap();
    assert!(status.is_failed());
    assert_eq!(status.bundle_id, BUNDLE_ID);

    let err = status.err.unwrap();
    assert_eq!(err["error"]["code"], -32000);
    assert_eq!(err["error"]["message"], "bundle expired");
    assert_eq!(relay.request_count(), 1);
}

#[tokio::test]
async fn client_error_status_fails_bundle() {
    let (relay, client) = setup().await;
    relay
        .push("getInflightBundleStatuses", MockReply::inflight(BUNDLE_ID, "Pending", None))
        .push("getInflightBundleStatuses", MockReply::Http { status: 400, body: "bad request".into() });

    let status = client.confirm_inflight_bundle(BUNDLE_ID, TIMEOUT).await.unwrap();
    assert!(status.is_failed());

    let err = status.err.unwrap();
    assert_eq!(err["status"], 400);
    assert_eq!(err["body"], "bad request");
    assert_eq!(relay.request_count(), 2);
}

#[tokio::test]
async fn cancelled_confirmation_times_out() {
    let (relay, client) = setup().await;
    relay.push("getInflightBundleStatuses", MockReply::inflight(BUNDLE_ID, "Pending", None));

    let cancel = CancellationToken::new();
    cancel.cancel();
    let status =
        client.confirm_inflight_bundle_with_cancel(BUNDLE_ID, TIMEOUT, cancel).await.unwrap();
    assert!(status.is_timed_out());
    assert_eq!(relay.request_count(), 0);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });
    let status =
        client.confirm_inflight_bundle_with_cancel(BUNDLE_ID, TIMEOUT, cancel).await.unwrap();
    assert!(status.is_timed_out());
    assert_eq!(status.state, BundleState::TimedOut);
    assert!(status.elapsed < TIMEOUT);
}

#[tokio::test]
async fn concurrent_confirmations() {
    let (relay, client) = setup().await;
    relay.push("getInflightBundleStatuses", MockReply::inflight(BUNDLE_ID, "Landed", Some(3)));
    relay.push("getBundleStatuses", MockReply::bundle_status(BUNDLE_ID, 3, "confirmed", json!(null)));

    let other = client.clone();
    let (a, b) = tokio::join!(
        client.confirm_inflight_bundle(BUNDLE_ID, TIMEOUT),
        other.confirm_inflight_bundle(BUNDLE_ID, TIMEOUT),
    );
    assert!(a.unwrap().is_confirmed());
    assert!(b.unwrap().is_confirmed());
}

#[tokio::test]
async fn simulate_bundle() {
    let (relay, client) = setup().await;
    relay.push("simulateBundle", MockReply::simulation_succeeded(3));

    let bundle = bundle(TransactionEncoding::Base64);
    let outcome = client.simulate_bundle(&bundle).await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.transaction_results.len(), 3);
    assert_eq!(outcome.transaction_results[0].units_consumed, Some(150));

    let request = &relay.requests_for("simulateBundle")[0];
    assert_eq!(request.endpoint, "");
    assert_eq!(request.params[0]["encodedTransactions"], json!(bundle.transactions()));
    assert_eq!(request.params[1]["transactionEncoding"], "base64");
    assert_eq!(request.params[1]["preExecutionAccountsConfigs"], json!([null, null, null]));
}

#[tokio::test]
async fn failed_simulation_is_an_outcome() {
    let (relay, client) = setup().await;
    relay.push(
        "simulateBundle",
        MockReply::simulation_failed(json!({ "TransactionFailure": [[1], "insufficient funds"] }), "5sig"),
    );

    let outcome = client.simulate_bundle(&bundle(TransactionEncoding::Base58)).await.unwrap();
    assert!(!outcome.is_success());
    assert_eq!(outcome.error().unwrap()["TransactionFailure"][1], "insufficient funds");
}

#[tokio::test]
async fn simulation_requires_url() {
    init_tracing();
    let relay = MockRelay::spawn().await;
    let client = RelayClient::new(RelayConfig::from_url(&relay.url()).unwrap()).unwrap();

    let err = client.simulate_bundle(&bundle(TransactionEncoding::Base58)).await.unwrap_err();
    assert!(matches!(err, RelayError::Config(_)));
    assert_eq!(relay.request_count(), 0);
}
