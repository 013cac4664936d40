//! A scripted block engine relay, served over HTTP on localhost.
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use lander_relay::{RelayClient, RelayConfig};
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use std::{
    collections::{HashMap, VecDeque},
    net::{Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::debug;

/// Poll interval used by [`MockRelay::config`].
pub const TEST_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Maximum backoff used by [`MockRelay::config`].
pub const TEST_MAX_BACKOFF: Duration = Duration::from_millis(40);

/// A canned answer to one JSON-RPC request.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A successful response with this result.
    Result(Value),
    /// A JSON-RPC error response.
    RpcError {
        /// The error code.
        code: i64,
        /// The error message.
        message: String,
    },
    /// A non-JSON-RPC response with an HTTP status and raw body.
    Http {
        /// The HTTP status code.
        status: u16,
        /// The raw body.
        body: String,
    },
    /// A `200 OK` with a raw body.
    Raw(String),
    /// A successful response carrying someone else's request id.
    WrongId(Value),
    /// Another reply, sent after a delay.
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    /// A `getTipAccounts` result.
    pub fn tip_accounts(accounts: &[Pubkey]) -> Self {
        Self::Result(json!(accounts.iter().map(ToString::to_string).collect::<Vec<_>>()))
    }

    /// A `sendBundle` result.
    pub fn bundle_id(bundle_id: &str) -> Self {
        Self::Result(json!(bundle_id))
    }

    /// A `getInflightBundleStatuses` result with one entry.
    pub fn inflight(bundle_id: &str, status: &str, landed_slot: Option<u64>) -> Self {
        Self::Result(json!({
            "context": { "slot": 280999028 },
            "value": [{ "bundle_id": bundle_id, "status": status, "landed_slot": landed_slot }]
        }))
    }

    /// A `getBundleStatuses` result with one entry.
    pub fn bundle_status(bundle_id: &str, slot: u64, confirmation_status: &str, err: Value) -> Self {
        Self::Result(json!({
            "context": { "slot": slot + 10 },
            "value": [{
                "bundle_id": bundle_id,
                "transactions": ["3bC2M9fiACSjkTXZDgeNAuQ4ScTsdKGwR42ytFdhUvikqTmBheUxfsR1fDVsM5ADCMMspuwGkdm1uKbU246x5aE3"],
                "slot": slot,
                "confirmation_status": confirmation_status,
                "err": err
            }]
        }))
    }

    /// A `getBundleStatuses` result for a bundle that is not indexed yet.
    pub fn no_bundle_status() -> Self {
        Self::Result(json!({ "context": { "slot": 1 }, "value": [] }))
    }

    /// A `simulateBundle` result for a bundle of `txs` successful
    /// transactions.
    pub fn simulation_succeeded(txs: usize) -> Self {
        let result = json!({ "err": null, "logs": [], "unitsConsumed": 150 });
        Self::Result(json!({
            "context": { "slot": 1 },
            "value": { "summary": "succeeded", "transactionResults": vec![result; txs] }
        }))
    }

    /// A `simulateBundle` result for a failing bundle.
    pub fn simulation_failed(error: Value, tx_signature: &str) -> Self {
        Self::Result(json!({
            "context": { "slot": 1 },
            "value": {
                "summary": { "failed": { "error": error, "txSignature": tx_signature } },
                "transactionResults": []
            }
        }))
    }

    /// Send this reply after `delay`.
    pub fn delayed(self, delay: Duration) -> Self {
        Self::Delayed(delay, Box::new(self))
    }

    fn render(self, id: Value) -> Response {
        match self {
            Self::Result(result) => {
                Json(json!({ "jsonrpc": "2.0", "id": id, "result": result })).into_response()
            }
            Self::RpcError { code, message } => Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": code, "message": message }
            }))
            .into_response(),
            Self::Http { status, body } => {
                (StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), body)
                    .into_response()
            }
            Self::Raw(body) => (StatusCode::OK, body).into_response(),
            Self::WrongId(result) => {
                Json(json!({ "jsonrpc": "2.0", "id": "someone-else", "result": result }))
                    .into_response()
            }
            Self::Delayed(_, inner) => (*inner).render(id),
        }
    }
}

/// A request received by the [`MockRelay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// The path segment after `/api/v1/`, or empty for the root path.
    pub endpoint: String,
    /// The JSON-RPC method.
    pub method: String,
    /// The JSON-RPC params.
    pub params: Value,
    /// The request id.
    pub id: Value,
    /// The `x-jito-auth` header, if sent.
    pub auth: Option<String>,
}

#[derive(Debug, Default)]
struct Script {
    replies: HashMap<String, VecDeque<MockReply>>,
    requests: Vec<RecordedRequest>,
}

impl Script {
    /// Pop the next reply for `method`. The last reply is repeated forever.
    fn next_reply(&mut self, method: &str) -> Option<MockReply> {
        let queue = self.replies.get_mut(method)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

type SharedScript = Arc<Mutex<Script>>;

/// A JSON-RPC relay answering from a per-method script and recording every
/// request.
///
/// Serves the relay API under `/api/v1/` and a simulation RPC under `/`.
/// Unscripted methods get a "method not found" error. The server stops when
/// the mock is dropped.
#[derive(Debug)]
pub struct MockRelay {
    addr: SocketAddr,
    script: SharedScript,
    server: JoinHandle<()>,
}

impl Drop for MockRelay {
    fn drop(&mut self) {
        self.server.abort();
    }
}

impl MockRelay {
    /// Bind to a free localhost port and start serving.
    pub async fn spawn() -> Self {
        let script = SharedScript::default();
        let app = Router::new()
            .route("/", post(handle_root))
            .route("/api/v1/{endpoint}", post(handle_endpoint))
            .with_state(script.clone());

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, script, server }
    }

    /// The relay base URL.
    pub fn url(&self) -> String {
        format!("http://{}/api/v1/", self.addr)
    }

    /// The simulation RPC URL.
    pub fn simulation_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// A relay config pointing at this mock, with short poll intervals.
    pub fn config(&self) -> RelayConfig {
        RelayConfig::from_url(&self.url())
            .unwrap()
            .with_simulation_url(self.simulation_url().parse().unwrap())
            .with_poll_interval(TEST_POLL_INTERVAL)
            .with_max_backoff(TEST_MAX_BACKOFF)
            .with_request_timeout(Duration::from_secs(2))
    }

    /// A client for this mock, using [`Self::config`].
    pub fn client(&self) -> RelayClient {
        RelayClient::new(self.config()).unwrap()
    }

    /// Queue a reply for `method`. Replies are served in order, and the last
    /// one is repeated.
    pub fn push(&self, method: &str, reply: MockReply) -> &Self {
        self.script.lock().unwrap().replies.entry(method.to_string()).or_default().push_back(reply);
        self
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    /// All requests received so far for `method`.
    pub fn requests_for(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.method == method).collect()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.script.lock().unwrap().requests.len()
    }
}

async fn handle_root(
    State(script): State<SharedScript>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    respond(script, String::new(), headers, request).await
}

async fn handle_endpoint(
    State(script): State<SharedScript>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    respond(script, endpoint, headers, request).await
}

async fn respond(
    script: SharedScript,
    endpoint: String,
    headers: HeaderMap,
    request: Value,
) -> Response {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let auth = headers.get("x-jito-auth").and_then(|v| v.to_str().ok()).map(str::to_string);
    debug!(%endpoint, %method, "Mock relay received request");

    let reply = {
        let mut script = script.lock().unwrap();
        script.requests.push(RecordedRequest {
            endpoint,
            method: method.clone(),
            params: request["params"].clone(),
            id: id.clone(),
            auth,
        });
        script.next_reply(&method)
    };

    let mut reply = reply.unwrap_or(MockReply::RpcError {
        code: -32601,
        message: format!("Method not found: {method}"),
    });
    while let MockReply::Delayed(delay, inner) = reply {
        tokio::time::sleep(delay).await;
        reply = *inner;
    }
    reply.render(id)
}
