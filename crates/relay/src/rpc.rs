//! JSON-RPC 2.0 envelopes.
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON-RPC error object, as returned by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorPayload {
    /// The error code.
    pub code: i64,
    /// The error message.
    pub message: String,
    /// Additional error data, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl core::fmt::Display for RpcErrorPayload {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Request<'a, P> {
    jsonrpc: &'static str,
    id: &'a str,
    method: &'static str,
    params: P,
}

impl<'a, P> Request<'a, P> {
    pub(crate) const fn new(id: &'a str, method: &'static str, params: P) -> Self {
        Self { jsonrpc: "2.0", id, method, params }
    }
}

/// A response envelope. `result` is `None` both when it is absent and when it
/// is `null`.
#[derive(Debug, Deserialize)]
pub(crate) struct Response<R> {
    #[serde(default)]
    pub(crate) id: Value,
    pub(crate) result: Option<R>,
    #[serde(default)]
    pub(crate) error: Option<RpcErrorPayload>,
}

/// The `{ context, value }` wrapper used by status and simulation results.
#[derive(Debug, Deserialize)]
pub(crate) struct WithContext<T> {
    pub(crate) value: T,
}

/// Parse a JSON-RPC error object out of a raw body, if it has one.
pub(crate) fn error_payload(body: &str) -> Option<RpcErrorPayload> {
    serde_json::from_str::<Response<Value>>(body).ok()?.error
}
