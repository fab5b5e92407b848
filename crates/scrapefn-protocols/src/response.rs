//! Outbound response envelope with the fixed CORS header set.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};

/// Terminal response artifact returned to the hosting platform.
///
/// Serializes into the host's outbound shape (`statusCode`/`headers`/`body`).
/// Never mutated after construction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    /// Serialized JSON payload.
    pub body: String,
}

impl ResponseEnvelope {
    /// Wrap a JSON payload with the fixed header set.
    pub fn json(data: &Value, status_code: u16) -> Self {
        Self {
            status_code,
            headers: fixed_headers(),
            body: data.to_string(),
        }
    }

    /// Wrap a JSON payload with status 200.
    pub fn ok(data: &Value) -> Self {
        Self::json(data, 200)
    }

    /// Preflight acknowledgement, returned before any session is acquired.
    pub fn preflight() -> Self {
        Self::ok(&json!({"message": "Options", "status": "ok"}))
    }

    /// Uniform error envelope.
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self::json(
            &json!({"status": "error", "message": message.into()}),
            status_code,
        )
    }

    /// Unregistered-route response. A deliberate 404, not an error path.
    pub fn unknown_endpoint(path_segment: &str) -> Self {
        Self::error(404, format!("Unknown endpoint: {path_segment}"))
    }
}

/// The fixed header set attached to every response.
fn fixed_headers() -> HashMap<String, String> {
    [
        ("Content-Type", "application/json"),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "POST, OPTIONS"),
        ("Access-Control-Allow-Headers", "*"),
        ("Access-Control-Max-Age", "3600"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
