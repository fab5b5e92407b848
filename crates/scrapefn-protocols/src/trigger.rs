//! Inbound trigger envelope and request normalization.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Raw inbound event delivered by the hosting platform.
///
/// Two envelope shapes exist: the legacy gateway shape carries `httpMethod`
/// and `path` at the top level, while the native function-URL shape nests
/// the method under `requestContext.http` and uses `rawPath`. Exactly one
/// shape is populated per invocation; [`normalize`] detects which.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Trigger {
    /// Raw request body, possibly empty or malformed.
    pub body: Option<String>,
    /// HTTP method (legacy gateway shape).
    pub http_method: Option<String>,
    /// Request path (legacy gateway shape).
    pub path: Option<String>,
    /// Request path (function-URL shape).
    pub raw_path: Option<String>,
    /// Request context (function-URL shape).
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    pub http: Option<HttpContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpContext {
    pub method: Option<String>,
}

impl Trigger {
    /// Method from the nested function-URL context, when present.
    pub fn nested_method(&self) -> Option<&str> {
        self.request_context
            .as_ref()?
            .http
            .as_ref()?
            .method
            .as_deref()
    }
}

/// Canonical request form, derived once per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    /// Lowercased HTTP method, empty when the trigger carried none.
    pub method: String,
    /// First path component, `/`-prefixed; `/` when the path is absent.
    pub path_segment: String,
    /// Parsed request body; empty on any parse failure.
    pub payload: Map<String, Value>,
}

/// Normalize a raw trigger into its canonical form.
///
/// Never fails: malformed or missing fields degrade to defaults. The nested
/// method field marks the function-URL shape; when it is present the legacy
/// top-level fields are ignored even if populated.
pub fn normalize(trigger: &Trigger) -> NormalizedRequest {
    let payload = parse_body(trigger.body.as_deref());

    let (method, path) = match trigger.nested_method() {
        Some(method) => (Some(method), trigger.raw_path.as_deref()),
        None => (trigger.http_method.as_deref(), trigger.path.as_deref()),
    };

    let method = method.unwrap_or("").to_lowercase();
    let path_segment = format!(
        "/{}",
        path.unwrap_or("").split('/').nth(1).unwrap_or("")
    );

    NormalizedRequest {
        method,
        path_segment,
        payload,
    }
}

/// Parse the raw body into a string-keyed payload mapping.
///
/// Blank bodies, unparseable JSON, and non-object documents all degrade to
/// the empty mapping.
fn parse_body(body: Option<&str>) -> Map<String, Value> {
    let Some(raw) = body else {
        return Map::new();
    };
    if raw.trim().is_empty() {
        return Map::new();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("Request body is valid JSON but not an object, ignoring");
            Map::new()
        }
        Err(e) => {
            warn!("Failed to parse request body as JSON: {}", e);
            Map::new()
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
