//! Liveness and credential check against the Open Forms API.
//!
//! A `HEAD forms` hits a protected endpoint without transferring the form
//! list. When it fails with an HTTP status, one `GET forms` is issued to pick
//! up the problem-details message Open Forms returns (`detail`, then `title`).

use crate::client::OpenFormsClient;
use crate::http::{HttpMethod, HttpResponse};

impl OpenFormsClient {
    /// Report whether the API is reachable and the token is accepted.
    ///
    /// Never fails: every error is folded into `(false, message)`.
    pub fn is_healthy(&self) -> (bool, String) {
        let head = match self.request(HttpMethod::Head, "forms") {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "open forms health check failed");
                return (false, e.to_string());
            }
        };

        if head.is_success() {
            return (true, String::new());
        }

        let message = match self.request(HttpMethod::Get, "forms") {
            Ok(response) => error_message(&response),
            Err(e) => {
                tracing::debug!(error = %e, "health check fallback request failed");
                None
            }
        }
        .unwrap_or_else(|| {
            format!(
                "Server did not return a valid response (HTTP {}).",
                head.status
            )
        });

        tracing::warn!(status = head.status, message = %message, "open forms API is unhealthy");
        (false, message)
    }
}

/// Extract a human-readable message from an error response.
///
/// `None` means the body is not a JSON object.
fn error_message(response: &HttpResponse) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(&response.body).ok()?;
    let object = value.as_object()?;
    let chosen = match object.get("detail") {
        Some(detail) => Some(detail),
        None => object.get("title"),
    };
    let text = chosen.filter(|v| !is_blank(v)).map(|v| match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    });
    Some(text.unwrap_or_else(|| format!("HTTP {}", response.status)))
}

/// Values that carry no message: null, `false`, zero and empty containers.
fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::Object(map) => map.is_empty(),
    }
}
