//! Shared HTTP plumbing for the model gateways.
//!
//! Maps `reqwest` failures onto [`GatewayError`] so the retry policy can
//! tell transient failures from permanent ones.

use duet_application::GatewayError;
use std::time::Duration;

/// Build a client with a per-request timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GatewayError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

pub(crate) fn map_send_error(err: reqwest::Error, timeout: Duration) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout(timeout)
    } else if err.is_connect() || err.is_request() {
        GatewayError::Connection(err.to_string())
    } else {
        GatewayError::Other(err.to_string())
    }
}

/// Pass through 2xx responses; everything else becomes `GatewayError::Http`.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Http {
        status: status.as_u16(),
        body: truncate_body(&body),
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX).collect();
        format!("{}...", cut)
    }
}
