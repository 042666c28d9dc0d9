use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `fortiform-api` crate.
///
/// Covers every failure mode of a CMDB call: authentication, transport,
/// API-level rejections, and response decoding. `fortiform-core` wraps these
/// into per-resource errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// API token rejected by the appliance (HTTP 401).
    #[error("Invalid API token")]
    InvalidToken,

    /// The token is valid but lacks the profile permission (HTTP 403).
    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {}", display_duration(.timeout))]
    Timeout { timeout: Duration },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── CMDB API ────────────────────────────────────────────────────
    /// Structured rejection from the CMDB API.
    ///
    /// `error_code` is the FortiOS internal error number (e.g. `-5` for
    /// "entry already exists", `-3` for "entry not found").
    #[error("FortiOS API error (HTTP {http_status}, code {error_code}): {message}")]
    Api {
        http_status: u16,
        error_code: i64,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve the error.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::InvalidToken | Self::Forbidden { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the object does not exist on the appliance.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api {
                http_status: 404, ..
            } => true,
            Self::Api { error_code: -3, .. } => true,
            _ => false,
        }
    }

    /// The FortiOS error number, if the appliance reported one.
    pub fn api_error_code(&self) -> Option<i64> {
        match self {
            Self::Api { error_code, .. } => Some(*error_code),
            _ => None,
        }
    }
}

/// Whole seconds as `30s`, anything finer as `1500ms`.
fn display_duration(d: &Duration) -> String {
    if d.subsec_nanos() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{}ms", d.as_millis())
    }
}
