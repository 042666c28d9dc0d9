// ── Runtime provider configuration ──
//
// Describes how to reach one FortiGate. Carries the token and connection
// tuning but never touches disk: the CLI resolves profiles and hands a
// `ProviderConfig` in.

use std::time::Duration;

use fortiform_api::{TlsMode, TransportConfig};
use secrecy::SecretString;

use crate::subtable::SortMode;

/// Connection settings for a single appliance.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Hostname or URL (`192.168.1.99`, `https://fw.example:8443`).
    pub host: String,
    /// REST API admin token.
    pub token: SecretString,
    /// Default vdom; empty means the token's own vdom.
    pub vdom: String,
    pub tls: TlsMode,
    pub timeout: Duration,
    /// Extra attempts after a connect/timeout failure.
    pub retries: u32,
    /// Provider-wide subtable ordering.
    pub sort: SortMode,
    /// Force subtables on import; `None` defers to `FORTIFORM_IMPORT_TABLE`.
    pub import_table: Option<bool>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.99".into(),
            token: SecretString::from(String::new()),
            vdom: String::new(),
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            retries: 1,
            sort: SortMode::False,
            import_table: None,
        }
    }
}

impl ProviderConfig {
    /// Transport settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
            ..TransportConfig::default()
        }
        .with_retries(self.retries)
    }
}
