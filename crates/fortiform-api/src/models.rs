// CMDB response types
//
// Every FortiOS REST response shares one envelope. Fields use
// `#[serde(default)]` liberally because the set of keys varies by verb and
// firmware version.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard FortiOS REST response envelope.
///
/// ```json
/// { "http_method": "GET", "results": [...], "vdom": "root",
///   "path": "firewall", "name": "address", "status": "success",
///   "http_status": 200, "serial": "FGVM...", "version": "v7.2.5", "build": 1517 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CmdbResponse {
    #[serde(default)]
    pub http_method: Option<String>,
    /// Array for CMDB reads, object for monitor endpoints, absent on writes.
    #[serde(default)]
    pub results: Value,
    #[serde(default)]
    pub vdom: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Primary key of the written object (string, or number for int keys).
    #[serde(default)]
    pub mkey: Option<Value>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub http_status: Option<u16>,
    /// FortiOS internal error number on failure.
    #[serde(default)]
    pub error: Option<i64>,
    #[serde(default)]
    pub cli_error: Option<String>,
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub build: Option<i64>,
}

impl CmdbResponse {
    /// `status == "success"`.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// The `mkey` rendered as a string, whatever its JSON type.
    pub fn mkey_string(&self) -> Option<String> {
        match self.mkey.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Consume the envelope, returning each object in `results`.
    ///
    /// A bare object is treated as a single-element list; anything else
    /// (null, scalars) yields an empty list.
    pub fn into_objects(self) -> Vec<Map<String, Value>> {
        match self.results {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(m) => Some(m),
                    _ => None,
                })
                .collect(),
            Value::Object(m) => vec![m],
            _ => Vec::new(),
        }
    }
}

// ── System status ────────────────────────────────────────────────────

/// Appliance identity from `monitor/system/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatus {
    pub hostname: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub version: Option<String>,
    pub build: Option<i64>,
}

impl From<CmdbResponse> for SystemStatus {
    fn from(resp: CmdbResponse) -> Self {
        let field = |key: &str| {
            resp.results
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_owned)
        };
        Self {
            hostname: field("hostname"),
            model: field("model_name")
                .zip(field("model_number"))
                .map(|(name, number)| format!("{name} {number}"))
                .or_else(|| field("model")),
            serial: resp.serial.clone(),
            version: resp.version.clone(),
            build: resp.build,
        }
    }
}
