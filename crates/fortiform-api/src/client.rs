// FortiOS CMDB HTTP client
//
// Wraps `reqwest::Client` with CMDB URL construction, vdom scoping, the
// fixed retry budget, and envelope unwrapping. Object payloads travel as
// untyped JSON maps; typing is the schema layer's job in fortiform-core.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::models::{CmdbResponse, SystemStatus};
use crate::transport::TransportConfig;

/// Characters of an undecodable body quoted in the error message.
const BODY_PREVIEW_CHARS: usize = 200;

/// Async client for the FortiOS REST API.
///
/// Authenticates with a REST API admin token (`Authorization: Bearer`).
/// All CMDB methods take a `path` such as `"firewall/address"` or
/// `"vpn.ipsec/phase2-interface"` and an optional vdom (empty string means
/// the token's default vdom).
pub struct FortiClient {
    http: reqwest::Client,
    base_url: Url,
    retries: u32,
    timeout: Duration,
}

impl FortiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API token and transport config.
    ///
    /// `host` may be a bare hostname (`192.168.1.99`, `fw.example:8443`) or a
    /// full URL; bare hosts get an `https://` scheme.
    pub fn new(host: &str, token: &SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(host)?,
            retries: transport.retries,
            timeout: transport.timeout,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn with_client(http: reqwest::Client, host: &str) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(host)?,
            retries: 1,
            timeout: Duration::from_secs(30),
        })
    }

    /// The appliance base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let raw = raw.trim();
        let with_scheme = if raw.contains("://") {
            raw.to_owned()
        } else {
            format!("https://{raw}")
        };
        let mut url = Url::parse(&with_scheme)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&path);
        Ok(url)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/api/v2/{kind}/{path}[/{mkey}]?vdom={vdom}`
    ///
    /// `mkey` is pushed as one segment, so `/` and spaces inside it are
    /// percent-encoded.
    fn api_url(&self, kind: &str, path: &str, mkey: Option<&str>, vdom: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments.pop_if_empty().extend(["api", "v2", kind]);
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
            if let Some(mkey) = mkey {
                segments.push(mkey);
            }
        }
        if !vdom.is_empty() {
            url.query_pairs_mut().append_pair("vdom", vdom);
        }
        Ok(url)
    }

    // ── CMDB operations ──────────────────────────────────────────────

    /// Create an object. `POST /api/v2/cmdb/{path}`
    pub async fn create_object(
        &self,
        path: &str,
        body: &Map<String, Value>,
        vdom: &str,
    ) -> Result<CmdbResponse, Error> {
        let url = self.api_url("cmdb", path, None, vdom)?;
        self.execute(Method::POST, url, Some(body)).await
    }

    /// Read one object by mkey. `GET /api/v2/cmdb/{path}/{mkey}`
    ///
    /// Returns `Ok(None)` when the appliance reports the object missing.
    pub async fn read_object(
        &self,
        path: &str,
        mkey: &str,
        vdom: &str,
    ) -> Result<Option<Map<String, Value>>, Error> {
        let url = self.api_url("cmdb", path, Some(mkey), vdom)?;
        match self.execute(Method::GET, url, None).await {
            Ok(resp) => Ok(resp.into_objects().into_iter().next()),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Replace an object. `PUT /api/v2/cmdb/{path}/{mkey}`
    pub async fn update_object(
        &self,
        path: &str,
        mkey: &str,
        body: &Map<String, Value>,
        vdom: &str,
    ) -> Result<CmdbResponse, Error> {
        let url = self.api_url("cmdb", path, Some(mkey), vdom)?;
        self.execute(Method::PUT, url, Some(body)).await
    }

    /// Delete an object. `DELETE /api/v2/cmdb/{path}/{mkey}`
    pub async fn delete_object(&self, path: &str, mkey: &str, vdom: &str) -> Result<CmdbResponse, Error> {
        let url = self.api_url("cmdb", path, Some(mkey), vdom)?;
        self.execute(Method::DELETE, url, None).await
    }

    /// List every object of a table. `GET /api/v2/cmdb/{path}`
    pub async fn list_objects(&self, path: &str, vdom: &str) -> Result<Vec<Map<String, Value>>, Error> {
        let url = self.api_url("cmdb", path, None, vdom)?;
        debug!(path, "listing objects");
        Ok(self.execute(Method::GET, url, None).await?.into_objects())
    }

    /// Appliance identity and firmware version. `GET /api/v2/monitor/system/status`
    pub async fn system_status(&self) -> Result<SystemStatus, Error> {
        let url = self.api_url("monitor", "system/status", None, "")?;
        Ok(self.execute(Method::GET, url, None).await?.into())
    }

    // ── Request execution ────────────────────────────────────────────

    /// Send a request, retrying transient failures up to `retries` times.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Map<String, Value>>,
    ) -> Result<CmdbResponse, Error> {
        let mut attempt = 0;
        loop {
            debug!("{method} {url}");
            let mut req = self.http.request(method.clone(), url.clone());
            if let Some(body) = body {
                req = req.json(body);
            }

            match req.send().await {
                Ok(resp) => return self.parse_envelope(resp).await,
                Err(e) if (e.is_connect() || e.is_timeout()) && attempt < self.retries => {
                    attempt += 1;
                    warn!(attempt, error = %e, "transient failure, retrying");
                    tokio::time::sleep(Duration::from_millis(250 * u64::from(attempt))).await;
                }
                Err(e) if e.is_timeout() => {
                    return Err(Error::Timeout { timeout: self.timeout });
                }
                Err(e) => return Err(Error::Transport(e)),
            }
        }
    }

    /// Decode the envelope, mapping non-success statuses to `Error::Api`.
    async fn parse_envelope(&self, resp: reqwest::Response) -> Result<CmdbResponse, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::InvalidToken);
        }

        let body = resp.text().await?;

        if status == StatusCode::FORBIDDEN {
            return Err(Error::Forbidden {
                message: if body.is_empty() {
                    "token profile lacks access".into()
                } else {
                    body
                },
            });
        }

        let envelope: CmdbResponse = match serde_json::from_str(&body) {
            Ok(env) => env,
            Err(_) if !status.is_success() => {
                return Err(Error::Api {
                    http_status: status.as_u16(),
                    error_code: 0,
                    message: if body.is_empty() { status.to_string() } else { body },
                });
            }
            Err(e) => {
                let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
                return Err(Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                });
            }
        };

        if status.is_success() && envelope.is_success() {
            return Ok(envelope);
        }

        let error_code = envelope.error.unwrap_or(0);
        Err(Error::Api {
            http_status: envelope.http_status.unwrap_or_else(|| status.as_u16()),
            error_code,
            message: envelope
                .cli_error
                .clone()
                .unwrap_or_else(|| describe_error_code(error_code, status)),
        })
    }
}

/// Human text for the common FortiOS CMDB error numbers.
fn describe_error_code(code: i64, status: StatusCode) -> String {
    match code {
        -1 => "invalid length of value".into(),
        -2 => "index value out of range".into(),
        -3 => "entry not found".into(),
        -4 => "maximum number of entries has been reached".into(),
        -5 => "a duplicate entry already exists".into(),
        -8 => "invalid IP address".into(),
        -9 => "invalid IPv6 address".into(),
        -651 => "input value is invalid".into(),
        0 => status.to_string(),
        other => format!("error code {other}"),
    }
}
