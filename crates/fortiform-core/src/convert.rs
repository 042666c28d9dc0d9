// ── Value coercion helpers ──
//
// FortiOS is loose about JSON types: integers arrive as numbers or strings,
// subnets as `ip mask` pairs, and "unset" as null, "" or []. These helpers
// normalize that looseness so expand/flatten can stay table-driven.

use std::net::{Ipv4Addr, Ipv6Addr};

use ipnet::{Ipv4Net, Ipv6Net};
use serde_json::Value;

/// Environment switch that makes imports populate subtables.
pub const IMPORT_TABLE_ENV: &str = "FORTIFORM_IMPORT_TABLE";

/// Coerce a loosely typed API value to an integer.
///
/// Accepts JSON integers, integral floats, and numeric strings (surrounding
/// whitespace ignored). Everything else is `None`.
pub fn convintf2i(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .and_then(|f| format!("{f:.0}").parse().ok())
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Returns `false` when an API value carries nothing to store.
///
/// `null`, `""`, `[]` and `{}` are all "unset" to FortiOS. A flatten error
/// on such a value is ignored and the attribute is left unset.
pub fn forti_api_patch(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Whether imports should read subtables, from `FORTIFORM_IMPORT_TABLE`.
pub fn is_import_table() -> bool {
    std::env::var(IMPORT_TABLE_ENV)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
        .unwrap_or(false)
}

// ── IPv4 subnets ────────────────────────────────────────────────────

/// Parse `a.b.c.d/n`, `a.b.c.d m.m.m.m`, or a bare address (`/32`).
///
/// Non-contiguous masks such as `255.0.255.0` are rejected.
pub fn parse_ipv4_subnet(raw: &str) -> Option<Ipv4Net> {
    let raw = raw.trim();
    if raw.contains('/') {
        return raw.parse().ok();
    }
    let mut parts = raw.split_whitespace();
    let addr: Ipv4Addr = parts.next()?.parse().ok()?;
    let net = match parts.next() {
        None => Ipv4Net::from(addr),
        Some(mask) => Ipv4Net::with_netmask(addr, mask.parse().ok()?).ok()?,
    };
    parts.next().is_none().then_some(net)
}

/// `10.0.0.0 255.255.255.0` → `10.0.0.0/24`.
pub fn ip_mask_to_cidr(raw: &str) -> Option<String> {
    parse_ipv4_subnet(raw).map(|net| net.to_string())
}

/// Pick the state form of an `ip mask` value read back from the API.
///
/// When the prior state value is written in CIDR and denotes the same
/// subnet, the CIDR form is kept so the refresh shows no diff. Otherwise
/// the API value is returned unchanged.
pub fn validate_conv_ip_mask_to_cidr(api: &str, prior: Option<&str>) -> String {
    let Some(prior) = prior.filter(|p| p.contains('/')) else {
        return api.to_owned();
    };
    match (parse_ipv4_subnet(api), parse_ipv4_subnet(prior)) {
        (Some(a), Some(p)) if a == p => prior.trim().to_owned(),
        _ => api.to_owned(),
    }
}

// ── IPv6 ────────────────────────────────────────────────────────────

/// `2001:db8::/64` (or a bare address).
pub fn is_ipv6_prefix(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.contains('/') {
        raw.parse::<Ipv6Net>().is_ok()
    } else {
        raw.parse::<Ipv6Addr>().is_ok()
    }
}

/// Render a scalar as the string FortiOS would show for it.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "enable" } else { "disable" }.to_owned()),
        _ => None,
    }
}
