// ── Attribute diff ──
//
// Compares two state maps attribute by attribute. Used by `plan` to show
// what an apply would change. Null, empty and absent are the same thing to
// FortiOS, so they compare equal here too.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};
use strum::Display;

use crate::convert::forti_api_patch;
use crate::expand::join_path;
use crate::schema::is_meta_attr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

/// One differing leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttrChange {
    /// Dotted path, e.g. `tagging.0.name`.
    pub path: String,
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

/// Changes needed to go from `before` to `after`, sorted by path.
pub fn diff(before: &Map<String, Value>, after: &Map<String, Value>) -> Vec<AttrChange> {
    let mut out = Vec::new();
    diff_maps(before, after, "", true, &mut out);
    out
}

fn set(v: Option<&Value>) -> Option<&Value> {
    v.filter(|v| forti_api_patch(v))
}

fn diff_maps(
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    prefix: &str,
    top_level: bool,
    out: &mut Vec<AttrChange>,
) {
    let keys: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
    for key in keys {
        if top_level && is_meta_attr(key) {
            continue;
        }
        diff_values(set(before.get(key)), set(after.get(key)), &join_path(prefix, key), out);
    }
}

fn diff_values(before: Option<&Value>, after: Option<&Value>, path: &str, out: &mut Vec<AttrChange>) {
    match (before, after) {
        (None, None) => {}
        (None, Some(a)) => out.push(AttrChange {
            path: path.to_owned(),
            kind: ChangeKind::Added,
            before: None,
            after: Some(a.clone()),
        }),
        (Some(b), None) => out.push(AttrChange {
            path: path.to_owned(),
            kind: ChangeKind::Removed,
            before: Some(b.clone()),
            after: None,
        }),
        (Some(Value::Object(b)), Some(Value::Object(a))) => diff_maps(b, a, path, false, out),
        (Some(Value::Array(b)), Some(Value::Array(a))) if is_table(b) && is_table(a) => {
            for i in 0..b.len().max(a.len()) {
                diff_values(set(b.get(i)), set(a.get(i)), &format!("{path}.{i}"), out);
            }
        }
        (Some(b), Some(a)) if !loosely_equal(b, a) => out.push(AttrChange {
            path: path.to_owned(),
            kind: ChangeKind::Changed,
            before: Some(b.clone()),
            after: Some(a.clone()),
        }),
        _ => {}
    }
}

fn is_table(items: &[Value]) -> bool {
    items.iter().all(Value::is_object)
}

/// `5` and `"5"` are the same value once on the appliance.
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            s.trim() == n.to_string()
        }
        _ => a == b,
    }
}
