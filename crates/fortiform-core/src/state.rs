// ── Resource state ──
//
// Attribute map keyed by underscore names, the object id (mkey), and an
// optional prior map used for change detection during update.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::subtable::SortMode;

/// State of one resource instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    /// The mkey once the object exists on the appliance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(skip)]
    prior: Option<Map<String, Value>>,
}

impl ResourceData {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self {
            id: None,
            attributes,
            prior: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach the state this data replaces; update payloads reset what it
    /// held and this data no longer does.
    pub fn with_prior(mut self, prior: Map<String, Value>) -> Self {
        self.prior = Some(prior);
        self
    }

    pub fn prior(&self) -> Option<&Map<String, Value>> {
        self.prior.as_ref()
    }

    pub fn take_prior(&mut self) -> Option<Map<String, Value>> {
        self.prior.take()
    }

    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.attributes.get(attr)
    }

    pub fn set(&mut self, attr: impl Into<String>, value: Value) {
        self.attributes.insert(attr.into(), value);
    }

    // ── Provider meta attributes ─────────────────────────────────────

    /// Per-resource vdom override.
    pub fn vdomparam(&self) -> Option<&str> {
        self.get("vdomparam")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Per-resource sort override.
    pub fn sort_override(&self) -> Option<SortMode> {
        self.get("dynamic_sort_subtable")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// `get_all_tables` as bool or `"true"`/`"false"`.
    pub fn get_all_tables(&self) -> bool {
        match self.get("get_all_tables") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Meta attributes carried over across a refresh.
    pub fn meta_attributes(&self) -> Map<String, Value> {
        self.attributes
            .iter()
            .filter(|(k, _)| crate::schema::is_meta_attr(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
