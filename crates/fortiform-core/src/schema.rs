// ── Resource schema model ──
//
// A resource is a static table of field descriptors. Expand, flatten and
// validate all walk the same table, so the attribute ⇄ API name mapping
// and per-field coercion are declared exactly once per field.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// Attributes that steer the provider and never reach the API payload.
pub const META_ATTRS: &[&str] = &["vdomparam", "dynamic_sort_subtable", "get_all_tables"];

/// Shown in place of sensitive values.
pub const SENSITIVE_MASK: &str = "(sensitive)";

/// Returns `true` for provider-only attributes.
pub fn is_meta_attr(attr: &str) -> bool {
    META_ATTRS.contains(&attr)
}

/// How a field's value is shaped and coerced.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    /// Integer; the API may send numbers or numeric strings.
    Int,
    /// IPv4 subnet; state keeps CIDR when the user wrote CIDR.
    IpMask,
    /// Array of plain strings.
    StringList,
    /// Ordered list of records reconciled by `key` (an attribute name).
    Subtable {
        key: &'static str,
        fields: &'static [Field],
    },
}

/// Whether a field must, may, or cannot be set by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Set by the appliance only (e.g. `uuid`).
    Computed,
    /// User may set it; the appliance fills a default otherwise.
    OptionalComputed,
}

/// Value constraint checked before any API call.
#[derive(Debug, Clone, Copy)]
pub enum Check {
    None,
    MaxLen(usize),
    Range(i64, i64),
    OneOf(&'static [&'static str]),
    Ipv4,
    Ipv6,
    Ipv6Prefix,
}

/// One schema field.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub attr: &'static str,
    api_override: Option<&'static str>,
    pub kind: FieldKind,
    pub presence: Presence,
    pub sensitive: bool,
    pub check: Check,
}

impl Field {
    const fn new(attr: &'static str, kind: FieldKind) -> Self {
        Self {
            attr,
            api_override: None,
            kind,
            presence: Presence::Optional,
            sensitive: false,
            check: Check::None,
        }
    }

    pub const fn string(attr: &'static str) -> Self {
        Self::new(attr, FieldKind::String)
    }

    pub const fn int(attr: &'static str) -> Self {
        Self::new(attr, FieldKind::Int)
    }

    pub const fn ip_mask(attr: &'static str) -> Self {
        Self::new(attr, FieldKind::IpMask)
    }

    pub const fn string_list(attr: &'static str) -> Self {
        Self::new(attr, FieldKind::StringList)
    }

    pub const fn subtable(attr: &'static str, key: &'static str, fields: &'static [Field]) -> Self {
        Self::new(attr, FieldKind::Subtable { key, fields })
    }

    /// `enable`/`disable` toggle, the most common FortiOS field shape.
    pub const fn toggle(attr: &'static str) -> Self {
        Self::string(attr).one_of(&["enable", "disable"])
    }

    pub const fn required(self) -> Self {
        Self {
            presence: Presence::Required,
            ..self
        }
    }

    pub const fn computed(self) -> Self {
        Self {
            presence: Presence::Computed,
            ..self
        }
    }

    pub const fn optional_computed(self) -> Self {
        Self {
            presence: Presence::OptionalComputed,
            ..self
        }
    }

    pub const fn sensitive(self) -> Self {
        Self {
            sensitive: true,
            ..self
        }
    }

    pub const fn max_len(self, len: usize) -> Self {
        Self {
            check: Check::MaxLen(len),
            ..self
        }
    }

    pub const fn range(self, min: i64, max: i64) -> Self {
        Self {
            check: Check::Range(min, max),
            ..self
        }
    }

    pub const fn one_of(self, values: &'static [&'static str]) -> Self {
        Self {
            check: Check::OneOf(values),
            ..self
        }
    }

    pub const fn check(self, check: Check) -> Self {
        Self { check, ..self }
    }

    /// Use an API name that is not the hyphenated attribute name
    /// (FortiOS `id` is exposed as `fosid`).
    pub const fn api_name(self, name: &'static str) -> Self {
        Self {
            api_override: Some(name),
            ..self
        }
    }

    /// The REST field name: the override, or the attribute with `_` → `-`.
    pub fn api(&self) -> Cow<'static, str> {
        match self.api_override {
            Some(name) => Cow::Borrowed(name),
            None => attr_to_api(self.attr),
        }
    }

    /// Computed-only fields are never sent.
    pub fn is_writable(&self) -> bool {
        self.presence != Presence::Computed
    }
}

/// `start_ip` → `start-ip`.
pub fn attr_to_api(attr: &'static str) -> Cow<'static, str> {
    if attr.contains('_') {
        Cow::Owned(attr.replace('_', "-"))
    } else {
        Cow::Borrowed(attr)
    }
}

/// What a dotted state path points at.
#[derive(Debug, Clone, Copy)]
pub enum PathTarget {
    Field(&'static Field),
    /// One subtable entry, described by the subtable's fields.
    Entry(&'static [Field]),
}

fn mask_value(field: &Field, value: &mut Value) {
    if field.sensitive {
        if crate::convert::forti_api_patch(value) {
            *value = Value::String(SENSITIVE_MASK.to_owned());
        }
        return;
    }
    if let (FieldKind::Subtable { fields, .. }, Value::Array(items)) = (field.kind, value) {
        for entry in items.iter_mut().filter_map(Value::as_object_mut) {
            mask_fields(fields, entry);
        }
    }
}

fn mask_fields(fields: &[Field], attrs: &mut Map<String, Value>) {
    for field in fields {
        if let Some(value) = attrs.get_mut(field.attr) {
            mask_value(field, value);
        }
    }
}

fn strip_fields(fields: &[Field], attrs: &mut Map<String, Value>) {
    for field in fields {
        if field.sensitive {
            attrs.remove(field.attr);
        } else if let (FieldKind::Subtable { fields, .. }, Some(Value::Array(items))) =
            (field.kind, attrs.get_mut(field.attr))
        {
            for entry in items.iter_mut().filter_map(Value::as_object_mut) {
                strip_fields(fields, entry);
            }
        }
    }
}

/// Type of a resource's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MkeyKind {
    String,
    Int,
}

/// Static description of one FortiOS CMDB table exposed as a resource.
#[derive(Debug)]
pub struct ResourceSchema {
    /// Resource type, e.g. `fortios_firewall_address`.
    pub type_name: &'static str,
    /// Name used in error messages, e.g. `FirewallAddress`.
    pub display_name: &'static str,
    /// CMDB path, e.g. `firewall/address`.
    pub path: &'static str,
    /// Attribute holding the mkey.
    pub mkey: &'static str,
    pub mkey_kind: MkeyKind,
    pub description: &'static str,
    pub fields: &'static [Field],
}

impl ResourceSchema {
    pub fn field(&self, attr: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.attr == attr)
    }

    /// The mkey attribute rendered as the string used in URLs.
    pub fn mkey_value(&self, attrs: &Map<String, Value>) -> Option<String> {
        match attrs.get(self.mkey)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Copy of `attrs` with every set sensitive value masked, subtable
    /// entries included.
    pub fn masked(&self, attrs: &Map<String, Value>) -> Map<String, Value> {
        let mut out = attrs.clone();
        mask_fields(self.fields, &mut out);
        out
    }

    /// Copy of `attrs` without sensitive values, subtable entries included.
    pub fn without_sensitive(&self, attrs: &Map<String, Value>) -> Map<String, Value> {
        let mut out = attrs.clone();
        strip_fields(self.fields, &mut out);
        out
    }

    /// Resolve a dotted state path (`accounting_server.0.secret`).
    ///
    /// Index segments select a subtable entry; the result is then the
    /// subtable's fields rather than a single field.
    pub fn resolve_path(&self, path: &str) -> Option<PathTarget> {
        let mut fields = self.fields;
        let mut target = None;
        for segment in path.split('.') {
            if segment.parse::<usize>().is_ok() {
                let Some(PathTarget::Field(field)) = target else {
                    return None;
                };
                let FieldKind::Subtable { fields: entry, .. } = field.kind else {
                    return None;
                };
                target = Some(PathTarget::Entry(entry));
                continue;
            }
            let field = fields.iter().find(|f| f.attr == segment)?;
            if let FieldKind::Subtable { fields: entry, .. } = field.kind {
                fields = entry;
            }
            target = Some(PathTarget::Field(field));
        }
        target
    }

    /// Mask whatever sensitive data `value` at `path` carries.
    pub fn mask_at(&self, path: &str, value: &mut Value) {
        match self.resolve_path(path) {
            Some(PathTarget::Field(field)) => mask_value(field, value),
            Some(PathTarget::Entry(fields)) => {
                if let Value::Object(entry) = value {
                    mask_fields(fields, entry);
                }
            }
            None => {}
        }
    }

    /// Typed JSON for an mkey string (numbers for integer keys).
    pub fn mkey_json(&self, mkey: &str) -> Value {
        match self.mkey_kind {
            MkeyKind::Int => mkey
                .parse::<i64>()
                .map_or_else(|_| Value::String(mkey.to_owned()), Value::from),
            MkeyKind::String => Value::String(mkey.to_owned()),
        }
    }
}
