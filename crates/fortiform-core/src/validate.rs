// ── Pre-flight validation ──
//
// Runs the schema checks locally so that bad input fails before any API
// call. All problems are collected, not just the first one.

use std::collections::HashSet;
use std::net::{Ipv4Addr, Ipv6Addr};

use serde_json::{Map, Value};

use crate::convert::{convintf2i, forti_api_patch, is_ipv6_prefix, parse_ipv4_subnet, scalar_to_string};
use crate::error::{CoreError, ValidationError};
use crate::expand::join_path;
use crate::schema::{Check, Field, FieldKind, Presence, ResourceSchema, is_meta_attr};
use crate::state::ResourceData;
use crate::subtable::{SortMode, key_of};

/// Check `data` against `schema`.
pub fn validate(schema: &ResourceSchema, data: &ResourceData) -> Result<(), CoreError> {
    let mut errors = Vec::new();
    check_meta(&data.attributes, &mut errors);
    check_fields(schema.fields, &data.attributes, "", true, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation {
            resource: schema.display_name,
            errors,
        })
    }
}

fn push(errors: &mut Vec<ValidationError>, attr: impl Into<String>, reason: impl Into<String>) {
    errors.push(ValidationError {
        attr: attr.into(),
        reason: reason.into(),
    });
}

fn check_meta(attrs: &Map<String, Value>, errors: &mut Vec<ValidationError>) {
    if let Some(v) = attrs.get("dynamic_sort_subtable").filter(|v| !v.is_null()) {
        if v.as_str().and_then(|s| s.parse::<SortMode>().ok()).is_none() {
            push(errors, "dynamic_sort_subtable", "must be one of: false, true, natural");
        }
    }
    if let Some(v) = attrs.get("get_all_tables").filter(|v| !v.is_null()) {
        let ok = match v {
            Value::Bool(_) => true,
            Value::String(s) => s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false"),
            _ => false,
        };
        if !ok {
            push(errors, "get_all_tables", "must be true or false");
        }
    }
    if let Some(v) = attrs.get("vdomparam").filter(|v| !v.is_null()) {
        if !v.is_string() {
            push(errors, "vdomparam", "must be a string");
        }
    }
}

fn check_fields(
    fields: &[Field],
    attrs: &Map<String, Value>,
    prefix: &str,
    top_level: bool,
    errors: &mut Vec<ValidationError>,
) {
    for key in attrs.keys() {
        if top_level && is_meta_attr(key) {
            continue;
        }
        if !fields.iter().any(|f| f.attr == key) {
            push(errors, join_path(prefix, key), "unsupported attribute");
        }
    }

    for field in fields {
        let path = join_path(prefix, field.attr);
        let value = attrs.get(field.attr).filter(|v| forti_api_patch(v));
        match (value, field.presence) {
            (None, Presence::Required) => push(errors, path, "is required"),
            (None, _) | (Some(_), Presence::Computed) => {}
            (Some(v), _) => check_value(field, v, &path, errors),
        }
    }
}

fn check_value(field: &Field, value: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    match field.kind {
        FieldKind::String => match scalar_to_string(value) {
            Some(s) => check_str(field.check, &s, path, errors),
            None => push(errors, path, "must be a string"),
        },
        FieldKind::Int => match convintf2i(value) {
            Some(n) => {
                if let Check::Range(min, max) = field.check {
                    if n < min || n > max {
                        push(errors, path, format!("must be between {min} and {max}"));
                    }
                }
            }
            None => push(errors, path, "must be an integer"),
        },
        FieldKind::IpMask => {
            if value.as_str().and_then(parse_ipv4_subnet).is_none() {
                push(
                    errors,
                    path,
                    "must be an IPv4 subnet (a.b.c.d/n or a.b.c.d m.m.m.m)",
                );
            }
        }
        FieldKind::StringList => match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{path}.{i}");
                    match scalar_to_string(item) {
                        Some(s) => check_str(field.check, &s, &item_path, errors),
                        None => push(errors, item_path, "must be a string"),
                    }
                }
            }
            Value::String(s) => {
                for (i, token) in s.split_whitespace().enumerate() {
                    check_str(field.check, token, &format!("{path}.{i}"), errors);
                }
            }
            _ => push(errors, path, "must be a list of strings"),
        },
        FieldKind::Subtable { key, fields } => {
            let Value::Array(items) = value else {
                push(errors, path, "must be a list of objects");
                return;
            };
            let mut seen = HashSet::new();
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}.{i}");
                let Some(obj) = item.as_object() else {
                    push(errors, item_path, "must be an object");
                    continue;
                };
                check_fields(fields, obj, &item_path, false, errors);
                let k = key_of(obj, key);
                if !k.is_empty() && !seen.insert(k.clone()) {
                    push(errors, join_path(&item_path, key), format!("duplicate entry '{k}'"));
                }
            }
        }
    }
}

fn check_str(check: Check, s: &str, path: &str, errors: &mut Vec<ValidationError>) {
    match check {
        Check::MaxLen(max) if s.chars().count() > max => {
            push(errors, path, format!("must be at most {max} characters"));
        }
        Check::OneOf(allowed) if !allowed.contains(&s) => {
            push(errors, path, format!("must be one of: {}", allowed.join(", ")));
        }
        Check::Ipv4 if s.trim().parse::<Ipv4Addr>().is_err() => {
            push(errors, path, "must be an IPv4 address");
        }
        Check::Ipv6 if s.trim().parse::<Ipv6Addr>().is_err() => {
            push(errors, path, "must be an IPv6 address");
        }
        Check::Ipv6Prefix if !is_ipv6_prefix(s) => {
            push(errors, path, "must be an IPv6 prefix (addr/len)");
        }
        _ => {}
    }
}
