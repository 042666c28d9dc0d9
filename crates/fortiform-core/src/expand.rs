// ── Expand: resource state → API payload ──
//
// Walks the schema, renaming attributes to API names and coercing values.
// On update, attributes cleared since the prior state are sent as `null`
// (or `[]` for lists) so the appliance resets them; attributes unset on
// both sides are omitted and left unchanged.

use serde_json::{Map, Value};

use crate::convert::{convintf2i, forti_api_patch, scalar_to_string};
use crate::error::CoreError;
use crate::schema::{Field, FieldKind, ResourceSchema};
use crate::state::ResourceData;

/// Which payload shape to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandMode {
    /// Only set attributes.
    Create,
    /// Set attributes plus reset sentinels for cleared ones.
    Update,
    /// Every writable non-mkey field reset.
    UnsetAll,
}

/// Build the API payload for `data`.
pub fn expand(
    schema: &ResourceSchema,
    data: &ResourceData,
    mode: ExpandMode,
) -> Result<Map<String, Value>, CoreError> {
    match mode {
        ExpandMode::UnsetAll => Ok(schema
            .fields
            .iter()
            .filter(|f| f.is_writable() && f.attr != schema.mkey)
            .map(|f| (f.api().into_owned(), reset_value(f)))
            .collect()),
        ExpandMode::Create => expand_fields(schema.fields, &data.attributes, None, ""),
        ExpandMode::Update => expand_fields(schema.fields, &data.attributes, data.prior(), ""),
    }
}

pub(crate) fn join_path(prefix: &str, attr: &str) -> String {
    if prefix.is_empty() {
        attr.to_owned()
    } else {
        format!("{prefix}.{attr}")
    }
}

/// The value that clears a field on the appliance.
fn reset_value(field: &Field) -> Value {
    match field.kind {
        FieldKind::Subtable { .. } | FieldKind::StringList => Value::Array(Vec::new()),
        _ => Value::Null,
    }
}

fn expand_fields(
    fields: &[Field],
    attrs: &Map<String, Value>,
    prior: Option<&Map<String, Value>>,
    prefix: &str,
) -> Result<Map<String, Value>, CoreError> {
    let mut out = Map::new();
    for field in fields.iter().filter(|f| f.is_writable()) {
        let path = join_path(prefix, field.attr);
        if let Some(value) = attrs.get(field.attr).filter(|v| forti_api_patch(v)) {
            out.insert(field.api().into_owned(), expand_value(field, value, &path)?);
        } else if prior
            .and_then(|p| p.get(field.attr))
            .is_some_and(forti_api_patch)
        {
            out.insert(field.api().into_owned(), reset_value(field));
        }
    }
    Ok(out)
}

fn mismatch(path: &str, expected: &str, value: &Value) -> CoreError {
    CoreError::Expand {
        attr: path.to_owned(),
        reason: format!("expected {expected}, got {value}"),
    }
}

fn expand_value(field: &Field, value: &Value, path: &str) -> Result<Value, CoreError> {
    match field.kind {
        FieldKind::String => scalar_to_string(value)
            .map(Value::String)
            .ok_or_else(|| mismatch(path, "a string", value)),
        FieldKind::Int => convintf2i(value)
            .map(Value::from)
            .ok_or_else(|| mismatch(path, "an integer", value)),
        FieldKind::IpMask => value
            .as_str()
            .map(|s| Value::String(s.trim().to_owned()))
            .ok_or_else(|| mismatch(path, "an IPv4 subnet string", value)),
        FieldKind::StringList => match value {
            Value::Array(items) => items
                .iter()
                .map(|v| {
                    scalar_to_string(v)
                        .map(Value::String)
                        .ok_or_else(|| mismatch(path, "a list of strings", value))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::String(s) => Ok(Value::Array(
                s.split_whitespace().map(|t| Value::String(t.to_owned())).collect(),
            )),
            _ => Err(mismatch(path, "a list of strings", value)),
        },
        FieldKind::Subtable { fields, .. } => {
            let Value::Array(items) = value else {
                return Err(mismatch(path, "a list of objects", value));
            };
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let item_path = format!("{path}.{i}");
                    item.as_object()
                        .ok_or_else(|| mismatch(&item_path, "an object", item))
                        .and_then(|obj| expand_fields(fields, obj, None, &item_path))
                        .map(Value::Object)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
    }
}
