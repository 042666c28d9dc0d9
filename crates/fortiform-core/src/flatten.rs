// ── Flatten: API object → resource state ──
//
// Inverse of expand. Values are coerced per field kind and reconciled with
// the prior state: sensitive fields keep their prior value (the appliance
// only returns encrypted placeholders), subnets keep the user's CIDR form,
// and subtables follow the prior entry order.

use serde_json::{Map, Value};
use tracing::debug;

use crate::convert::{convintf2i, forti_api_patch, scalar_to_string, validate_conv_ip_mask_to_cidr};
use crate::error::CoreError;
use crate::expand::join_path;
use crate::schema::{Field, FieldKind, ResourceSchema};
use crate::subtable::{SortMode, dynamic_sort_subtable, merge_block, prior_entry};

/// Knobs for one flatten pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlattenOptions {
    pub sort: SortMode,
    /// Populate subtables even when the prior state does not track them.
    pub all_tables: bool,
}

/// Convert an API object into state attributes.
pub fn flatten(
    schema: &ResourceSchema,
    api: &Map<String, Value>,
    prior: Option<&Map<String, Value>>,
    opts: FlattenOptions,
) -> Result<Map<String, Value>, CoreError> {
    flatten_fields(schema.fields, api, prior, opts, "")
}

fn flatten_fields(
    fields: &[Field],
    api: &Map<String, Value>,
    prior: Option<&Map<String, Value>>,
    opts: FlattenOptions,
    prefix: &str,
) -> Result<Map<String, Value>, CoreError> {
    let mut out = Map::new();
    for field in fields {
        let path = join_path(prefix, field.attr);
        let prior_value = prior.and_then(|p| p.get(field.attr)).filter(|v| !v.is_null());

        if field.sensitive {
            if let Some(kept) = prior_value.filter(|v| forti_api_patch(v)) {
                out.insert(field.attr.to_owned(), kept.clone());
            }
            continue;
        }

        let Some(value) = api.get(field.api().as_ref()) else {
            continue;
        };

        if matches!(field.kind, FieldKind::Subtable { .. }) && !opts.all_tables && prior_value.is_none() {
            continue;
        }

        match flatten_value(field, value, prior_value, opts, &path) {
            Ok(v) if forti_api_patch(&v) => {
                out.insert(field.attr.to_owned(), v);
            }
            Ok(_) => {}
            Err(e) if !forti_api_patch(value) => {
                debug!(attr = %path, error = %e, "ignoring unset API value");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

fn mismatch(path: &str, expected: &str, value: &Value) -> CoreError {
    CoreError::Flatten {
        attr: path.to_owned(),
        reason: format!("expected {expected}, got {value}"),
    }
}

/// Split FortiOS multi-value strings: `"a" "b c"` or `a b`.
fn split_multi(raw: &str) -> Vec<Value> {
    if raw.contains('"') {
        raw.split('"')
            .skip(1)
            .step_by(2)
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.to_owned()))
            .collect()
    } else {
        raw.split_whitespace().map(|s| Value::String(s.to_owned())).collect()
    }
}

fn flatten_value(
    field: &Field,
    value: &Value,
    prior: Option<&Value>,
    opts: FlattenOptions,
    path: &str,
) -> Result<Value, CoreError> {
    match field.kind {
        FieldKind::String => scalar_to_string(value)
            .map(Value::String)
            .ok_or_else(|| mismatch(path, "a string", value)),
        FieldKind::Int => convintf2i(value)
            .map(Value::from)
            .ok_or_else(|| mismatch(path, "an integer", value)),
        FieldKind::IpMask => value
            .as_str()
            .map(|s| Value::String(validate_conv_ip_mask_to_cidr(s, prior.and_then(Value::as_str))))
            .ok_or_else(|| mismatch(path, "an IPv4 subnet string", value)),
        FieldKind::StringList => match value {
            Value::Array(items) => Ok(Value::Array(
                items
                    .iter()
                    .filter_map(|v| match v {
                        // `[{"name": "x"}]` is how some firmware encodes string lists
                        Value::Object(o) => o.get("name").and_then(scalar_to_string),
                        other => scalar_to_string(other),
                    })
                    .map(Value::String)
                    .collect(),
            )),
            Value::String(s) => Ok(Value::Array(split_multi(s))),
            _ => Err(mismatch(path, "a list of strings", value)),
        },
        FieldKind::Subtable { key, fields } => {
            let Value::Array(items) = value else {
                return Err(mismatch(path, "a list of objects", value));
            };
            let prior_items = prior.and_then(Value::as_array).map_or(&[][..], Vec::as_slice);
            let key_api = fields
                .iter()
                .find(|f| f.attr == key)
                .map_or_else(|| key.into(), Field::api);

            let mut flat = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}.{i}");
                let obj = item
                    .as_object()
                    .ok_or_else(|| mismatch(&item_path, "an object", item))?;
                let wanted = obj
                    .get(key_api.as_ref())
                    .and_then(scalar_to_string)
                    .unwrap_or_default();
                let item_prior = prior_entry(&wanted, prior_items, key);
                flat.push(flatten_fields(fields, obj, item_prior, opts, &item_path)?);
            }

            let mut merged = if prior_items.is_empty() {
                flat
            } else {
                merge_block(flat, prior_items, key)
            };
            dynamic_sort_subtable(&mut merged, key, opts.sort);
            Ok(Value::Array(merged.into_iter().map(Value::Object).collect()))
        }
    }
}
