//! Shared helpers for command handlers.

use std::io::{IsTerminal, Read};
use std::path::Path;

use serde_json::{Map, Value};

use fortiform_core::{ResourceData, ResourceSchema, resources};

use crate::error::CliError;

/// Resolve a resource type name to its schema.
pub fn resolve_schema(name: &str) -> Result<&'static ResourceSchema, CliError> {
    resources::lookup(name).ok_or_else(|| CliError::UnknownResource {
        name: name.into(),
        available: resources::all()
            .iter()
            .map(|s| s.type_name)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, the operation is refused.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags; `-` reads stdin.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Desired state from a JSON attribute file.
///
/// Accepts either a bare attribute object or a saved state document
/// (`{"id": ..., "attributes": {...}}`).
pub fn read_desired(path: &Path) -> Result<ResourceData, CliError> {
    match read_json_file(path)? {
        Value::Object(mut obj) => {
            if let Some(Value::Object(attrs)) = obj.remove("attributes") {
                return Ok(ResourceData::new(attrs));
            }
            Ok(ResourceData::new(obj))
        }
        _ => Err(CliError::Validation {
            field: "from-file".into(),
            reason: "expected a JSON object of attributes".into(),
        }),
    }
}

/// State for an existing object addressed by mkey, with the vdom override
/// carried as `vdomparam`.
pub fn target_state(mkey: &str, vdom: Option<&str>) -> ResourceData {
    let mut attrs = Map::new();
    if let Some(vdom) = vdom.filter(|v| !v.is_empty()) {
        attrs.insert("vdomparam".into(), Value::String(vdom.to_owned()));
    }
    ResourceData::new(attrs).with_id(mkey)
}
