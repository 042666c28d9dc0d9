//! Resource type introspection: registry listing and attribute schemas.

use serde::Serialize;
use tabled::Tabled;

use fortiform_core::{Check, Field, FieldKind, Presence, resources};

use crate::cli::{GlobalOpts, ResourcesArgs, ResourcesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Clone, Serialize, Tabled)]
struct ResourceRow {
    #[tabled(rename = "Type")]
    type_name: &'static str,
    #[tabled(rename = "Path")]
    path: &'static str,
    #[tabled(rename = "Key")]
    mkey: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
}

#[derive(Clone, Serialize, Tabled)]
struct FieldRow {
    #[tabled(rename = "Attribute")]
    attr: String,
    #[tabled(rename = "API name")]
    api: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Presence")]
    presence: &'static str,
    #[tabled(rename = "Constraint")]
    constraint: String,
    #[tabled(rename = "Sensitive")]
    sensitive: bool,
}

fn kind_name(kind: FieldKind) -> String {
    match kind {
        FieldKind::String => "string".into(),
        FieldKind::Int => "int".into(),
        FieldKind::IpMask => "ipv4-classnet".into(),
        FieldKind::StringList => "list(string)".into(),
        FieldKind::Subtable { key, .. } => format!("subtable(key={key})"),
    }
}

fn presence_name(presence: Presence) -> &'static str {
    match presence {
        Presence::Required => "required",
        Presence::Optional => "optional",
        Presence::Computed => "computed",
        Presence::OptionalComputed => "optional+computed",
    }
}

fn constraint(check: Check) -> String {
    match check {
        Check::None => String::new(),
        Check::MaxLen(len) => format!("<= {len} chars"),
        Check::Range(min, max) => format!("{min}..={max}"),
        Check::OneOf(values) => values.join(" | "),
        Check::Ipv4 => "ipv4".into(),
        Check::Ipv6 => "ipv6".into(),
        Check::Ipv6Prefix => "ipv6/len".into(),
    }
}

/// Rows for every field, with subtable fields as `parent.child`.
fn field_rows(prefix: &str, fields: &[Field], rows: &mut Vec<FieldRow>) {
    for f in fields {
        let attr = if prefix.is_empty() {
            f.attr.to_owned()
        } else {
            format!("{prefix}.{}", f.attr)
        };
        rows.push(FieldRow {
            attr: attr.clone(),
            api: f.api().into_owned(),
            kind: kind_name(f.kind),
            presence: presence_name(f.presence),
            constraint: constraint(f.check),
            sensitive: f.sensitive,
        });
        if let FieldKind::Subtable { fields, .. } = f.kind {
            field_rows(&attr, fields, rows);
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ResourcesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ResourcesCommand::List => {
            let rows: Vec<ResourceRow> = resources::all()
                .iter()
                .map(|s| ResourceRow {
                    type_name: s.type_name,
                    path: s.path,
                    mkey: s.mkey,
                    description: s.description,
                })
                .collect();
            let out = output::render_list(
                &global.output,
                &rows,
                ResourceRow::clone,
                |r| r.type_name.to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourcesCommand::Schema { resource_type } => {
            let schema = util::resolve_schema(&resource_type)?;
            let mut rows = Vec::new();
            field_rows("", schema.fields, &mut rows);
            let out = output::render_list(
                &global.output,
                &rows,
                FieldRow::clone,
                |r| r.attr.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortiform_core::resources::USER_RADIUS;

    #[test]
    fn subtable_fields_are_nested() {
        let mut rows = Vec::new();
        field_rows("", USER_RADIUS.fields, &mut rows);
        let nested = rows
            .iter()
            .find(|r| r.attr == "accounting_server.fosid")
            .map(|r| r.api.as_str());
        assert_eq!(nested, Some("id"));
        assert!(rows.iter().any(|r| r.attr == "secret" && r.sensitive));
    }
}
