//! Object command handlers: get, list, import, plan, apply, delete, reset.

use serde_json::Value;
use tabled::Tabled;

use fortiform_core::{PlanAction, Provider, ResourceData, ResourceSchema};

use crate::cli::{FileArgs, GlobalOpts, ListArgs, ObjectArgs, TargetArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

/// Scalar attributes shown next to the id in list tables.
const SUMMARY_ATTRS: usize = 3;

#[derive(Tabled)]
struct ObjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

fn object_row(schema: &ResourceSchema, data: &ResourceData) -> ObjectRow {
    let summary = data
        .attributes
        .iter()
        .filter(|(k, v)| k.as_str() != schema.mkey && !v.is_array() && !v.is_object())
        .filter(|(_, v)| !output::value_cell(v).is_empty())
        .take(SUMMARY_ATTRS)
        .map(|(k, v)| format!("{k}={}", output::value_cell(v)))
        .collect::<Vec<_>>()
        .join(" ");
    ObjectRow {
        id: data.id.clone().unwrap_or_default(),
        summary,
    }
}

/// State with sensitive values masked, ready for any output format.
fn shown(schema: &ResourceSchema, data: &ResourceData) -> ResourceData {
    let mut out = ResourceData::new(schema.masked(&data.attributes));
    out.id.clone_from(&data.id);
    out
}

fn render_state(schema: &ResourceSchema, global: &GlobalOpts, data: &ResourceData) -> String {
    output::render_single(
        &global.output,
        &shown(schema, data),
        |d| output::attribute_table(&d.attributes),
        |d| d.id.clone().unwrap_or_default(),
    )
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn get(provider: &Provider, args: ObjectArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let schema = util::resolve_schema(&args.target.resource_type)?;
    let mut data = util::target_state(&args.target.mkey, global.vdom.as_deref());
    if args.all_tables {
        data.set("get_all_tables", Value::Bool(true));
    }

    provider.read(schema, &mut data).await?;
    if data.id.is_none() {
        return Err(not_found(schema, &args.target.mkey));
    }
    output::print_output(&render_state(schema, global, &data), global.quiet);
    Ok(())
}

pub async fn list(provider: &Provider, args: ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let schema = util::resolve_schema(&args.resource_type)?;
    let objects: Vec<ResourceData> = provider
        .list(schema, global.vdom.as_deref(), args.all_tables)
        .await?
        .iter()
        .map(|d| shown(schema, d))
        .collect();

    let out = output::render_list(
        &global.output,
        &objects,
        |d| object_row(schema, d),
        |d| d.id.clone().unwrap_or_default(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn import(provider: &Provider, args: ObjectArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let schema = util::resolve_schema(&args.target.resource_type)?;
    let data = provider
        .import(
            schema,
            &args.target.mkey,
            global.vdom.as_deref(),
            args.all_tables,
        )
        .await
        .map_err(|e| match e {
            fortiform_core::CoreError::NotFound { mkey, .. } => not_found(schema, &mkey),
            other => other.into(),
        })?;

    output::print_output(&render_state(schema, global, &data), global.quiet);
    Ok(())
}

pub async fn plan(provider: &Provider, args: FileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let schema = util::resolve_schema(&args.resource_type)?;
    let desired = with_vdom(util::read_desired(&args.from_file)?, global);

    let plan = provider.plan(schema, &desired).await?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &plan,
        |p| output::plan_text(schema.type_name, p, color),
        |p| p.action.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn apply(provider: &Provider, args: FileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let schema = util::resolve_schema(&args.resource_type)?;
    let desired = with_vdom(util::read_desired(&args.from_file)?, global);

    // Show the plan and ask before touching the appliance
    let preview = provider.plan(schema, &desired).await?;
    if preview.action == PlanAction::NoOp {
        if !global.quiet {
            eprintln!("{}", output::plan_text(schema.type_name, &preview, false));
        }
        return Ok(());
    }
    if !global.quiet {
        let color = output::should_color(&global.color);
        eprintln!("{}\n", output::plan_text(schema.type_name, &preview, color));
    }
    if !util::confirm(
        &format!("Apply changes to {} '{}'?", schema.type_name, preview.target()),
        "apply",
        global.yes,
    )? {
        return Ok(());
    }

    let (plan, data) = provider.apply(schema, desired).await?;
    if !global.quiet {
        let id = data.id.as_deref().unwrap_or(plan.target());
        eprintln!("✓ {} {} '{id}'", past_tense(plan.action), schema.type_name);
    }
    output::print_output(&render_state(schema, global, &data), global.quiet);
    Ok(())
}

pub async fn delete(provider: &Provider, args: TargetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let schema = util::resolve_schema(&args.resource_type)?;
    if !util::confirm(
        &format!("Delete {} '{}'?", schema.type_name, args.mkey),
        "delete",
        global.yes,
    )? {
        return Ok(());
    }

    let mut data = util::target_state(&args.mkey, global.vdom.as_deref());
    provider.delete(schema, &mut data).await?;
    if !global.quiet {
        eprintln!("✓ Deleted {} '{}'", schema.type_name, args.mkey);
    }
    Ok(())
}

pub async fn reset(provider: &Provider, args: TargetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let schema = util::resolve_schema(&args.resource_type)?;
    if !util::confirm(
        &format!(
            "Reset every writable field of {} '{}' to its default?",
            schema.type_name, args.mkey
        ),
        "reset",
        global.yes,
    )? {
        return Ok(());
    }

    let mut data = util::target_state(&args.mkey, global.vdom.as_deref());
    provider.reset(schema, &mut data).await?;
    if data.id.is_none() {
        return Err(not_found(schema, &args.mkey));
    }
    output::print_output(&render_state(schema, global, &data), global.quiet);
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────

fn not_found(schema: &ResourceSchema, mkey: &str) -> CliError {
    CliError::NotFound {
        resource_type: schema.type_name.into(),
        identifier: mkey.into(),
        list_type: schema.type_name.into(),
    }
}

/// Apply the `--vdom` override unless the file names its own vdom.
fn with_vdom(mut data: ResourceData, global: &GlobalOpts) -> ResourceData {
    if let Some(ref vdom) = global.vdom {
        if data.vdomparam().is_none() {
            data.set("vdomparam", Value::String(vdom.clone()));
        }
    }
    data
}

fn past_tense(action: PlanAction) -> &'static str {
    match action {
        PlanAction::Create => "Created",
        PlanAction::Update => "Updated",
        PlanAction::NoOp => "Refreshed",
    }
}
