//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::{Map, Value};
use tabled::{Table, Tabled, settings::Style};

use fortiform_core::{AttrChange, ChangeKind, Plan, PlanAction};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

/// YAML output.
fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: {e}"))
}

// ── Attribute views ──────────────────────────────────────────────────

/// Inline rendering of a JSON value for table cells.
pub fn value_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(|v| !v.is_object()) => items
            .iter()
            .map(value_cell)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Array(items) => format!("[{} entries]", items.len()),
        other => other.to_string(),
    }
}

#[derive(Tabled)]
struct AttrRow {
    #[tabled(rename = "Attribute")]
    attr: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Two-column detail table of a flattened attribute map.
///
/// Subtable entries are expanded one row per entry as `attr[i].field`.
pub fn attribute_table(attrs: &Map<String, Value>) -> String {
    let mut rows = Vec::new();
    for (attr, value) in attrs {
        match value {
            Value::Array(items) if items.iter().any(Value::is_object) => {
                for (i, item) in items.iter().enumerate() {
                    if let Some(obj) = item.as_object() {
                        for (k, v) in obj {
                            rows.push(AttrRow {
                                attr: format!("{attr}[{i}].{k}"),
                                value: value_cell(v),
                            });
                        }
                    }
                }
            }
            _ => rows.push(AttrRow {
                attr: attr.clone(),
                value: value_cell(value),
            }),
        }
    }
    render_table(&rows)
}

// ── Plan rendering ───────────────────────────────────────────────────

fn change_line(change: &AttrChange, color: bool) -> String {
    let before = change.before.as_ref().map(value_cell).unwrap_or_default();
    let after = change.after.as_ref().map(value_cell).unwrap_or_default();
    let (sigil, text) = match change.kind {
        ChangeKind::Added => ("+", format!("{} = {after:?}", change.path)),
        ChangeKind::Removed => ("-", format!("{} = {before:?}", change.path)),
        ChangeKind::Changed => ("~", format!("{}: {before:?} -> {after:?}", change.path)),
    };
    if !color {
        return format!("  {sigil} {text}");
    }
    match change.kind {
        ChangeKind::Added => format!("  {} {}", sigil.green(), text.green()),
        ChangeKind::Removed => format!("  {} {}", sigil.red(), text.red()),
        ChangeKind::Changed => format!("  {} {}", sigil.yellow(), text),
    }
}

/// Human-readable plan summary, one line per attribute change.
pub fn plan_text(type_name: &str, plan: &Plan, color: bool) -> String {
    let header = match plan.action {
        PlanAction::NoOp => {
            return format!("{type_name} '{}' is up to date.", plan.target());
        }
        PlanAction::Create => format!("{type_name} '{}' will be created", plan.target()),
        PlanAction::Update => format!("{type_name} '{}' will be updated in place", plan.target()),
    };
    let header = if color {
        header.bold().to_string()
    } else {
        header
    };

    let mut lines = vec![header];
    lines.extend(plan.changes.iter().map(|c| change_line(c, color)));
    lines.push(format!(
        "\n{} change(s): {} to add, {} to change, {} to remove.",
        plan.changes.len(),
        count(plan, ChangeKind::Added),
        count(plan, ChangeKind::Changed),
        count(plan, ChangeKind::Removed),
    ));
    lines.join("\n")
}

fn count(plan: &Plan, kind: ChangeKind) -> usize {
    plan.changes.iter().filter(|c| c.kind == kind).count()
}
