//! Appliance status handler.

use std::fmt::Write;

use fortiform_core::{Provider, SystemStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn detail(status: &SystemStatus) -> String {
    let mut out = String::new();
    let dash = |v: Option<&str>| v.unwrap_or("-").to_owned();
    let _ = writeln!(out, "Hostname:  {}", dash(status.hostname.as_deref()));
    let _ = writeln!(out, "Model:     {}", dash(status.model.as_deref()));
    let _ = writeln!(out, "Serial:    {}", dash(status.serial.as_deref()));
    let _ = write!(out, "Version:   {}", dash(status.version.as_deref()));
    if let Some(build) = status.build {
        let _ = write!(out, " (build {build})");
    }
    out
}

pub async fn handle(provider: &Provider, global: &GlobalOpts) -> Result<(), CliError> {
    let status = provider.system_status().await?;
    let out = output::render_single(&global.output, &status, detail, |s| {
        s.version.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
