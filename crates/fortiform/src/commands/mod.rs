//! Command dispatch: bridges CLI args -> provider operations -> output formatting.

pub mod config_cmd;
pub mod objects;
pub mod resources;
pub mod status;
pub mod util;

use fortiform_core::Provider;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an appliance-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, provider: &Provider, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Get(args) => objects::get(provider, args, global).await,
        Command::List(args) => objects::list(provider, args, global).await,
        Command::Import(args) => objects::import(provider, args, global).await,
        Command::Plan(args) => objects::plan(provider, args, global).await,
        Command::Apply(args) => objects::apply(provider, args, global).await,
        Command::Delete(args) => objects::delete(provider, args, global).await,
        Command::Reset(args) => objects::reset(provider, args, global).await,
        Command::Status => status::handle(provider, global).await,
        // Config, Completions and Resources are handled before dispatch
        Command::Config(_) | Command::Completions(_) | Command::Resources(_) => unreachable!(),
    }
}
