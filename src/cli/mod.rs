//! CLI module for layergen.
//!
//! Subcommands:
//! - `expand`: Expand every generator rule invocation in a source file
//! - `rules`: List the registered generator rules

mod expand;
mod rules;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

pub use expand::ExpandCommand;
pub use rules::RulesCommand;

/// layergen - convention-driven dependency injection code generation
#[derive(Parser)]
#[command(name = "layergen")]
#[command(about = "Expands layered dependency injection rules on Swift-style declarations")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Expand the rule invocations found in a source file
    Expand(ExpandCommand),

    /// List the generator rules
    Rules(RulesCommand),
}

impl App {
    /// Run the CLI application.
    ///
    /// Exits with status 1 when any invocation produced a diagnostic.
    pub fn run(self) -> color_eyre::Result<ExitCode> {
        match self.command {
            Command::Expand(cmd) => cmd.run(),
            Command::Rules(cmd) => cmd.run().map(|()| ExitCode::SUCCESS),
        }
    }
}
