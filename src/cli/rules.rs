//! Rules subcommand - list the registered generator rules.

use clap::Parser;
use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::engine::Engine;
use crate::rules::RuleRole;

/// List the generator rules and how they are invoked.
#[derive(Parser)]
pub struct RulesCommand {}

impl RulesCommand {
    /// Run the rules command.
    pub fn run(self) -> Result<()> {
        let config = Config::load()?;
        let engine = Engine::new(&Context::from_config(&config));

        for rule in engine.rules() {
            let sigil = match rule.role() {
                RuleRole::Attached => "@",
                RuleRole::Freestanding => "#",
            };
            println!(
                "{:<20} {:<13} {}",
                format!("{sigil}{}", rule.name()),
                rule.role().to_string(),
                rule.description()
            );
        }
        Ok(())
    }
}
