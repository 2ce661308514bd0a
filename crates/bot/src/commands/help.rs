//! `help` -- list registered commands.

use async_trait::async_trait;

use crate::context::CommandContext;
use crate::registry::{Command, CommandRegistry};

pub struct HelpCommand {
    listing: String,
}

impl HelpCommand {
    const USAGE: &'static str = "help";
    const DESCRIPTION: &'static str = "Show this command listing";

    /// Snapshot the registry's commands into a static listing. Built
    /// last during registration, so it covers every other command.
    pub(crate) fn over(registry: &CommandRegistry) -> Self {
        let mut lines = vec!["Available commands:".to_string()];
        for command in registry.commands() {
            lines.push(format!("  {:<24} {}", command.usage(), command.description()));
        }
        lines.push(format!("  {:<24} {}", Self::USAGE, Self::DESCRIPTION));
        Self {
            listing: lines.join("\n"),
        }
    }
}

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn usage(&self) -> &'static str {
        Self::USAGE
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    async fn execute(&self, _ctx: &CommandContext, _args: &[&str]) -> String {
        self.listing.clone()
    }
}
