//! Fixed command registry.
//!
//! Commands implement [`Command`] and are registered once at startup;
//! there is no runtime loading. Dispatch is by primary name or alias.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::commands;
use crate::context::CommandContext;

/// One chat command. `execute` returns the reply text; anything not fit
/// for chat (raw error detail) goes to the log inside the handler.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name the command is invoked by.
    fn name(&self) -> &'static str;

    /// Alternative names.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// One-line usage string, e.g. `collect [min_level]`.
    fn usage(&self) -> &'static str;

    /// One-line description for the help listing.
    fn description(&self) -> &'static str;

    async fn execute(&self, ctx: &CommandContext, args: &[&str]) -> String;
}

/// Name → handler table, built once at startup.
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    /// Registry with the built-in command set.
    pub fn builtin() -> Self {
        let mut registry = Self {
            commands: Vec::new(),
            index: HashMap::new(),
        };
        registry.register(Arc::new(commands::collect::CollectCommand));
        registry.register(Arc::new(commands::characters::CharactersCommand));

        let help = commands::help::HelpCommand::over(&registry);
        registry.register(Arc::new(help));
        registry
    }

    fn register(&mut self, command: Arc<dyn Command>) {
        let slot = self.commands.len();
        self.index.insert(command.name(), slot);
        for alias in command.aliases() {
            self.index.insert(alias, slot);
        }
        self.commands.push(command);
    }

    /// Look up a command by name or alias.
    pub fn find(&self, name: &str) -> Option<&dyn Command> {
        self.index.get(name).map(|&slot| &*self.commands[slot])
    }

    /// Registered commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.iter().map(|c| &**c)
    }

    /// Parse one input line and run the matching command.
    ///
    /// `None` when the line does not carry the prefix; unknown command
    /// names produce a reply rather than silence.
    pub async fn dispatch(
        &self,
        ctx: &CommandContext,
        line: &str,
        prefix: &str,
    ) -> Option<String> {
        let (name, args) = parse_invocation(line, prefix)?;
        match self.find(name) {
            Some(command) => Some(command.execute(ctx, &args).await),
            None => Some(format!(
                "Unknown command '{name}'. Try {prefix}help."
            )),
        }
    }
}

/// Split a prefixed line into command name and whitespace-separated
/// arguments. `None` when the prefix is absent or nothing follows it.
pub fn parse_invocation<'a>(line: &'a str, prefix: &str) -> Option<(&'a str, Vec<&'a str>)> {
    let rest = line.trim().strip_prefix(prefix)?;
    let mut words = rest.split_whitespace();
    let name = words.next()?;
    Some((name, words.collect()))
}
