//! Built-in command handlers.

pub mod characters;
pub mod collect;
pub mod help;
