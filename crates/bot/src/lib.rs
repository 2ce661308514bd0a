//! `dwarf-bot` library crate.
//!
//! Re-exports internal modules for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod commands;
pub mod context;
pub mod registry;

pub use context::{CollectRunner, CommandContext};
pub use registry::{parse_invocation, Command, CommandRegistry};
