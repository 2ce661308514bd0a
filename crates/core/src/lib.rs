//! Shared domain types for the guild character tracker.
//!
//! Everything that crosses a crate boundary lives here: member and
//! character records, per-run collection results, and item-level
//! parsing for the upstream `"1,620.00"` string format.

pub mod level;
pub mod types;
