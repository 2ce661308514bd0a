//! Member character collection: roster loading and run orchestration.
//!
//! A collection run reads the roster fresh, fans out per-member fetch
//! work through a [`CharacterSource`](dwarf_lostark::CharacterSource),
//! filters by minimum item level, and merges the surviving records
//! into the [`CharacterStore`](dwarf_store::CharacterStore).

pub mod collect;
pub mod roster;
pub mod service;

pub use collect::Collector;
pub use roster::{load_roster, ConfigError, Roster, RosterMember};
pub use service::{CollectorService, RunError};
