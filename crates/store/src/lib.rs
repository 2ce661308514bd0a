//! Flat-file persistence for collected member character data.
//!
//! One pretty-printed JSON document keyed by member id, rewritten
//! atomically (write-to-temp-then-rename) on every save so a crash
//! mid-write never corrupts the previous snapshot.

pub mod error;
pub mod file;

pub use error::StoreError;
pub use file::{CharacterStore, StoreData};
