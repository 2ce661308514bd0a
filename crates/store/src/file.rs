//! JSON-file store keyed by member id.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dwarf_core::types::{MemberId, MemberRecord};

use crate::error::StoreError;

/// The full persisted mapping. A `BTreeMap` keeps the on-disk document
/// deterministically ordered and diff-friendly.
pub type StoreData = BTreeMap<MemberId, MemberRecord>;

/// File-backed store of member character records.
///
/// Every save atomically replaces the whole document; the collector is
/// the only writer, and at most one collection run is active at a time.
#[derive(Debug, Clone)]
pub struct CharacterStore {
    path: PathBuf,
}

impl CharacterStore {
    /// Store rooted at the given file path (conventionally
    /// `data/character_data.json`).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full persisted mapping.
    ///
    /// A missing or empty file is an empty mapping, not an error; an
    /// undecodable file is reported as [`StoreError::Corrupt`] rather
    /// than silently discarded.
    pub fn load(&self) -> Result<StoreData, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoreData::new()),
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if raw.trim().is_empty() {
            return Ok(StoreData::new());
        }

        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Atomically overwrite the store with `data`.
    ///
    /// Writes to a sibling temp file and renames it over the store
    /// path, so a crash mid-write leaves the previous snapshot intact
    /// and no partial write is ever visible to a concurrent reader.
    pub fn save(&self, data: &StoreData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                    path: self.path.clone(),
                    source: e,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(data)?;

        let tmp = self.tmp_path();
        std::fs::write(&tmp, json).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;

        std::fs::rename(&tmp, &self.path).map_err(|e| {
            // Leave no stray temp file behind on a failed rename.
            let _ = std::fs::remove_file(&tmp);
            StoreError::Write {
                path: self.path.clone(),
                source: e,
            }
        })?;

        tracing::debug!(path = %self.path.display(), members = data.len(), "Store saved");
        Ok(())
    }

    /// Merge per-member fetched records into the persisted state and
    /// save the result.
    ///
    /// Applies the per-handle replace-or-insert semantics of
    /// [`MemberRecord::merge_records`] against the currently loaded
    /// state: handles not present in `partial` are left untouched, and
    /// members absent from `partial` keep their stored records.
    pub fn merge(&self, partial: &StoreData) -> Result<StoreData, StoreError> {
        let mut data = self.load()?;

        for (member_id, incoming) in partial {
            let entry = data
                .entry(member_id.clone())
                .or_insert_with(|| MemberRecord::empty(member_id.clone()));
            if incoming.display_name.is_some() {
                entry.display_name = incoming.display_name.clone();
            }
            entry.merge_records(incoming.characters.iter().cloned());
        }

        self.save(&data)?;
        Ok(data)
    }

    /// Look up one member's stored record.
    pub fn lookup(&self, member_id: &str) -> Result<Option<MemberRecord>, StoreError> {
        Ok(self.load()?.remove(member_id))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
