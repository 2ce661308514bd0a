//! Member roster loading.
//!
//! The roster is a JSON document mapping members to the character
//! handles they own:
//!
//! ```json
//! {
//!   "members": [
//!     { "id": "123456789", "display_name": "Alice", "active": true,
//!       "handles": ["큰도끼", "AliceAlt"] }
//!   ]
//! }
//! ```
//!
//! It is re-read fresh on every collection run so edits take effect
//! without a restart, and it performs no network I/O.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use dwarf_core::types::MemberId;
use serde::Deserialize;

/// Roster loading failures. All of these abort a run before any fetch.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The roster file does not exist.
    #[error("Roster file {path} not found")]
    Missing { path: PathBuf },

    /// The roster file exists but could not be read.
    #[error("Failed to read roster file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The roster file is not a valid roster document.
    #[error("Failed to parse roster file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two roster entries share the same member id.
    #[error("Duplicate member id '{member_id}' in roster")]
    DuplicateMember { member_id: MemberId },

    /// An active member lists no character handles.
    #[error("Member '{member_id}' has no character handles")]
    EmptyHandles { member_id: MemberId },
}

/// One member as declared in the roster file.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterMember {
    /// Stable member identifier (e.g. a Discord snowflake).
    pub id: MemberId,
    /// Optional human-readable name for display.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Members default to inactive until explicitly enabled, matching
    /// how new entries are staged in the roster file.
    #[serde(default)]
    pub active: bool,
    /// Character handles owned by this member.
    #[serde(default)]
    pub handles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RosterDocument {
    members: Vec<RosterMember>,
}

/// The validated, active-only roster for one collection run.
///
/// Iteration order is the declaration order of the roster file; the
/// collector never mutates it.
#[derive(Debug, Clone)]
pub struct Roster {
    members: Vec<RosterMember>,
}

impl Roster {
    /// Active members in declaration order.
    pub fn members(&self) -> &[RosterMember] {
        &self.members
    }

    /// Number of active members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Find an active member by id.
    pub fn member(&self, id: &str) -> Option<&RosterMember> {
        self.members.iter().find(|m| m.id == id)
    }
}

/// Load and validate the roster from `path`.
///
/// Inactive members are dropped before validation; an *active* member
/// with zero handles is a configuration error, as is a duplicate
/// member id anywhere in the file.
pub fn load_roster(path: &Path) -> Result<Roster, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let document: RosterDocument =
        serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut seen = HashSet::new();
    for member in &document.members {
        if !seen.insert(member.id.clone()) {
            return Err(ConfigError::DuplicateMember {
                member_id: member.id.clone(),
            });
        }
    }

    let members: Vec<RosterMember> = document
        .members
        .into_iter()
        .filter(|m| m.active)
        .collect();

    for member in &members {
        if member.handles.is_empty() {
            return Err(ConfigError::EmptyHandles {
                member_id: member.id.clone(),
            });
        }
    }

    tracing::debug!(
        path = %path.display(),
        active = members.len(),
        "Roster loaded",
    );

    Ok(Roster { members })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    fn write_roster(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_active_members_in_declaration_order() {
        let (_dir, path) = write_roster(
            r#"{ "members": [
                { "id": "m2", "active": true, "handles": ["bob", "carol"] },
                { "id": "m1", "display_name": "Alice", "active": true, "handles": ["alice"] }
            ] }"#,
        );

        let roster = load_roster(&path).unwrap();
        let ids: Vec<&str> = roster.members().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["m2", "m1"]);
        assert_eq!(roster.member("m1").unwrap().display_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn inactive_members_are_dropped() {
        let (_dir, path) = write_roster(
            r#"{ "members": [
                { "id": "m1", "active": true, "handles": ["alice"] },
                { "id": "m2", "active": false, "handles": ["bob"] },
                { "id": "m3", "handles": ["carol"] }
            ] }"#,
        );

        let roster = load_roster(&path).unwrap();
        assert_eq!(roster.len(), 1);
        assert!(roster.member("m2").is_none());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_roster(&dir.path().join("nope.json"));
        assert_matches!(result, Err(ConfigError::Missing { .. }));
    }

    #[test]
    fn unparsable_file_is_a_config_error() {
        let (_dir, path) = write_roster("{ not json at all");
        assert_matches!(load_roster(&path), Err(ConfigError::Parse { .. }));
    }

    #[test]
    fn active_member_without_handles_is_rejected() {
        let (_dir, path) = write_roster(
            r#"{ "members": [ { "id": "m1", "active": true, "handles": [] } ] }"#,
        );
        assert_matches!(
            load_roster(&path),
            Err(ConfigError::EmptyHandles { member_id }) if member_id == "m1"
        );
    }

    #[test]
    fn inactive_member_without_handles_is_fine() {
        let (_dir, path) = write_roster(
            r#"{ "members": [
                { "id": "m1", "active": true, "handles": ["alice"] },
                { "id": "m2", "active": false, "handles": [] }
            ] }"#,
        );
        assert_eq!(load_roster(&path).unwrap().len(), 1);
    }

    #[test]
    fn duplicate_member_ids_are_rejected() {
        let (_dir, path) = write_roster(
            r#"{ "members": [
                { "id": "m1", "active": true, "handles": ["alice"] },
                { "id": "m1", "active": false, "handles": ["bob"] }
            ] }"#,
        );
        assert_matches!(
            load_roster(&path),
            Err(ConfigError::DuplicateMember { member_id }) if member_id == "m1"
        );
    }

    #[test]
    fn empty_member_list_is_an_empty_roster() {
        let (_dir, path) = write_roster(r#"{ "members": [] }"#);
        let roster = load_roster(&path).unwrap();
        assert!(roster.is_empty());
    }
}
