//! Domain types: members, characters, and per-run collection results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque stable identifier for a human member (e.g. a Discord snowflake).
pub type MemberId = String;

// ---------------------------------------------------------------------------
// Character / member records
// ---------------------------------------------------------------------------

/// One game character owned by a member.
///
/// Immutable value once fetched; a later fetch for the same handle
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// In-game character name, the unit of external lookup.
    /// Unique within a member's record set.
    #[serde(rename = "name")]
    pub handle: String,
    /// Character class name as reported by the API.
    pub class: String,
    /// Server / world the character lives on.
    pub server: String,
    /// Item level, already parsed from the upstream string format.
    pub item_level: f64,
    /// When this record was fetched.
    pub last_updated: DateTime<Utc>,
}

/// A member's stored character set.
///
/// Characters are kept sorted by item level descending, ties broken by
/// handle ascending, so downstream display is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// The owning member.
    pub member_id: MemberId,
    /// Human-readable display name from the roster, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Handle of the highest-level character, when any exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_character: Option<String>,
    /// Characters sorted by item level descending.
    pub characters: Vec<CharacterRecord>,
    /// Most recent `last_updated` across the characters.
    pub last_updated: Option<DateTime<Utc>>,
}

impl MemberRecord {
    /// An empty record for a member with nothing stored yet.
    pub fn empty(member_id: MemberId) -> Self {
        Self {
            member_id,
            display_name: None,
            main_character: None,
            characters: Vec::new(),
            last_updated: None,
        }
    }

    /// Look up a character by handle.
    pub fn character(&self, handle: &str) -> Option<&CharacterRecord> {
        self.characters.iter().find(|c| c.handle == handle)
    }

    /// Merge freshly fetched records into this member's set.
    ///
    /// Per-handle replace-or-insert: a fetched handle replaces any prior
    /// record with the same handle; handles not refetched are left
    /// untouched. The merge never removes records, so it is idempotent.
    pub fn merge_records<I>(&mut self, fetched: I)
    where
        I: IntoIterator<Item = CharacterRecord>,
    {
        for record in fetched {
            match self.characters.iter_mut().find(|c| c.handle == record.handle) {
                Some(existing) => *existing = record,
                None => self.characters.push(record),
            }
        }
        self.normalize();
    }

    /// Restore the sorting invariant and the derived fields.
    ///
    /// Sorts by item level descending with ties broken by handle
    /// ascending, then recomputes `main_character` and `last_updated`.
    pub fn normalize(&mut self) {
        sort_characters(&mut self.characters);
        self.main_character = self.characters.first().map(|c| c.handle.clone());
        self.last_updated = self.characters.iter().map(|c| c.last_updated).max();
    }
}

/// Sort characters for deterministic display: item level descending,
/// ties broken by handle ascending.
pub fn sort_characters(characters: &mut [CharacterRecord]) {
    characters.sort_by(|a, b| {
        b.item_level
            .total_cmp(&a.item_level)
            .then_with(|| a.handle.cmp(&b.handle))
    });
}

// ---------------------------------------------------------------------------
// Collection results
// ---------------------------------------------------------------------------

/// Outcome category for one member in one collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionStatus {
    /// Every handle was fetched (404 skips still count as complete).
    Complete,
    /// At least one handle failed with a recorded error.
    Partial,
    /// The run was cancelled before this member's fetches were issued.
    Cancelled,
}

/// A lookup failure for a single handle, recorded against the owning
/// member without aborting its remaining handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandleFailure {
    /// The handle whose fetch failed.
    pub handle: String,
    /// Rendered error detail. Logged, never surfaced verbatim to chat.
    pub message: String,
}

/// Per-member outcome of a collection run. Produced once per member per
/// run and returned to the command surface; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResult {
    /// The member this result belongs to.
    pub member_id: MemberId,
    /// Overall outcome for this member.
    pub status: CollectionStatus,
    /// Level-filtered records fetched this run, sorted like a
    /// [`MemberRecord`] (level descending, handle ascending).
    pub characters: Vec<CharacterRecord>,
    /// Handles skipped silently because the character no longer exists.
    pub skipped: Vec<String>,
    /// Handles that failed with a non-404 error.
    pub failures: Vec<HandleFailure>,
}

impl CollectionResult {
    /// Number of characters stored for this member this run.
    pub fn stored_count(&self) -> usize {
        self.characters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(handle: &str, level: f64) -> CharacterRecord {
        CharacterRecord {
            handle: handle.to_string(),
            class: "Bard".to_string(),
            server: "Nineveh".to_string(),
            item_level: level,
            last_updated: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn merge_inserts_new_handles() {
        let mut member = MemberRecord::empty("m1".into());
        member.merge_records([record("alice", 1650.0), record("bob", 1600.0)]);

        assert_eq!(member.characters.len(), 2);
        assert_eq!(member.main_character.as_deref(), Some("alice"));
    }

    #[test]
    fn merge_replaces_existing_handle_wholesale() {
        let mut member = MemberRecord::empty("m1".into());
        member.merge_records([record("alice", 1600.0)]);
        member.merge_records([record("alice", 1655.5)]);

        assert_eq!(member.characters.len(), 1);
        assert_eq!(member.characters[0].item_level, 1655.5);
    }

    #[test]
    fn merge_leaves_unfetched_handles_untouched() {
        let mut member = MemberRecord::empty("m1".into());
        member.merge_records([record("alice", 1650.0), record("bob", 1600.0)]);
        member.merge_records([record("alice", 1660.0)]);

        assert_eq!(member.characters.len(), 2);
        assert!(member.character("bob").is_some());
    }

    #[test]
    fn merge_is_idempotent() {
        let batch = [record("alice", 1650.0), record("bob", 1600.0)];

        let mut once = MemberRecord::empty("m1".into());
        once.merge_records(batch.clone());

        let mut twice = once.clone();
        twice.merge_records(batch);

        assert_eq!(once, twice);
    }

    #[test]
    fn sort_is_level_descending_with_handle_tiebreak() {
        let mut member = MemberRecord::empty("m1".into());
        member.merge_records([
            record("zed", 1600.0),
            record("ann", 1600.0),
            record("top", 1700.0),
        ]);

        let handles: Vec<&str> = member.characters.iter().map(|c| c.handle.as_str()).collect();
        assert_eq!(handles, ["top", "ann", "zed"]);
    }

    #[test]
    fn normalize_tracks_latest_update() {
        let mut member = MemberRecord::empty("m1".into());
        let mut newer = record("alice", 1650.0);
        newer.last_updated = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        member.merge_records([record("bob", 1600.0), newer.clone()]);

        assert_eq!(member.last_updated, Some(newer.last_updated));
    }

    #[test]
    fn record_serializes_handle_as_name() {
        let json = serde_json::to_value(record("alice", 1650.0)).unwrap();
        assert_eq!(json["name"], "alice");
        assert!(json.get("handle").is_none());
    }
}
