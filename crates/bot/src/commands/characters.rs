//! `characters` -- stored character lookup.

use async_trait::async_trait;
use dwarf_core::types::MemberRecord;
use dwarf_store::StoreData;

use crate::context::CommandContext;
use crate::registry::Command;

pub struct CharactersCommand;

#[async_trait]
impl Command for CharactersCommand {
    fn name(&self) -> &'static str {
        "characters"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["chars"]
    }

    fn usage(&self) -> &'static str {
        "characters [member]"
    }

    fn description(&self) -> &'static str {
        "List stored characters, per member or as a roster overview"
    }

    async fn execute(&self, ctx: &CommandContext, args: &[&str]) -> String {
        let data = match ctx.store.load() {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "Store read failed");
                return "Character data is unavailable. Check the logs.".to_string();
            }
        };

        match args.first() {
            Some(query) => match find_member(&data, query) {
                Some(record) => render_member(record),
                None => format!("No character data for '{query}'."),
            },
            None => render_overview(&data),
        }
    }
}

/// Resolve a query against member ids first, display names second.
fn find_member<'a>(data: &'a StoreData, query: &str) -> Option<&'a MemberRecord> {
    data.get(query).or_else(|| {
        data.values().find(|record| {
            record
                .display_name
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(query))
        })
    })
}

fn label(record: &MemberRecord) -> &str {
    record.display_name.as_deref().unwrap_or(&record.member_id)
}

fn render_member(record: &MemberRecord) -> String {
    let mut lines = vec![format!(
        "{}: {} characters",
        label(record),
        record.characters.len()
    )];
    for character in &record.characters {
        lines.push(format!(
            "  {} [{}] {} {:.2}",
            character.handle, character.class, character.server, character.item_level
        ));
    }
    lines.join("\n")
}

fn render_overview(data: &StoreData) -> String {
    if data.is_empty() {
        return "No character data collected yet.".to_string();
    }

    let mut lines = Vec::with_capacity(data.len());
    for record in data.values() {
        match (&record.main_character, record.characters.first()) {
            (Some(main), Some(top)) => lines.push(format!(
                "{}: {} characters, top {} ({:.2})",
                label(record),
                record.characters.len(),
                main,
                top.item_level
            )),
            _ => lines.push(format!("{}: no characters", label(record))),
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dwarf_core::types::CharacterRecord;

    fn member(id: &str, display_name: Option<&str>, handles: &[(&str, f64)]) -> MemberRecord {
        let mut record = MemberRecord::empty(id.to_string());
        record.display_name = display_name.map(str::to_string);
        record.merge_records(handles.iter().map(|(handle, level)| CharacterRecord {
            handle: handle.to_string(),
            class: "Bard".to_string(),
            server: "Nineveh".to_string(),
            item_level: *level,
            last_updated: Utc::now(),
        }));
        record
    }

    fn store_with(records: Vec<MemberRecord>) -> StoreData {
        records
            .into_iter()
            .map(|r| (r.member_id.clone(), r))
            .collect()
    }

    #[test]
    fn query_resolves_by_id_then_display_name() {
        let data = store_with(vec![
            member("m1", Some("Alice"), &[("alice", 1650.0)]),
            member("m2", None, &[("bob", 1600.0)]),
        ]);

        assert_eq!(find_member(&data, "m2").unwrap().member_id, "m2");
        assert_eq!(find_member(&data, "alice").unwrap().member_id, "m1");
        assert!(find_member(&data, "nobody").is_none());
    }

    #[test]
    fn member_listing_is_level_descending() {
        let record = member("m1", Some("Alice"), &[("lowbie", 1610.0), ("alice", 1650.0)]);
        let listing = render_member(&record);

        assert!(listing.starts_with("Alice: 2 characters"));
        let alice = listing.find("alice [").unwrap();
        let lowbie = listing.find("lowbie [").unwrap();
        assert!(alice < lowbie);
    }

    #[test]
    fn overview_shows_count_and_top_character() {
        let data = store_with(vec![member(
            "m1",
            Some("Alice"),
            &[("alice", 1650.0), ("alt", 1620.0)],
        )]);

        assert_eq!(render_overview(&data), "Alice: 2 characters, top alice (1650.00)");
    }

    #[test]
    fn empty_store_has_a_friendly_overview() {
        assert_eq!(render_overview(&StoreData::new()), "No character data collected yet.");
    }
}
