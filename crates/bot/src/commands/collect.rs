//! `collect` -- trigger a collection run.

use async_trait::async_trait;
use dwarf_core::types::{CollectionResult, CollectionStatus};
use dwarf_collector::RunError;

use crate::context::CommandContext;
use crate::registry::Command;

pub struct CollectCommand;

#[async_trait]
impl Command for CollectCommand {
    fn name(&self) -> &'static str {
        "collect"
    }

    fn usage(&self) -> &'static str {
        "collect [min_level]"
    }

    fn description(&self) -> &'static str {
        "Fetch and store every member's characters"
    }

    async fn execute(&self, ctx: &CommandContext, args: &[&str]) -> String {
        let min_level = match args.first() {
            Some(raw) => match raw.parse::<f64>() {
                Ok(level) if level.is_finite() && level >= 0.0 => level,
                _ => return format!("'{raw}' is not a valid item level."),
            },
            None => ctx.default_min_level,
        };

        // Reject, not queue: a second trigger during a run is a mistake.
        let Ok(_guard) = ctx.run_guard.try_lock() else {
            return "A collection run is already in progress.".to_string();
        };

        match ctx.runner.run(min_level, &ctx.cancel).await {
            Ok(results) => render_summary(&results),
            Err(RunError::Config(e)) => {
                tracing::error!(error = %e, "Collection trigger failed before any fetch");
                "The member roster could not be loaded. Check the logs.".to_string()
            }
            Err(RunError::Store { source, results }) => {
                let collected: usize = results.iter().map(|r| r.stored_count()).sum();
                tracing::error!(
                    error = %source,
                    characters = collected,
                    "Collected results could not be persisted",
                );
                format!("Collected {collected} characters but saving them failed. Check the logs.")
            }
        }
    }
}

fn render_summary(results: &[CollectionResult]) -> String {
    let total: usize = results.iter().map(|r| r.stored_count()).sum();
    let with_characters = results.iter().filter(|r| r.stored_count() > 0).count();

    let mut reply = format!("Collected {total} characters across {with_characters} members.");

    let partial: Vec<&str> = results
        .iter()
        .filter(|r| r.status == CollectionStatus::Partial)
        .map(|r| r.member_id.as_str())
        .collect();
    if !partial.is_empty() {
        reply.push_str(&format!("\nPartial results for: {}.", partial.join(", ")));
    }

    let cancelled = results
        .iter()
        .filter(|r| r.status == CollectionStatus::Cancelled)
        .count();
    if cancelled > 0 {
        reply.push_str(&format!("\nRun was cancelled; {cancelled} members not collected."));
    }

    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dwarf_core::types::CharacterRecord;

    fn result(member_id: &str, status: CollectionStatus, handles: &[&str]) -> CollectionResult {
        CollectionResult {
            member_id: member_id.to_string(),
            status,
            characters: handles
                .iter()
                .map(|h| CharacterRecord {
                    handle: h.to_string(),
                    class: "Bard".to_string(),
                    server: "Nineveh".to_string(),
                    item_level: 1650.0,
                    last_updated: Utc::now(),
                })
                .collect(),
            skipped: Vec::new(),
            failures: Vec::new(),
        }
    }

    #[test]
    fn summary_counts_characters_and_members() {
        let results = [
            result("m1", CollectionStatus::Complete, &["alice", "alt"]),
            result("m2", CollectionStatus::Complete, &["bob"]),
            result("m3", CollectionStatus::Complete, &[]),
        ];
        assert_eq!(
            render_summary(&results),
            "Collected 3 characters across 2 members."
        );
    }

    #[test]
    fn summary_names_partially_collected_members() {
        let results = [
            result("m1", CollectionStatus::Complete, &["alice"]),
            result("m2", CollectionStatus::Partial, &["carol"]),
        ];
        let reply = render_summary(&results);
        assert!(reply.contains("Partial results for: m2."));
    }

    #[test]
    fn summary_reports_cancellation() {
        let results = [
            result("m1", CollectionStatus::Complete, &["alice"]),
            result("m2", CollectionStatus::Cancelled, &[]),
            result("m3", CollectionStatus::Cancelled, &[]),
        ];
        let reply = render_summary(&results);
        assert!(reply.contains("cancelled; 2 members not collected"));
    }
}
