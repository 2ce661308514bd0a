//! Per-member collection over a roster.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use dwarf_core::types::{
    sort_characters, CharacterRecord, CollectionResult, CollectionStatus, HandleFailure,
};
use dwarf_lostark::{ApiError, CharacterSource};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::roster::{Roster, RosterMember};

/// Orchestrates one collection pass over a roster.
///
/// Members are collected concurrently; the shared source's in-flight
/// ceiling is the only throttle. Results always come back in roster
/// order regardless of completion order.
pub struct Collector<S> {
    source: Arc<S>,
}

impl<S: CharacterSource> Collector<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Collect every roster member, one [`CollectionResult`] each.
    ///
    /// A failure on one member never aborts the others. Cancelling the
    /// token stops new fetches from being issued; in-flight fetches
    /// complete and the affected members report `Cancelled`.
    pub async fn collect(
        &self,
        roster: &Roster,
        min_level: f64,
        cancel: &CancellationToken,
    ) -> Vec<CollectionResult> {
        let futures = roster
            .members()
            .iter()
            .map(|member| self.collect_member(member, min_level, cancel));

        // join_all preserves input order, which is roster order.
        join_all(futures).await
    }

    /// Collect one member: fetch each owned handle, filter by level,
    /// and de-duplicate by character handle within the run.
    async fn collect_member(
        &self,
        member: &RosterMember,
        min_level: f64,
        cancel: &CancellationToken,
    ) -> CollectionResult {
        let mut by_handle: BTreeMap<String, CharacterRecord> = BTreeMap::new();
        let mut skipped = Vec::new();
        let mut failures = Vec::new();
        let mut cancelled = false;

        for handle in &member.handles {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            match self.source.fetch_siblings(handle).await {
                Ok(siblings) => {
                    let fetched_at = Utc::now();
                    for sibling in siblings {
                        let item_level = match sibling.item_level() {
                            Ok(level) => level,
                            Err(e) => {
                                tracing::warn!(
                                    member_id = %member.id,
                                    character = %sibling.character_name,
                                    error = %e,
                                    "Dropping character with unparsable item level",
                                );
                                continue;
                            }
                        };

                        if item_level < min_level {
                            continue;
                        }

                        // Sibling lists of a member's handles overlap;
                        // the later fetch wins per character handle.
                        by_handle.insert(
                            sibling.character_name.clone(),
                            CharacterRecord {
                                handle: sibling.character_name,
                                class: sibling.class_name,
                                server: sibling.server_name,
                                item_level,
                                last_updated: fetched_at,
                            },
                        );
                    }
                }
                Err(ApiError::NotFound) => {
                    tracing::info!(
                        member_id = %member.id,
                        handle = %handle,
                        "Handle no longer exists, skipping",
                    );
                    skipped.push(handle.clone());
                }
                Err(e) => {
                    tracing::warn!(
                        member_id = %member.id,
                        handle = %handle,
                        error = %e,
                        "Handle fetch failed",
                    );
                    failures.push(HandleFailure {
                        handle: handle.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let mut characters: Vec<CharacterRecord> = by_handle.into_values().collect();
        sort_characters(&mut characters);

        let status = if cancelled {
            CollectionStatus::Cancelled
        } else if failures.is_empty() {
            CollectionStatus::Complete
        } else {
            CollectionStatus::Partial
        };

        CollectionResult {
            member_id: member.id.clone(),
            status,
            characters,
            skipped,
            failures,
        }
    }
}
