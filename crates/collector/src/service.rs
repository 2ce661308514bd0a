//! End-to-end collection runs: roster → collect → merge into the store.

use std::path::PathBuf;
use std::sync::Arc;

use dwarf_core::types::{CollectionResult, MemberRecord};
use dwarf_lostark::CharacterSource;
use dwarf_store::{CharacterStore, StoreData, StoreError};
use tokio_util::sync::CancellationToken;

use crate::collect::Collector;
use crate::roster::{load_roster, ConfigError, Roster};

/// Run-level failures. Per-member and per-handle errors never surface
/// here; they live inside the returned [`CollectionResult`]s.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The roster was unreadable or invalid; nothing was fetched.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Collection completed but the merged snapshot could not be
    /// persisted. The collected results are still available.
    #[error("Collection finished but persisting results failed: {source}")]
    Store {
        #[source]
        source: StoreError,
        /// Results of the run that could not be persisted.
        results: Vec<CollectionResult>,
    },
}

/// Ties the roster, collector, and store into one runnable service.
pub struct CollectorService<S> {
    roster_path: PathBuf,
    store: CharacterStore,
    collector: Collector<S>,
}

impl<S: CharacterSource> CollectorService<S> {
    pub fn new(roster_path: impl Into<PathBuf>, store: CharacterStore, source: Arc<S>) -> Self {
        Self {
            roster_path: roster_path.into(),
            store,
            collector: Collector::new(source),
        }
    }

    /// The store this service persists into.
    pub fn store(&self) -> &CharacterStore {
        &self.store
    }

    /// Execute one collection run.
    ///
    /// The roster is re-read fresh. A [`ConfigError`] aborts before any
    /// fetch; a store failure is reported after collection with the
    /// results attached, leaving the previous snapshot intact.
    pub async fn run(
        &self,
        min_level: f64,
        cancel: &CancellationToken,
    ) -> Result<Vec<CollectionResult>, RunError> {
        let roster = load_roster(&self.roster_path)?;
        tracing::info!(
            members = roster.len(),
            min_level,
            "Starting collection run",
        );

        let results = self.collector.collect(&roster, min_level, cancel).await;

        let partial = build_partial(&roster, &results);
        if let Err(source) = self.store.merge(&partial) {
            return Err(RunError::Store { source, results });
        }

        let stored: usize = results.iter().map(|r| r.stored_count()).sum();
        let failed = results
            .iter()
            .filter(|r| !r.failures.is_empty())
            .count();
        tracing::info!(
            members = results.len(),
            characters = stored,
            members_with_failures = failed,
            "Collection run finished",
        );

        Ok(results)
    }
}

/// Build the per-member partial mapping to merge into the store.
///
/// Members with no surviving characters this run are omitted: store
/// entries are created on first successful fetch, never preemptively.
fn build_partial(roster: &Roster, results: &[CollectionResult]) -> StoreData {
    let mut partial = StoreData::new();

    for result in results {
        if result.characters.is_empty() {
            continue;
        }

        let mut record = MemberRecord::empty(result.member_id.clone());
        record.display_name = roster
            .member(&result.member_id)
            .and_then(|m| m.display_name.clone());
        record.merge_records(result.characters.iter().cloned());

        partial.insert(result.member_id.clone(), record);
    }

    partial
}
