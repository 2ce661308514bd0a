//! Shared state handed to every command handler.

use std::sync::Arc;

use async_trait::async_trait;
use dwarf_core::types::CollectionResult;
use dwarf_collector::{CollectorService, RunError};
use dwarf_lostark::CharacterSource;
use dwarf_store::CharacterStore;
use tokio_util::sync::CancellationToken;

/// The collection entrypoint as the command surface sees it.
///
/// Object-safe so the context does not carry the source type parameter
/// around, and so tests can script runs without touching the network.
#[async_trait]
pub trait CollectRunner: Send + Sync {
    async fn run(
        &self,
        min_level: f64,
        cancel: &CancellationToken,
    ) -> Result<Vec<CollectionResult>, RunError>;
}

#[async_trait]
impl<S: CharacterSource + 'static> CollectRunner for CollectorService<S> {
    async fn run(
        &self,
        min_level: f64,
        cancel: &CancellationToken,
    ) -> Result<Vec<CollectionResult>, RunError> {
        CollectorService::run(self, min_level, cancel).await
    }
}

/// Everything a command handler may touch.
pub struct CommandContext {
    pub(crate) runner: Arc<dyn CollectRunner>,
    pub(crate) store: CharacterStore,
    /// Held for the duration of a collection run. `try_lock` rejects a
    /// second trigger instead of queueing it.
    pub(crate) run_guard: tokio::sync::Mutex<()>,
    pub(crate) default_min_level: f64,
    pub(crate) cancel: CancellationToken,
}

impl CommandContext {
    pub fn new(
        runner: Arc<dyn CollectRunner>,
        store: CharacterStore,
        default_min_level: f64,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            runner,
            store,
            run_guard: tokio::sync::Mutex::new(()),
            default_min_level,
            cancel,
        }
    }
}
