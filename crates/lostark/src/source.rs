//! The fetch seam between the collector and the API client.

use async_trait::async_trait;

use crate::client::LostarkClient;
use crate::error::ApiError;
use crate::models::SiblingCharacter;

/// Anything that can resolve a character handle to its account-wide
/// character list.
///
/// Production uses [`LostarkClient`]; collector tests use a scripted
/// source instead of the network.
#[async_trait]
pub trait CharacterSource: Send + Sync {
    /// Fetch all characters on the same account as `handle`.
    async fn fetch_siblings(&self, handle: &str) -> Result<Vec<SiblingCharacter>, ApiError>;
}

#[async_trait]
impl CharacterSource for LostarkClient {
    async fn fetch_siblings(&self, handle: &str) -> Result<Vec<SiblingCharacter>, ApiError> {
        LostarkClient::fetch_siblings(self, handle).await
    }
}
