//! Rate-limited client for the Lost Ark open API.
//!
//! [`LostarkClient`] wraps the upstream `characters/{name}/siblings`
//! endpoint with a global in-flight request ceiling, retry with
//! exponential backoff for transient failures, and typed error
//! classification. The [`CharacterSource`] trait is the seam the
//! collector consumes, so tests can substitute a scripted source.

pub mod backoff;
pub mod client;
pub mod error;
pub mod models;
pub mod source;

pub use backoff::BackoffConfig;
pub use client::{ClientConfig, LostarkClient};
pub use error::ApiError;
pub use models::SiblingCharacter;
pub use source::CharacterSource;
