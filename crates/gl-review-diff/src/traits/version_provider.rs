//! Trait for fetching diff versions from source control.

use crate::model::{DiffVersion, ReviewId};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when fetching a diff version.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The merge request was not found.
    #[error("Merge request not found: {0}")]
    NotFound(String),

    /// A network error occurred.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The provider is not available.
    #[error("Diff version provider unavailable: {0}")]
    Unavailable(String),
}

/// Provides the current diff version of a merge request.
///
/// This is the only asynchronous boundary of the engine: the returned
/// version is awaited before any resolver runs and treated as an immutable
/// snapshot afterwards.
#[async_trait]
pub trait DiffVersionProvider: Send + Sync {
    /// Fetch the latest diff version of `review`.
    async fn fetch_diff_version(&self, review: ReviewId) -> Result<DiffVersion, ProviderError>;

    /// Check if the provider is available (e.g., has valid credentials).
    fn is_available(&self) -> bool;
}
