//! Trait for creating comments on the review server.

use crate::model::{CommentAnchor, Discussion};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a review server.
#[derive(Debug, Error)]
pub enum ReviewServerError {
    /// Failed to create the note.
    #[error("Failed to create note: {0}")]
    SubmissionFailed(String),

    /// Not authorized to perform the operation.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The review server is not available.
    #[error("Review server unavailable: {0}")]
    Unavailable(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Creates diff notes on the platform hosting the merge request.
///
/// Implementations own transport and authentication. Errors are returned
/// unchanged to the caller; nothing in this crate retries them.
///
/// # Example
///
/// ```ignore
/// struct GitLabReviewServer {
///     client: GitLabClient,
///     project_id: u64,
///     mr_id: u64,
/// }
///
/// #[async_trait]
/// impl ReviewServer for GitLabReviewServer {
///     async fn create_note(
///         &self,
///         anchor: &CommentAnchor,
///         body: &str,
///     ) -> Result<Discussion, ReviewServerError> {
///         self.client
///             .create_diff_discussion(self.project_id, self.mr_id, anchor, body)
///             .await
///             .map_err(|e| ReviewServerError::SubmissionFailed(e.to_string()))
///     }
///
///     fn is_available(&self) -> bool {
///         true
///     }
/// }
/// ```
#[async_trait]
pub trait ReviewServer: Send + Sync {
    /// Start a new discussion anchored at `anchor`.
    async fn create_note(
        &self,
        anchor: &CommentAnchor,
        body: &str,
    ) -> Result<Discussion, ReviewServerError>;

    /// Check if the server can be used (e.g. has valid credentials).
    fn is_available(&self) -> bool;
}

/// A review server refusing every request, for read-only sessions.
pub struct NoOpReviewServer;

#[async_trait]
impl ReviewServer for NoOpReviewServer {
    async fn create_note(
        &self,
        _anchor: &CommentAnchor,
        _body: &str,
    ) -> Result<Discussion, ReviewServerError> {
        Err(ReviewServerError::Unavailable(
            "Comment submission is disabled".to_string(),
        ))
    }

    fn is_available(&self) -> bool {
        false
    }
}
