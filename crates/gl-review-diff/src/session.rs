//! Review session: the current diff version of one merge request and the
//! comment submission flow on top of it.

use crate::address::ReviewAddress;
use crate::correspondence::DiffError;
use crate::index::DiffVersionIndex;
use crate::lines::{CommentingRange, DisplayLine};
use crate::model::{CommentAnchor, DiffVersion, Discussion, ReviewId};
use crate::resolver::{
    CommentPositionResolver, CommentingRangeResolver, OldSidePolicy, PositionError,
};
use crate::traits::{DiffVersionProvider, ProviderError, ReviewServer, ReviewServerError};
use log::{debug, info};
use thiserror::Error;

/// Errors of the session operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("No diff version loaded for MR !{0}")]
    NotLoaded(u64),
    #[error(transparent)]
    Position(#[from] PositionError),
    #[error(transparent)]
    Diff(#[from] DiffError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Server(#[from] ReviewServerError),
}

/// Keeps the current diff version of a merge request.
#[derive(Debug)]
pub struct ReviewSession {
    review: ReviewId,
    policy: OldSidePolicy,
    index: Option<DiffVersionIndex>,
}

impl ReviewSession {
    pub fn new(review: ReviewId) -> Self {
        Self {
            review,
            policy: OldSidePolicy::default(),
            index: None,
        }
    }

    pub fn with_policy(mut self, policy: OldSidePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn review(&self) -> ReviewId {
        self.review
    }

    /// The index over the current version, once one was loaded.
    pub fn index(&self) -> Option<&DiffVersionIndex> {
        self.index.as_ref()
    }

    /// Install `version` as the current diff version, replacing any previous
    /// one wholesale.
    pub fn load(&mut self, version: DiffVersion) -> &DiffVersionIndex {
        let index = match self.index.take() {
            Some(mut index) => {
                index.replace_version(version);
                index
            }
            None => DiffVersionIndex::new(self.review, version),
        };
        self.index.insert(index)
    }

    /// Fetch the latest diff version and make it current.
    ///
    /// On failure the previous version stays current.
    pub async fn refresh(
        &mut self,
        provider: &dyn DiffVersionProvider,
    ) -> Result<&DiffVersionIndex, ReviewError> {
        if !provider.is_available() {
            return Err(ProviderError::Unavailable(format!(
                "Cannot fetch MR !{} of project {}",
                self.review.mr_id, self.review.project_id
            ))
            .into());
        }

        let version = provider.fetch_diff_version(self.review).await?;
        info!(
            "Loaded diff version {} of MR !{} ({} files)",
            version.refs.head_sha,
            self.review.mr_id,
            version.files.len()
        );
        Ok(self.load(version))
    }

    /// Commenting ranges of the document at `address`; empty until a
    /// version is loaded.
    pub fn commenting_ranges(
        &self,
        address: &ReviewAddress,
        line_count: u32,
    ) -> Result<Vec<CommentingRange>, ReviewError> {
        let Some(index) = &self.index else {
            return Ok(Vec::new());
        };
        Ok(CommentingRangeResolver::new(index)
            .with_policy(self.policy)
            .commenting_ranges(address, line_count)?)
    }

    /// Anchor for a click on display line `line` of the document at `address`.
    pub fn resolve_click(
        &self,
        address: &ReviewAddress,
        line: DisplayLine,
    ) -> Result<CommentAnchor, ReviewError> {
        let index = self
            .index
            .as_ref()
            .ok_or(ReviewError::NotLoaded(self.review.mr_id))?;
        Ok(CommentPositionResolver::new(index).resolve_click(address, line)?)
    }

    /// Resolve the anchor of a new thread and create it on `server`.
    pub async fn submit_comment(
        &self,
        server: &dyn ReviewServer,
        address: &ReviewAddress,
        line: DisplayLine,
        body: &str,
    ) -> Result<Discussion, ReviewError> {
        if !server.is_available() {
            return Err(
                ReviewServerError::Unavailable("Comment submission is disabled".to_string()).into(),
            );
        }

        let anchor = self.resolve_click(address, line)?;
        debug!("Submitting comment anchored at {:?}", anchor);
        let discussion = server.create_note(&anchor, body).await?;
        info!(
            "Created discussion {} on {}",
            discussion.id, anchor.new_path
        );
        Ok(discussion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiffRefs, FileDiff, Note};
    use crate::traits::NoOpReviewServer;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const RAW: &str = "@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n";

    fn version(head: &str) -> DiffVersion {
        DiffVersion::new(DiffRefs::new("base", head, "start"))
            .with_files(vec![FileDiff::modified("src/main.rs", RAW)])
    }

    fn address(commit: &str) -> ReviewAddress {
        ReviewAddress {
            path: "src/main.rs".to_string(),
            commit: commit.to_string(),
            repository_root: "/repo".to_string(),
            project_id: 1,
            mr_id: 2,
        }
    }

    struct MockProvider {
        versions: Mutex<Vec<DiffVersion>>,
        available: bool,
        call_count: Mutex<usize>,
    }

    impl MockProvider {
        fn new(mut versions: Vec<DiffVersion>) -> Self {
            versions.reverse();
            Self {
                versions: Mutex::new(versions),
                available: true,
                call_count: Mutex::new(0),
            }
        }

        fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl DiffVersionProvider for MockProvider {
        async fn fetch_diff_version(
            &self,
            _review: ReviewId,
        ) -> Result<DiffVersion, ProviderError> {
            *self.call_count.lock().unwrap() += 1;
            self.versions
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| ProviderError::NetworkError("connection reset".to_string()))
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    struct MockServer {
        anchors: Mutex<Vec<CommentAnchor>>,
        available: bool,
    }

    impl Default for MockServer {
        fn default() -> Self {
            Self {
                anchors: Mutex::new(Vec::new()),
                available: true,
            }
        }
    }

    #[async_trait]
    impl ReviewServer for MockServer {
        async fn create_note(
            &self,
            anchor: &CommentAnchor,
            body: &str,
        ) -> Result<Discussion, ReviewServerError> {
            self.anchors.lock().unwrap().push(anchor.clone());
            Ok(Discussion {
                id: "d1".to_string(),
                notes: vec![Note {
                    id: 1,
                    body: body.to_string(),
                    author: "reviewer".to_string(),
                }],
            })
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    #[tokio::test]
    async fn test_submit_comment_sends_resolved_anchor() {
        let provider = MockProvider::new(vec![version("head")]);
        let server = MockServer::default();
        let mut session = ReviewSession::new(ReviewId::new(1, 2));
        session.refresh(&provider).await.unwrap();

        // Display line 2 on the old side is the unchanged line `c` (3 -> 3)
        let discussion = session
            .submit_comment(&server, &address("base"), DisplayLine(2), "nit")
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 1);
        assert_eq!(discussion.notes[0].body, "nit");
        let anchors = server.anchors.lock().unwrap();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].old_line, Some(3));
        assert_eq!(anchors[0].new_line, Some(3));
    }

    #[tokio::test]
    async fn test_refresh_replaces_version_and_rejects_stale_addresses() {
        let provider = MockProvider::new(vec![version("head-1"), version("head-2")]);
        let mut session = ReviewSession::new(ReviewId::new(1, 2));

        session.refresh(&provider).await.unwrap();
        assert!(session
            .resolve_click(&address("head-1"), DisplayLine(1))
            .is_ok());

        session.refresh(&provider).await.unwrap();
        let err = session
            .resolve_click(&address("head-1"), DisplayLine(1))
            .unwrap_err();
        assert!(matches!(
            err,
            ReviewError::Position(PositionError::StaleAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_version() {
        let provider = MockProvider::new(vec![version("head-1")]);
        let mut session = ReviewSession::new(ReviewId::new(1, 2));
        session.refresh(&provider).await.unwrap();

        let err = session.refresh(&provider).await.unwrap_err();
        assert!(matches!(
            err,
            ReviewError::Provider(ProviderError::NetworkError(_))
        ));
        assert_eq!(session.index().unwrap().refs().head_sha, "head-1");
    }

    #[tokio::test]
    async fn test_server_errors_propagate() {
        let mut session = ReviewSession::new(ReviewId::new(1, 2));
        session.load(version("head"));

        let err = session
            .submit_comment(&NoOpReviewServer, &address("head"), DisplayLine(1), "hi")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReviewError::Server(ReviewServerError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unavailable_provider_is_not_called() {
        let provider = MockProvider {
            available: false,
            ..MockProvider::new(vec![version("head")])
        };
        let mut session = ReviewSession::new(ReviewId::new(1, 2));

        let err = session.refresh(&provider).await.unwrap_err();
        assert!(matches!(
            err,
            ReviewError::Provider(ProviderError::Unavailable(_))
        ));
        assert_eq!(provider.call_count(), 0);
        assert!(session.index().is_none());
    }

    #[tokio::test]
    async fn test_unavailable_server_receives_nothing() {
        let server = MockServer {
            available: false,
            ..MockServer::default()
        };
        let mut session = ReviewSession::new(ReviewId::new(1, 2));
        session.load(version("head"));

        let err = session
            .submit_comment(&server, &address("head"), DisplayLine(1), "hi")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReviewError::Server(ReviewServerError::Unavailable(_))
        ));
        assert!(server.anchors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unloaded_session() {
        let session = ReviewSession::new(ReviewId::new(1, 2));

        assert!(session
            .commenting_ranges(&address("head"), 10)
            .unwrap()
            .is_empty());
        assert!(matches!(
            session.resolve_click(&address("head"), DisplayLine(0)),
            Err(ReviewError::NotLoaded(2))
        ));
    }

    #[test]
    fn test_session_policy_is_applied() {
        let mut session =
            ReviewSession::new(ReviewId::new(1, 2)).with_policy(OldSidePolicy::DiffOnly);
        session.load(version("head"));

        let ranges = session.commenting_ranges(&address("base"), 100).unwrap();
        assert_eq!(ranges.len(), 3);
    }

    #[test]
    fn test_ranges_of_broken_diff_are_an_error() {
        let mut session = ReviewSession::new(ReviewId::new(1, 2));
        session.load(
            DiffVersion::new(DiffRefs::new("base", "head", "start"))
                .with_files(vec![FileDiff::modified("src/main.rs", "@@ -1 +1 @@\n!x\n")]),
        );

        let err = session
            .commenting_ranges(&address("head"), 10)
            .unwrap_err();
        assert!(matches!(err, ReviewError::Diff(DiffError::Parse(_))));
    }
}
