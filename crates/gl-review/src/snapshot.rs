//! On-disk form of a merge request's current diff version.

use anyhow::{Context, Result};
use gl_review_diff::{DiffVersion, OldSidePolicy, ReviewId, ReviewSession};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A diff version together with the merge request it belongs to.
///
/// Serialized as one flat JSON object:
/// `{"projectId", "mrId", "baseSha", "headSha", "startSha", "files"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub review: ReviewId,
    #[serde(flatten)]
    pub version: DiffVersion,
}

impl Snapshot {
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))
    }

    /// Open a review session with this snapshot as the current version.
    pub fn into_session(self, policy: OldSidePolicy) -> ReviewSession {
        let mut session = ReviewSession::new(self.review).with_policy(policy);
        session.load(self.version);
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gl_review_diff::{DiffRefs, FileDiff};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snapshot_is_flat_json() {
        let snapshot = Snapshot {
            review: ReviewId::new(42, 7),
            version: DiffVersion::new(DiffRefs::new("b", "h", "s"))
                .with_files(vec![FileDiff::added("a.txt", "@@ -0,0 +1 @@\n+a\n")]),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["projectId"], 42);
        assert_eq!(json["mrId"], 7);
        assert_eq!(json["headSha"], "h");
        assert_eq!(json["files"][0]["newPath"], "a.txt");
        assert_eq!(json["files"][0]["isNew"], true);

        let back: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
