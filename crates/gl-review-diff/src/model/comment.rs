//! Comment-related data structures for merge request reviews.

use super::diff::{DiffRefs, FileDiff};
use serde::{Deserialize, Serialize};

/// Which side of the diff a document shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffSide {
    /// Old file (base version).
    Old,
    /// New file (head version).
    New,
}

impl DiffSide {
    /// Determine the side a commit shows within a diff version.
    ///
    /// Returns `None` for a commit that is neither the base nor the head of
    /// `refs`, i.e. an address pointing at another (stale) version.
    pub fn for_commit(refs: &DiffRefs, commit: &str) -> Option<Self> {
        if commit == refs.base_sha {
            Some(DiffSide::Old)
        } else if commit == refs.head_sha {
            Some(DiffSide::New)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiffSide::Old => "old",
            DiffSide::New => "new",
        }
    }
}

impl std::fmt::Display for DiffSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a new comment is anchored, in the shape the review server expects.
///
/// An anchor always carries at least one line number. A comment on an
/// unchanged line viewed on the old side carries both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAnchor {
    pub old_path: String,
    pub new_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_line: Option<u32>,
    pub diff_refs: DiffRefs,
}

impl CommentAnchor {
    /// Anchor on a line of the new version.
    pub fn on_new_line(file: &FileDiff, refs: &DiffRefs, new_line: u32) -> Self {
        Self::build(file, refs, None, Some(new_line))
    }

    /// Anchor on a line that only exists in the old version.
    pub fn on_removed_line(file: &FileDiff, refs: &DiffRefs, old_line: u32) -> Self {
        Self::build(file, refs, Some(old_line), None)
    }

    /// Anchor on a line present in both versions.
    pub fn on_unchanged_line(
        file: &FileDiff,
        refs: &DiffRefs,
        old_line: u32,
        new_line: u32,
    ) -> Self {
        Self::build(file, refs, Some(old_line), Some(new_line))
    }

    fn build(
        file: &FileDiff,
        refs: &DiffRefs,
        old_line: Option<u32>,
        new_line: Option<u32>,
    ) -> Self {
        Self {
            old_path: file.old_path.clone(),
            new_path: file.new_path.clone(),
            old_line,
            new_line,
            diff_refs: refs.clone(),
        }
    }
}

/// A note (single comment) of a discussion returned by the review server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub body: String,
    pub author: String,
}

/// A discussion thread created on the review server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    pub id: String,
    pub notes: Vec<Note>,
}
