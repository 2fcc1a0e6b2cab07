//! Diff data structures representing one version of a merge request's changes.

use super::comment::DiffSide;
use serde::{Deserialize, Serialize};

/// The three commits that bracket a diff version.
///
/// Together they form the identity of a [`DiffVersion`]: two snapshots with
/// equal refs describe the same diff.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRefs {
    /// Commit of the target branch the change is compared against (old side).
    pub base_sha: String,
    /// Latest commit of the source branch (new side).
    pub head_sha: String,
    /// Commit the source branch was started from.
    pub start_sha: String,
}

impl DiffRefs {
    /// Create a new set of diff refs.
    pub fn new(
        base_sha: impl Into<String>,
        head_sha: impl Into<String>,
        start_sha: impl Into<String>,
    ) -> Self {
        Self {
            base_sha: base_sha.into(),
            head_sha: head_sha.into(),
            start_sha: start_sha.into(),
        }
    }
}

/// Identity of the merge request a diff version belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewId {
    /// Numeric id of the project hosting the merge request.
    pub project_id: u64,
    /// Project-scoped merge request id.
    pub mr_id: u64,
}

impl ReviewId {
    pub fn new(project_id: u64, mr_id: u64) -> Self {
        Self { project_id, mr_id }
    }
}

/// One immutable snapshot of a merge request's diff.
///
/// A fresh version is fetched every time the reviewed change is refreshed
/// (e.g. after a new push). It is never modified after it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffVersion {
    /// Commits bracketing this diff.
    #[serde(flatten)]
    pub refs: DiffRefs,
    /// All files changed in this version.
    #[serde(default)]
    pub files: Vec<FileDiff>,
}

impl DiffVersion {
    /// Create a new diff version without files.
    pub fn new(refs: DiffRefs) -> Self {
        Self {
            refs,
            files: Vec::new(),
        }
    }

    /// Builder-style helper to attach the changed files.
    pub fn with_files(mut self, files: Vec<FileDiff>) -> Self {
        self.files = files;
        self
    }

    /// Find the file shown as `path` on `side`.
    ///
    /// The path of the requested side wins: with `a.rs` renamed to `b.rs`
    /// and a new `a.rs` added, the new side's `a.rs` is the added file. Only
    /// without such a match is the other side's path considered.
    pub fn find_file(&self, path: &str, side: DiffSide) -> Option<&FileDiff> {
        self.files
            .iter()
            .find(|file| file.path_on(side) == path)
            .or_else(|| self.files.iter().find(|file| file.matches_path(path)))
    }
}

/// A single file's diff inside a [`DiffVersion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiff {
    /// Path of the file in the base version.
    pub old_path: String,
    /// Path of the file in the head version.
    pub new_path: String,
    /// Unified diff text of this file, starting at its first `@@` header.
    #[serde(default)]
    pub raw_diff_text: String,
    /// The file does not exist in the base version.
    #[serde(default)]
    pub is_new: bool,
    /// The file does not exist in the head version.
    #[serde(default)]
    pub is_deleted: bool,
    /// The file was moved from `old_path` to `new_path`.
    #[serde(default)]
    pub is_renamed: bool,
}

impl FileDiff {
    /// Create a modified file whose path did not change.
    pub fn modified(path: impl Into<String>, raw_diff_text: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            old_path: path.clone(),
            new_path: path,
            raw_diff_text: raw_diff_text.into(),
            is_new: false,
            is_deleted: false,
            is_renamed: false,
        }
    }

    /// Create a file that only exists in the head version.
    pub fn added(path: impl Into<String>, raw_diff_text: impl Into<String>) -> Self {
        Self {
            is_new: true,
            ..Self::modified(path, raw_diff_text)
        }
    }

    /// Create a file that only exists in the base version.
    pub fn deleted(path: impl Into<String>, raw_diff_text: impl Into<String>) -> Self {
        Self {
            is_deleted: true,
            ..Self::modified(path, raw_diff_text)
        }
    }

    /// Create a file that was moved, possibly with content changes.
    pub fn renamed(
        old_path: impl Into<String>,
        new_path: impl Into<String>,
        raw_diff_text: impl Into<String>,
    ) -> Self {
        Self {
            old_path: old_path.into(),
            new_path: new_path.into(),
            raw_diff_text: raw_diff_text.into(),
            is_new: false,
            is_deleted: false,
            is_renamed: true,
        }
    }

    /// Whether `path` names this file on either side of the diff.
    pub fn matches_path(&self, path: &str) -> bool {
        self.old_path == path || self.new_path == path
    }

    /// Path of the file on `side`.
    pub fn path_on(&self, side: DiffSide) -> &str {
        match side {
            DiffSide::Old => &self.old_path,
            DiffSide::New => &self.new_path,
        }
    }
}

/// A contiguous region of changes (hunk).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// Old file starting line (1-based).
    pub old_start: u32,
    /// Number of lines in old version.
    pub old_count: u32,
    /// New file starting line (1-based).
    pub new_start: u32,
    /// Number of lines in new version.
    pub new_count: u32,
    /// Section heading following the closing `@@`, if any.
    pub section: Option<String>,
    /// Lines in this hunk.
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// Create a new hunk with the given header info and no lines.
    pub fn new(old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> Self {
        Self {
            old_start,
            old_count,
            new_start,
            new_count,
            section: None,
            lines: Vec::new(),
        }
    }

    /// First old line following this hunk.
    ///
    /// With a zero count the unified format points the start at the line
    /// *before* the (empty) region, hence the `+ 1`.
    pub fn old_end(&self) -> u32 {
        next_line(self.old_start, self.old_count)
    }

    /// First new line following this hunk.
    pub fn new_end(&self) -> u32 {
        next_line(self.new_start, self.new_count)
    }
}

fn next_line(start: u32, count: u32) -> u32 {
    if count == 0 {
        start.saturating_add(1)
    } else {
        start.saturating_add(count)
    }
}

/// A single line of a hunk, numbered in the version(s) it exists in.
///
/// Line numbers are 1-based, as in the unified diff format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum HunkLine {
    /// Line only present in the old version (`-`).
    Removed { old_line: u32 },
    /// Line only present in the new version (`+`).
    Added { new_line: u32 },
    /// Line present in both versions (` `).
    Unchanged { old_line: u32, new_line: u32 },
}

impl HunkLine {
    /// Line number in the old version, if the line exists there.
    pub fn old_line(&self) -> Option<u32> {
        match self {
            HunkLine::Removed { old_line } | HunkLine::Unchanged { old_line, .. } => {
                Some(*old_line)
            }
            HunkLine::Added { .. } => None,
        }
    }

    /// Line number in the new version, if the line exists there.
    pub fn new_line(&self) -> Option<u32> {
        match self {
            HunkLine::Added { new_line } | HunkLine::Unchanged { new_line, .. } => {
                Some(*new_line)
            }
            HunkLine::Removed { .. } => None,
        }
    }

    /// `new_line - old_line` for unchanged lines.
    pub fn offset(&self) -> Option<i64> {
        match self {
            HunkLine::Unchanged { old_line, new_line } => {
                Some(i64::from(*new_line) - i64::from(*old_line))
            }
            HunkLine::Removed { .. } | HunkLine::Added { .. } => None,
        }
    }
}
