//! Turn a click on a diff document into the anchor of a new comment.
//!
//! The review server wants a new line number even for comments on unchanged
//! lines shown on the old side. For such lines the anchor carries both the
//! clicked old line and its counterpart from the line correspondence.

use crate::address::ReviewAddress;
use crate::correspondence::DiffError;
use crate::index::DiffVersionIndex;
use crate::lines::DisplayLine;
use crate::model::{CommentAnchor, DiffSide, HunkLine};
use log::debug;
use thiserror::Error;

/// Errors that can occur while resolving a comment position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("File {path:?} is not part of the diff version with head {head_sha}")]
    FileNotFound { path: String, head_sha: String },
    #[error("Address for commit {commit} of MR !{mr_id} does not match the current diff version")]
    StaleAddress { commit: String, mr_id: u64 },
    #[error("File {path:?} has no {side} version")]
    SideDoesNotExist { path: String, side: DiffSide },
    #[error("Line {0} is not a valid diff line")]
    InvalidLine(u32),
    #[error("Old line {old_line} of {path:?} has no counterpart in the new version")]
    Unmapped { path: String, old_line: u32 },
    #[error(transparent)]
    Diff(#[from] DiffError),
}

/// Resolves comment positions against the current diff version.
#[derive(Debug, Clone, Copy)]
pub struct CommentPositionResolver<'a> {
    index: &'a DiffVersionIndex,
}

impl<'a> CommentPositionResolver<'a> {
    pub fn new(index: &'a DiffVersionIndex) -> Self {
        Self { index }
    }

    /// Resolve a click on display line `line` (0-based).
    pub fn resolve_click(
        &self,
        address: &ReviewAddress,
        line: DisplayLine,
    ) -> Result<CommentAnchor, PositionError> {
        let diff_line = line
            .to_diff_line()
            .ok_or(PositionError::InvalidLine(line.0))?;
        self.resolve(address, diff_line)
    }

    /// Resolve a comment on diff line `line` (1-based) of the document at
    /// `address`.
    ///
    /// The address must name a file of the current version at its base or
    /// head commit; anything else is stale and fails rather than being
    /// resolved against other data.
    pub fn resolve(
        &self,
        address: &ReviewAddress,
        line: u32,
    ) -> Result<CommentAnchor, PositionError> {
        let stale = || PositionError::StaleAddress {
            commit: address.commit.clone(),
            mr_id: address.mr_id,
        };

        let review = self.index.review();
        if address.project_id != review.project_id || address.mr_id != review.mr_id {
            return Err(stale());
        }

        let refs = self.index.refs();
        let side = DiffSide::for_commit(refs, &address.commit).ok_or_else(stale)?;
        let file = self
            .index
            .find_file(&address.path, side)
            .ok_or_else(|| PositionError::FileNotFound {
                path: address.path.clone(),
                head_sha: refs.head_sha.clone(),
            })?;

        if line == 0 {
            return Err(PositionError::InvalidLine(line));
        }

        let missing_side = match side {
            DiffSide::Old => file.is_new,
            DiffSide::New => file.is_deleted,
        };
        if missing_side {
            return Err(PositionError::SideDoesNotExist {
                path: address.path.clone(),
                side,
            });
        }

        let anchor = match side {
            DiffSide::New => CommentAnchor::on_new_line(file, refs, line),
            DiffSide::Old => {
                let correspondence = self.index.correspondence_for(file)?;
                match correspondence.line_for_old(line) {
                    Some(&HunkLine::Removed { old_line }) => {
                        CommentAnchor::on_removed_line(file, refs, old_line)
                    }
                    Some(&HunkLine::Unchanged { old_line, new_line }) => {
                        CommentAnchor::on_unchanged_line(file, refs, old_line, new_line)
                    }
                    // Outside the hunks: unchanged, shifted by the hunk edges
                    Some(HunkLine::Added { .. }) | None => {
                        let new_line = correspondence.new_line_outside_hunks(line).ok_or_else(
                            || PositionError::Unmapped {
                                path: address.path.clone(),
                                old_line: line,
                            },
                        )?;
                        CommentAnchor::on_unchanged_line(file, refs, line, new_line)
                    }
                }
            }
        };

        debug!(
            "Resolved {} line {} of {} to old {:?} / new {:?}",
            side, line, address.path, anchor.old_line, anchor.new_line
        );
        Ok(anchor)
    }
}
