//! Data models for diff representation.

mod comment;
mod diff;

pub use comment::{CommentAnchor, DiffSide, Discussion, Note};
pub use diff::{DiffRefs, DiffVersion, FileDiff, Hunk, HunkLine, ReviewId};
