//! Which lines of a displayed document accept a new comment.

use crate::address::ReviewAddress;
use crate::correspondence::DiffError;
use crate::index::DiffVersionIndex;
use crate::lines::{CommentingRange, DisplayLine};
use crate::model::DiffSide;
use log::debug;
use serde::{Deserialize, Serialize};

/// Commenting policy for the old side of a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OldSidePolicy {
    /// The whole old document is commentable. The old content is historical
    /// context and comments are allowed anywhere on it.
    #[default]
    WholeDocument,
    /// Only removed and unchanged lines within the diffed region.
    DiffOnly,
}

/// Computes commenting ranges for documents of the current diff version.
#[derive(Debug, Clone, Copy)]
pub struct CommentingRangeResolver<'a> {
    index: &'a DiffVersionIndex,
    policy: OldSidePolicy,
}

impl<'a> CommentingRangeResolver<'a> {
    pub fn new(index: &'a DiffVersionIndex) -> Self {
        Self {
            index,
            policy: OldSidePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: OldSidePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Commenting ranges (0-based, inclusive) of the document at `address`
    /// showing `line_count` lines.
    ///
    /// Addresses outside the current version (unknown path, other merge
    /// request, other commit) have no ranges. Only a diff that cannot be
    /// mapped is an error.
    pub fn commenting_ranges(
        &self,
        address: &ReviewAddress,
        line_count: u32,
    ) -> Result<Vec<CommentingRange>, DiffError> {
        if address.project_id != self.index.review().project_id
            || address.mr_id != self.index.review().mr_id
        {
            debug!(
                "No commenting ranges: address belongs to MR !{} of project {}",
                address.mr_id, address.project_id
            );
            return Ok(Vec::new());
        }

        let Some(side) = DiffSide::for_commit(self.index.refs(), &address.commit) else {
            debug!(
                "No commenting ranges: commit {} is not part of the current diff version",
                address.commit
            );
            return Ok(Vec::new());
        };

        let Some(file) = self.index.find_file(&address.path, side) else {
            return Ok(Vec::new());
        };

        let ranges = match (side, self.policy) {
            (DiffSide::Old, OldSidePolicy::WholeDocument) => match line_count.checked_sub(1) {
                Some(last) => vec![CommentingRange::new(DisplayLine(0), DisplayLine(last))],
                None => Vec::new(),
            },
            (DiffSide::Old, OldSidePolicy::DiffOnly) => self
                .index
                .correspondence_for(file)?
                .lines()
                .iter()
                .filter_map(|line| line.old_line())
                .filter_map(DisplayLine::from_diff_line)
                .map(CommentingRange::single)
                .collect(),
            (DiffSide::New, _) => self
                .index
                .correspondence_for(file)?
                .added_lines()
                .filter_map(DisplayLine::from_diff_line)
                .map(CommentingRange::single)
                .collect(),
        };

        Ok(ranges)
    }
}
