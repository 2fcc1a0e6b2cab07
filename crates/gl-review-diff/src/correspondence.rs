//! Line correspondence between the old and new version of one file.
//!
//! The hunks of a unified diff leave out the unchanged regions between them.
//! [`FileLineCorrespondence`] folds the hunks into one ordered list of
//! [`HunkLine`]s, synthesizing those regions, so every line from the first to
//! the last hunk has an entry.
//!
//! Synthesizing is only sound if both hunks agree on how far the new version
//! is shifted against the old one. The last line of a hunk and the first line
//! of the next one must therefore be unchanged lines with the same offset
//! (`new_line - old_line`); anything else is reported as [`InconsistentDiff`]
//! instead of being patched up.

use crate::model::{Hunk, HunkLine};
use crate::parser::{parse_hunks, ParseError};
use thiserror::Error;

/// The hunks of a file contradict each other.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InconsistentDiff {
    #[error("Hunk starting at old line {next} follows hunk starting at old line {previous}")]
    OutOfOrder { previous: u32, next: u32 },
    #[error("Hunk starting at old line {old_start} does not begin or end with an unchanged line")]
    ChangedBoundary { old_start: u32 },
    #[error("Hunk boundaries overlap: old line {next_old} follows old line {last_old}")]
    Overlapping { last_old: u32, next_old: u32 },
    #[error(
        "Offset mismatch between old lines {last_old} and {next_old}: {before} before the gap, {after} after it"
    )]
    OffsetMismatch {
        last_old: u32,
        next_old: u32,
        before: i64,
        after: i64,
    },
}

/// Errors that can occur while building a correspondence from raw diff text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Inconsistent(#[from] InconsistentDiff),
}

/// Shift of the lines outside the diffed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edges {
    /// First old line belonging to the first hunk.
    first_old: u32,
    /// First old line following the last hunk.
    after_last_old: u32,
    /// `new_line - old_line` for every line following the last hunk.
    trailing_offset: i64,
}

/// Continuous old↔new line mapping of one file.
///
/// Spans the diffed region only: from the first line of the first hunk to the
/// last line of the last hunk, gaps included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLineCorrespondence {
    lines: Vec<HunkLine>,
    edges: Option<Edges>,
}

impl FileLineCorrespondence {
    /// Parse a raw file diff and connect its hunks.
    pub fn from_raw_diff(raw_diff: &str) -> Result<Self, DiffError> {
        let hunks = parse_hunks(raw_diff)?;
        Ok(Self::from_hunks(&hunks)?)
    }

    /// Connect parsed hunks, ordered by old start line.
    pub fn from_hunks(hunks: &[Hunk]) -> Result<Self, InconsistentDiff> {
        let (Some(first), Some(last)) = (hunks.first(), hunks.last()) else {
            return Ok(Self::default());
        };

        for pair in hunks.windows(2) {
            if pair[1].old_start <= pair[0].old_start {
                return Err(InconsistentDiff::OutOfOrder {
                    previous: pair[0].old_start,
                    next: pair[1].old_start,
                });
            }
        }

        let mut lines: Vec<HunkLine> = Vec::new();
        let mut previous: Option<&Hunk> = None;
        for hunk in hunks {
            if let Some(previous) = previous {
                lines.extend(connect(previous, hunk)?);
            }
            lines.extend_from_slice(&hunk.lines);
            previous = Some(hunk);
        }

        let first_old = if first.old_count == 0 {
            first.old_start.saturating_add(1)
        } else {
            first.old_start
        };
        let edges = Edges {
            first_old,
            after_last_old: last.old_end(),
            trailing_offset: i64::from(last.new_end()) - i64::from(last.old_end()),
        };

        Ok(Self {
            lines,
            edges: Some(edges),
        })
    }

    /// All lines in order.
    pub fn lines(&self) -> &[HunkLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The entry of old line `old_line` (a removed or unchanged line).
    pub fn line_for_old(&self, old_line: u32) -> Option<&HunkLine> {
        self.lines
            .iter()
            .find(|line| line.old_line() == Some(old_line))
    }

    /// The entry of new line `new_line` (an added or unchanged line).
    pub fn line_for_new(&self, new_line: u32) -> Option<&HunkLine> {
        self.lines
            .iter()
            .find(|line| line.new_line() == Some(new_line))
    }

    /// New line numbers of all added lines, in order.
    pub fn added_lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.iter().filter_map(|line| match line {
            HunkLine::Added { new_line } => Some(*new_line),
            HunkLine::Removed { .. } | HunkLine::Unchanged { .. } => None,
        })
    }

    /// Old line numbers of all removed lines, in order.
    pub fn removed_lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.iter().filter_map(|line| match line {
            HunkLine::Removed { old_line } => Some(*old_line),
            HunkLine::Added { .. } | HunkLine::Unchanged { .. } => None,
        })
    }

    /// `(old_line, new_line)` pairs of all unchanged lines, in order.
    pub fn unchanged_lines(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.lines.iter().filter_map(|line| match line {
            HunkLine::Unchanged { old_line, new_line } => Some((*old_line, *new_line)),
            HunkLine::Removed { .. } | HunkLine::Added { .. } => None,
        })
    }

    /// First and last old line covered.
    pub fn old_range(&self) -> Option<(u32, u32)> {
        let mut old_lines = self.lines.iter().filter_map(HunkLine::old_line);
        let first = old_lines.next()?;
        Some((first, old_lines.last().unwrap_or(first)))
    }

    /// First and last new line covered.
    pub fn new_range(&self) -> Option<(u32, u32)> {
        let mut new_lines = self.lines.iter().filter_map(HunkLine::new_line);
        let first = new_lines.next()?;
        Some((first, new_lines.last().unwrap_or(first)))
    }

    /// New line of an old line lying before the first or after the last hunk.
    ///
    /// Lines outside every hunk are unchanged: before the first hunk they keep
    /// their number, after the last hunk they are shifted by the difference of
    /// the hunk's end positions. Returns `None` for lines inside the diffed
    /// region (use [`Self::line_for_old`]) and for a shift that would leave
    /// the line range.
    pub fn new_line_outside_hunks(&self, old_line: u32) -> Option<u32> {
        let Some(edges) = self.edges else {
            // No hunks: both versions are identical
            return Some(old_line);
        };

        if old_line < edges.first_old {
            Some(old_line)
        } else if old_line >= edges.after_last_old {
            let shifted = i64::from(old_line) + edges.trailing_offset;
            u32::try_from(shifted).ok().filter(|line| *line > 0)
        } else {
            None
        }
    }
}

/// Synthesize the unchanged lines between two adjacent hunks.
fn connect(previous: &Hunk, next: &Hunk) -> Result<Vec<HunkLine>, InconsistentDiff> {
    // Only unchanged lines exist on both sides and carry an offset
    let boundary = |line: Option<&HunkLine>, hunk: &Hunk| {
        line.and_then(|line| Some((line.old_line()?, line.new_line()?, line.offset()?)))
            .ok_or(InconsistentDiff::ChangedBoundary {
                old_start: hunk.old_start,
            })
    };

    let (last_old, last_new, before) = boundary(previous.lines.last(), previous)?;
    let (next_old, _, after) = boundary(next.lines.first(), next)?;

    if next_old <= last_old {
        return Err(InconsistentDiff::Overlapping { last_old, next_old });
    }

    if before != after {
        return Err(InconsistentDiff::OffsetMismatch {
            last_old,
            next_old,
            before,
            after,
        });
    }

    Ok((last_old + 1..next_old)
        .map(|old_line| HunkLine::Unchanged {
            old_line,
            new_line: last_new + (old_line - last_old),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unchanged(old_line: u32, new_line: u32) -> HunkLine {
        HunkLine::Unchanged { old_line, new_line }
    }

    fn hunk(old_start: u32, new_start: u32, lines: Vec<HunkLine>) -> Hunk {
        let old_count = lines.iter().filter(|l| l.old_line().is_some()).count() as u32;
        let new_count = lines.iter().filter(|l| l.new_line().is_some()).count() as u32;
        let mut hunk = Hunk::new(old_start, old_count, new_start, new_count);
        hunk.lines = lines;
        hunk
    }

    #[test]
    fn test_zero_hunks_is_empty() {
        let correspondence = FileLineCorrespondence::from_hunks(&[]).unwrap();
        assert!(correspondence.is_empty());
        assert_eq!(correspondence.old_range(), None);
        assert_eq!(correspondence.new_line_outside_hunks(42), Some(42));
    }

    #[test]
    fn test_gap_is_synthesized_with_matching_offset() {
        let first = hunk(
            8,
            6,
            vec![
                HunkLine::Removed { old_line: 8 },
                unchanged(9, 7),
                unchanged(10, 8),
            ],
        );
        let second = hunk(
            15,
            13,
            vec![unchanged(15, 13), HunkLine::Added { new_line: 14 }],
        );

        let correspondence = FileLineCorrespondence::from_hunks(&[first, second]).unwrap();
        let synthesized: Vec<(u32, u32)> = correspondence
            .unchanged_lines()
            .filter(|(old, _)| (11..=14).contains(old))
            .collect();

        assert_eq!(synthesized, vec![(11, 9), (12, 10), (13, 11), (14, 12)]);
        assert_eq!(correspondence.lines().len(), 3 + 4 + 2);
    }

    #[test]
    fn test_offset_mismatch_is_fatal() {
        let first = hunk(9, 7, vec![unchanged(9, 7), unchanged(10, 8)]);
        let second = hunk(15, 12, vec![unchanged(15, 12)]);

        let err = FileLineCorrespondence::from_hunks(&[first, second]).unwrap_err();
        assert_eq!(
            err,
            InconsistentDiff::OffsetMismatch {
                last_old: 10,
                next_old: 15,
                before: -2,
                after: -3,
            }
        );
    }

    #[test]
    fn test_changed_boundary_is_fatal() {
        let first = hunk(1, 1, vec![unchanged(1, 1), HunkLine::Added { new_line: 2 }]);
        let second = hunk(10, 11, vec![unchanged(10, 11)]);

        let err = FileLineCorrespondence::from_hunks(&[first, second]).unwrap_err();
        assert_eq!(err, InconsistentDiff::ChangedBoundary { old_start: 1 });
    }

    #[test]
    fn test_out_of_order_hunks_are_fatal() {
        let first = hunk(10, 10, vec![unchanged(10, 10)]);
        let second = hunk(3, 3, vec![unchanged(3, 3)]);

        let err = FileLineCorrespondence::from_hunks(&[first, second]).unwrap_err();
        assert_eq!(
            err,
            InconsistentDiff::OutOfOrder {
                previous: 10,
                next: 3
            }
        );
    }

    #[test]
    fn test_overlapping_hunks_are_fatal() {
        let first = hunk(1, 1, vec![unchanged(1, 1), unchanged(2, 2), unchanged(3, 3)]);
        let second = hunk(2, 2, vec![unchanged(2, 2)]);

        let err = FileLineCorrespondence::from_hunks(&[first, second]).unwrap_err();
        assert_eq!(
            err,
            InconsistentDiff::Overlapping {
                last_old: 3,
                next_old: 2
            }
        );
    }

    #[test]
    fn test_adjacent_hunks_need_no_gap() {
        let first = hunk(1, 1, vec![unchanged(1, 1), unchanged(2, 2)]);
        let second = hunk(3, 3, vec![unchanged(3, 3)]);

        let correspondence = FileLineCorrespondence::from_hunks(&[first, second]).unwrap();
        assert_eq!(
            correspondence.lines(),
            &[unchanged(1, 1), unchanged(2, 2), unchanged(3, 3)]
        );
    }

    #[test]
    fn test_from_raw_diff_and_lookups() {
        let raw = "@@ -1,4 +1,3 @@\n a\n-b\n c\n d\n@@ -8,2 +7,3 @@\n h\n+new\n i\n";
        let correspondence = FileLineCorrespondence::from_raw_diff(raw).unwrap();

        assert_eq!(correspondence.line_for_old(2), Some(&HunkLine::Removed { old_line: 2 }));
        assert_eq!(correspondence.line_for_old(6), Some(&unchanged(6, 5)));
        assert_eq!(correspondence.line_for_new(8), Some(&HunkLine::Added { new_line: 8 }));
        assert_eq!(correspondence.added_lines().collect::<Vec<_>>(), vec![8]);
        assert_eq!(correspondence.removed_lines().collect::<Vec<_>>(), vec![2]);
        assert_eq!(correspondence.old_range(), Some((1, 9)));
        assert_eq!(correspondence.new_range(), Some((1, 9)));
    }

    #[test]
    fn test_lines_outside_hunks() {
        let raw = "@@ -5,3 +5,4 @@\n e\n+x\n f\n g\n";
        let correspondence = FileLineCorrespondence::from_raw_diff(raw).unwrap();

        assert_eq!(correspondence.new_line_outside_hunks(2), Some(2));
        assert_eq!(correspondence.new_line_outside_hunks(6), None);
        assert_eq!(correspondence.new_line_outside_hunks(8), Some(9));
        assert_eq!(correspondence.new_line_outside_hunks(20), Some(21));
    }

    #[test]
    fn test_lines_outside_insertion_at_top() {
        let raw = "@@ -0,0 +1,2 @@\n+one\n+two\n";
        let correspondence = FileLineCorrespondence::from_raw_diff(raw).unwrap();

        assert_eq!(correspondence.new_line_outside_hunks(1), Some(3));
    }

    #[test]
    fn test_parse_errors_surface() {
        let err = FileLineCorrespondence::from_raw_diff("@@ -1 +1 @@\n?what\n").unwrap_err();
        assert!(matches!(err, DiffError::Parse(ParseError::UnrecognizedPrefix { .. })));
    }
}
