//! Editor line numbers.
//!
//! Diff line numbers are 1-based, editors count from 0. The two conversions
//! below are the only place where the two numbering schemes meet; they are
//! used when building commenting ranges and when resolving a click.

use serde::{Deserialize, Serialize};

/// A 0-based line number as displayed by the editor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DisplayLine(pub u32);

impl DisplayLine {
    /// Display line of a 1-based diff line. Line `0` does not exist.
    pub fn from_diff_line(line: u32) -> Option<Self> {
        line.checked_sub(1).map(Self)
    }

    /// The 1-based diff line shown at this display line, if representable.
    pub fn to_diff_line(self) -> Option<u32> {
        self.0.checked_add(1)
    }
}

/// An inclusive range of display lines that accepts comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentingRange {
    pub start: DisplayLine,
    pub end: DisplayLine,
}

impl CommentingRange {
    pub fn new(start: DisplayLine, end: DisplayLine) -> Self {
        Self { start, end }
    }

    /// A range covering a single line.
    pub fn single(line: DisplayLine) -> Self {
        Self::new(line, line)
    }

    pub fn contains(&self, line: DisplayLine) -> bool {
        self.start <= line && line <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_line_to_display_line() {
        assert_eq!(DisplayLine::from_diff_line(1), Some(DisplayLine(0)));
        assert_eq!(DisplayLine::from_diff_line(36), Some(DisplayLine(35)));
        assert_eq!(DisplayLine::from_diff_line(0), None);
    }

    #[test]
    fn test_display_line_to_diff_line() {
        assert_eq!(DisplayLine(0).to_diff_line(), Some(1));
        assert_eq!(DisplayLine(35).to_diff_line(), Some(36));
        assert_eq!(DisplayLine(u32::MAX - 1).to_diff_line(), Some(u32::MAX));
        assert_eq!(DisplayLine(u32::MAX).to_diff_line(), None);
    }

    #[test]
    fn test_conversions_are_inverse() {
        for line in [1, 2, 17, 1000] {
            let display = DisplayLine::from_diff_line(line).unwrap();
            assert_eq!(display.to_diff_line(), Some(line));
        }
    }

    #[test]
    fn test_range_contains() {
        let range = CommentingRange::new(DisplayLine(2), DisplayLine(4));
        assert!(range.contains(DisplayLine(2)));
        assert!(range.contains(DisplayLine(4)));
        assert!(!range.contains(DisplayLine(5)));
        assert!(CommentingRange::single(DisplayLine(7)).contains(DisplayLine(7)));
    }

    #[test]
    fn test_range_json_shape() {
        let range = CommentingRange::new(DisplayLine(0), DisplayLine(9));
        assert_eq!(
            serde_json::to_string(&range).unwrap(),
            r#"{"start":0,"end":9}"#
        );
    }
}
