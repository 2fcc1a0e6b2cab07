//! Parse the hunks of a single file's unified diff.
//!
//! A raw file diff is cut into chunks at every `@@` header line. Each chunk is
//! then walked line by line with two running counters, one per version,
//! producing the ordered [`HunkLine`]s of that hunk.

use crate::model::{Hunk, HunkLine};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors that can occur while parsing hunks.
///
/// `line` always refers to the 1-based line within the raw diff text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed hunk header at line {line}: {header:?}")]
    MalformedHeader { line: usize, header: String },
    #[error("Line number overflow at line {line}: hunk runs past the last representable line")]
    LineNumberOverflow { line: usize },
    #[error("Unrecognized line prefix {prefix:?} at line {line}: {content:?}")]
    UnrecognizedPrefix {
        line: usize,
        prefix: char,
        content: String,
    },
}

/// Marker git appends after a line lacking a trailing newline.
const NO_NEWLINE_MARKER: char = '\\';

/// The text of one hunk: its header and body lines, each with its position
/// in the raw diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHunk<'a> {
    pub header: (usize, &'a str),
    pub body: Vec<(usize, &'a str)>,
}

/// Split a raw file diff into per-hunk chunks.
///
/// Lines before the first `@@` header (`diff --git`, `---`/`+++`, index
/// lines) are ignored. A diff without any header yields no chunks.
pub fn split_hunks(raw_diff: &str) -> Vec<RawHunk<'_>> {
    let mut hunks: Vec<RawHunk<'_>> = Vec::new();

    for (idx, line) in raw_diff.lines().enumerate() {
        let line_no = idx + 1;
        if line.starts_with("@@") {
            hunks.push(RawHunk {
                header: (line_no, line),
                body: Vec::new(),
            });
        } else if let Some(current) = hunks.last_mut() {
            current.body.push((line_no, line));
        }
    }

    hunks
}

/// Parse every hunk of a raw file diff.
pub fn parse_hunks(raw_diff: &str) -> Result<Vec<Hunk>, ParseError> {
    split_hunks(raw_diff).iter().map(parse_hunk).collect()
}

/// Parse a single hunk chunk into its typed lines.
pub fn parse_hunk(raw: &RawHunk<'_>) -> Result<Hunk, ParseError> {
    let (header_line, header_text) = raw.header;
    let mut hunk = parse_header(header_text).ok_or_else(|| ParseError::MalformedHeader {
        line: header_line,
        header: header_text.to_string(),
    })?;

    let cursor = raw
        .body
        .iter()
        .filter(|(_, text)| !text.is_empty())
        .try_fold(
            LineCursor::new(hunk.old_start, hunk.new_start),
            |cursor, &(line_no, text)| cursor.advance(line_no, text),
        )?;

    hunk.lines = cursor.lines;
    Ok(hunk)
}

/// Parse a `@@ -O[,L1] +N[,L2] @@ [section]` header.
///
/// Omitted counts default to 1, as in the unified format.
pub fn parse_header(header: &str) -> Option<Hunk> {
    static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();

    let re = HEADER_REGEX.get_or_init(|| {
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@ ?(.*)$")
            .expect("hunk header pattern is valid")
    });

    let captures = re.captures(header.trim_end())?;
    let number = |idx: usize| -> Option<u32> {
        match captures.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(1),
        }
    };

    let mut hunk = Hunk::new(number(1)?, number(2)?, number(3)?, number(4)?);
    hunk.section = captures
        .get(5)
        .map(|m| m.as_str().trim())
        .filter(|section| !section.is_empty())
        .map(str::to_string);
    Some(hunk)
}

/// Accumulator threaded through the body lines of a hunk.
///
/// The counters are wider than line numbers so that a hunk ending on the
/// last representable line does not overflow; only a line numbered past it
/// is an error.
#[derive(Debug)]
struct LineCursor {
    old_index: u64,
    new_index: u64,
    lines: Vec<HunkLine>,
}

impl LineCursor {
    fn new(old_start: u32, new_start: u32) -> Self {
        Self {
            old_index: u64::from(old_start),
            new_index: u64::from(new_start),
            lines: Vec::new(),
        }
    }

    fn advance(mut self, line_no: usize, text: &str) -> Result<Self, ParseError> {
        let Some(prefix) = text.chars().next() else {
            return Ok(self);
        };

        let number = |index: u64| {
            u32::try_from(index).map_err(|_| ParseError::LineNumberOverflow { line: line_no })
        };
        match prefix {
            '-' => {
                self.lines.push(HunkLine::Removed {
                    old_line: number(self.old_index)?,
                });
                self.old_index += 1;
            }
            '+' => {
                self.lines.push(HunkLine::Added {
                    new_line: number(self.new_index)?,
                });
                self.new_index += 1;
            }
            ' ' => {
                self.lines.push(HunkLine::Unchanged {
                    old_line: number(self.old_index)?,
                    new_line: number(self.new_index)?,
                });
                self.old_index += 1;
                self.new_index += 1;
            }
            NO_NEWLINE_MARKER => {}
            other => {
                return Err(ParseError::UnrecognizedPrefix {
                    line: line_no,
                    prefix: other,
                    content: text.to_string(),
                })
            }
        }

        Ok(self)
    }
}
