//! Diff parsers.

mod hunk;
mod patch;

pub use hunk::{parse_header, parse_hunk, parse_hunks, split_hunks, ParseError, RawHunk};
pub use patch::parse_patch;
