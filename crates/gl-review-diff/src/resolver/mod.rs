//! Resolvers answering the editor's questions about a document.

mod position;
mod ranges;

pub use position::{CommentPositionResolver, PositionError};
pub use ranges::{CommentingRangeResolver, OldSidePolicy};
