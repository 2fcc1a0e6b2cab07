//! # gl-review-diff
//!
//! Diff-position resolution for merge request review comments.
//!
//! An editor shows the two sides of a changed file as separate documents,
//! each identified by a [`ReviewAddress`]. This crate answers the two
//! questions an editor asks about such a document:
//!
//! - Which of its lines accept a new comment ([`CommentingRangeResolver`])
//! - Where on the review server a comment on one of its lines is anchored
//!   ([`CommentPositionResolver`])
//!
//! Both are answered from the current [`DiffVersion`] of the merge request.
//! Raw hunk text is parsed into a [`FileLineCorrespondence`] that pairs old and
//! new line numbers, built lazily per file and cached by the
//! [`DiffVersionIndex`].
//!
//! ## Design Principles
//!
//! The engine itself performs no I/O. Fetching diff versions and creating
//! notes go through the [`DiffVersionProvider`] and [`ReviewServer`] traits,
//! which the embedding application implements.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gl_review_diff::{
//!     AddressScheme, CommentPositionResolver, CommentingRangeResolver, DiffVersionIndex, DisplayLine,
//! };
//!
//! let index = DiffVersionIndex::new(review, version);
//! let address = AddressScheme::default().decode(document_uri)?;
//!
//! let ranges = CommentingRangeResolver::new(&index).commenting_ranges(&address, line_count)?;
//! let anchor = CommentPositionResolver::new(&index).resolve_click(&address, DisplayLine(12))?;
//! ```

pub mod address;
pub mod correspondence;
pub mod index;
pub mod lines;
pub mod model;
pub mod parser;
pub mod resolver;
pub mod session;
pub mod traits;

// Re-export commonly used types
pub use address::{AddressError, AddressScheme, ReviewAddress, DEFAULT_SCHEME};
pub use correspondence::{DiffError, FileLineCorrespondence, InconsistentDiff};
pub use index::DiffVersionIndex;
pub use lines::{CommentingRange, DisplayLine};
pub use model::{
    CommentAnchor, DiffRefs, DiffSide, DiffVersion, Discussion, FileDiff, Hunk, HunkLine, Note,
    ReviewId,
};
pub use parser::{parse_hunks, parse_patch, ParseError};
pub use resolver::{CommentPositionResolver, CommentingRangeResolver, OldSidePolicy, PositionError};
pub use session::{ReviewError, ReviewSession};
pub use traits::{
    DiffVersionProvider, NoOpReviewServer, ProviderError, ReviewServer, ReviewServerError,
};
