//! Seams to the external collaborators of the engine.

mod review_server;
mod version_provider;

pub use review_server::{NoOpReviewServer, ReviewServer, ReviewServerError};
pub use version_provider::{DiffVersionProvider, ProviderError};
