//! Virtual document addresses for "a file at a specific commit".
//!
//! An address looks like
//!
//! ```text
//! gl-review:src/main.rs?%7B%22commit%22%3A%22abc%22%2C%22mrId%22%3A2%2C...%7D
//! ```
//!
//! The path component is the file path, the query is the compact JSON object
//! `{commit, mrId, projectId, repositoryRoot}` with its keys in sorted order.
//! Both are form-encoded. Logically equal addresses always encode to the same
//! string, which editors rely on for document identity.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;

/// Scheme used when none is configured.
pub const DEFAULT_SCHEME: &str = "gl-review";

/// Errors that can occur when decoding an address.
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("Expected a {expected}: address, got {address:?}")]
    WrongScheme { expected: String, address: String },
    #[error("Address has no query component: {0:?}")]
    MissingQuery(String),
    #[error("Address component is not properly encoded: {0:?}")]
    MalformedComponent(String),
    #[error("Invalid address query: {0}")]
    InvalidQuery(#[from] serde_json::Error),
}

/// Identity of a file blob at a commit of a merge request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAddress {
    /// Repository-relative path. Empty for a "no content" placeholder, e.g.
    /// the missing side of an added or deleted file.
    pub path: String,
    pub commit: String,
    pub repository_root: String,
    pub project_id: u64,
    pub mr_id: u64,
}

impl ReviewAddress {
    /// Whether this address stands for a document without content.
    pub fn is_placeholder(&self) -> bool {
        self.path.is_empty()
    }
}

/// Query part of an address. Field order is the serialized key order and
/// must stay sorted.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressQuery {
    commit: String,
    mr_id: u64,
    project_id: u64,
    repository_root: String,
}

/// Encoder/decoder for addresses of one scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressScheme {
    scheme: String,
}

impl Default for AddressScheme {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEME)
    }
}

impl AddressScheme {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Encode an address into its string form.
    pub fn encode(&self, address: &ReviewAddress) -> String {
        let query = AddressQuery {
            commit: address.commit.clone(),
            mr_id: address.mr_id,
            project_id: address.project_id,
            repository_root: address.repository_root.clone(),
        };
        // Serializing a plain struct of strings and integers cannot fail
        let json = serde_json::to_string(&query).unwrap_or_default();

        format!(
            "{}:{}?{}",
            self.scheme,
            encode_path(&address.path),
            encode_component(&json)
        )
    }

    /// Decode an address produced by [`Self::encode`].
    pub fn decode(&self, address: &str) -> Result<ReviewAddress, AddressError> {
        let rest = address
            .strip_prefix(self.scheme.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| AddressError::WrongScheme {
                expected: self.scheme.clone(),
                address: address.to_string(),
            })?;

        let (path, query) = rest
            .split_once('?')
            .ok_or_else(|| AddressError::MissingQuery(address.to_string()))?;

        let path = path
            .split('/')
            .map(decode_component)
            .collect::<Result<Vec<_>, _>>()?
            .join("/");
        let query: AddressQuery = serde_json::from_str(&decode_component(query)?)?;

        Ok(ReviewAddress {
            path,
            commit: query.commit,
            repository_root: query.repository_root,
            project_id: query.project_id,
            mr_id: query.mr_id,
        })
    }
}

fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Encode every segment on its own so the `/` separators stay readable.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_component)
        .collect::<Vec<_>>()
        .join("/")
}

fn decode_component(value: &str) -> Result<String, AddressError> {
    // Encoded components never contain raw pair separators
    if value.contains(['&', '=']) {
        return Err(AddressError::MalformedComponent(value.to_string()));
    }

    Ok(form_urlencoded::parse(value.as_bytes())
        .next()
        .map(|(decoded, _)| decoded.into_owned())
        .unwrap_or_default())
}
