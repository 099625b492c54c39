//! Error types.
//!
//! `StoreError` covers failures of the external collaborators (snapshot
//! fetches, mastery writes, translation upserts). It lives in `hafalan-core`
//! so the practice driver can classify failures without string matching.

use thiserror::Error;

use crate::model::Language;

/// Errors that can occur when talking to the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Authentication was rejected (invalid API key).
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// The store returned an error response.
    #[error("store error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A response or document could not be decoded.
    #[error("failed to decode store data: {0}")]
    Decode(String),

    /// Local I/O failed (file-backed stores).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` if repeating the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            StoreError::Unauthorized(_) | StoreError::NotFound(_) | StoreError::Decode(_)
        )
    }
}

/// Invalid quiz configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("source and target language are both {0}; pick two different languages")]
    SameLanguage(Language),

    #[error("max questions must be at least 1")]
    ZeroQuestions,
}
