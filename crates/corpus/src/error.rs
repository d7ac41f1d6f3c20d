//! Error types produced by the corpus crate.
//!
//! All errors are typed, cloneable and comparable so callers can match on
//! them precisely and tests can assert on exact variants.
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | [`DuplicateId`](CorpusError::DuplicateId) | [`Corpus::add`](crate::Corpus::add) |
//! | [`NotFound`](CorpusError::NotFound) | [`Corpus::get`](crate::Corpus::get), field-keyed subset/group |
//! | [`InvalidConfiguration`](CorpusError::InvalidConfiguration) | reader config, malformed datasets |
//! | [`Read`](CorpusError::Read) | dataset I/O |
//!
//! ```rust
//! use corpus::{Corpus, CorpusError, Document};
//!
//! let mut corpus = Corpus::new();
//! corpus.add(Document::new("a", "first")).unwrap();
//!
//! match corpus.add(Document::new("a", "again")) {
//!     Err(CorpusError::DuplicateId(id)) => assert_eq!(id.to_string(), "a"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```
use thiserror::Error;

use crate::types::DocId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CorpusError {
    /// A document with this id is already in the corpus.
    #[error("duplicate document id: {0}")]
    DuplicateId(DocId),

    /// Unknown document id or metadata field.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad reader settings or malformed input, e.g. a non-text value in the
    /// text field or a missing text column.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The dataset could not be read.
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
}

impl CorpusError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CorpusError::InvalidConfiguration(msg.into())
    }
}
