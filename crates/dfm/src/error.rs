use thiserror::Error;

/// Errors raised while building, reshaping or exporting a DFM.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DfmError {
    /// Inconsistent inputs or options, e.g. a token-sequence count that does
    /// not match the corpus, or `min_termfreq > max_termfreq`.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Unknown document variable or document name.
    #[error("not found: {0}")]
    NotFound(String),

    /// A table could not be written out.
    #[error("failed to write output: {0}")]
    Write(String),
}

impl DfmError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        DfmError::InvalidConfiguration(msg.into())
    }
}

impl From<csv::Error> for DfmError {
    fn from(err: csv::Error) -> Self {
        DfmError::Write(err.to_string())
    }
}
