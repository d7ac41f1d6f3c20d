use thiserror::Error;

/// Errors produced while configuring the token layer.
///
/// Tokenizing itself never fails; everything here is raised while validating
/// a config or resolving a language-keyed resource.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenError {
    /// Unsupported flag combination, reserved version, or an unknown
    /// stopword-list / lemma-table identifier.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A resource file could not be read.
    #[error("failed to read resource {path}: {message}")]
    Resource { path: String, message: String },
}

impl TokenError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        TokenError::InvalidConfiguration(msg.into())
    }
}
