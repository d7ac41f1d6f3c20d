//! Configuration types for the tokenizer.
//!
//! [`TokenizeConfig`] controls how raw text is split and which token
//! categories survive. It is `Copy`, serializable, and validated once up
//! front so the tokenizer itself can stay infallible.
//!
//! # Versioning
//!
//! The `version` field tracks tokenizer behaviour. Any change that alters
//! output for the same input bumps it. Version 0 is reserved and rejected.
//!
//! # Examples
//!
//! ```rust
//! use tokens::{TokenizeConfig, TokenizeMode};
//!
//! let config = TokenizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert_eq!(config.mode, TokenizeMode::Word);
//! assert!(config.remove_separators);
//! assert!(!config.remove_punct);
//!
//! let bag_of_words = TokenizeConfig {
//!     remove_punct: true,
//!     remove_numbers: true,
//!     remove_symbols: true,
//!     remove_url: true,
//!     ..Default::default()
//! };
//! assert!(bag_of_words.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// How raw text is cut into tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenizeMode {
    /// Whitespace first, then Unicode word boundaries (UAX #29) inside each
    /// chunk, so `"world!"` becomes `"world"`, `"!"`.
    #[default]
    Word,
    /// Whitespace only. Each whitespace-delimited chunk is one token.
    Whitespace,
}

/// Configuration for [`tokenize`](crate::tokenize).
///
/// # Fields
///
/// - `version`: behaviour version, must be >= 1
/// - `mode`: word-boundary or whitespace-only splitting
/// - `remove_numbers`, `remove_punct`, `remove_symbols`, `remove_url`:
///   drop tokens of that category
/// - `remove_separators`: drop whitespace tokens (on by default)
/// - `split_hyphens`: break hyphenated words apart
/// - `normalize_unicode`: NFKC before splitting
///
/// # Serialization
///
/// ```json
/// {
///   "version": 1,
///   "mode": "word",
///   "remove_numbers": false,
///   "remove_punct": true,
///   "remove_symbols": false,
///   "remove_url": false,
///   "remove_separators": true,
///   "split_hyphens": false,
///   "normalize_unicode": false
/// }
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TokenizeConfig {
    /// Behaviour version. Version 0 is reserved.
    pub version: u32,

    /// Splitting strategy.
    pub mode: TokenizeMode,

    /// Drop tokens made of digits (with `.`, `,` or `'` group separators).
    pub remove_numbers: bool,

    /// Drop tokens made entirely of Unicode punctuation.
    pub remove_punct: bool,

    /// Drop tokens made of Unicode symbols (math, currency, modifier, other),
    /// which includes most emoji.
    pub remove_symbols: bool,

    /// Drop `scheme://...` and `www....` tokens.
    pub remove_url: bool,

    /// Drop whitespace runs. With this off, every whitespace run is emitted
    /// as a [`TokenKind::Separator`](crate::TokenKind::Separator) token and
    /// the token texts concatenate back to the input.
    pub remove_separators: bool,

    /// Split `self-aware` into `self`, `-`, `aware`. Only meaningful in
    /// [`TokenizeMode::Word`].
    pub split_hyphens: bool,

    /// Apply NFKC normalization before splitting.
    ///
    /// When enabled, token offsets refer to the normalized text rather than
    /// the raw input, so reconstruction from offsets needs the normalized
    /// string.
    pub normalize_unicode: bool,
}

impl TokenizeConfig {
    /// Checks for reserved versions and flag combinations the tokenizer does
    /// not support.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.version == 0 {
            return Err(TokenError::invalid("tokenize version must be >= 1"));
        }
        if self.mode == TokenizeMode::Whitespace && self.split_hyphens {
            return Err(TokenError::invalid(
                "split_hyphens requires word mode; whitespace mode never splits inside a chunk",
            ));
        }
        Ok(())
    }
}

impl Default for TokenizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            mode: TokenizeMode::Word,
            remove_numbers: false,
            remove_punct: false,
            remove_symbols: false,
            remove_url: false,
            remove_separators: true,
            split_hyphens: false,
            normalize_unicode: false,
        }
    }
}
