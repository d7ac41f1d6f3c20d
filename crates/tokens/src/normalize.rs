use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::resources::Resources;
use crate::stopwords::{remove_stopwords, StopwordList};
use crate::token::Token;

/// Configuration for [`Normalizer`].
///
/// ```json
/// { "lowercase": true, "stopwords": "en", "extra_stopwords": ["said"], "min_nchar": 2 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Full Unicode lower-casing before any filtering.
    pub lowercase: bool,
    /// Identifier of a stopword list resolved through [`Resources`].
    pub stopwords: Option<String>,
    /// Words removed in addition to the named list.
    pub extra_stopwords: Vec<String>,
    /// Drop tokens shorter than this many characters.
    pub min_nchar: Option<usize>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            stopwords: None,
            extra_stopwords: Vec::new(),
            min_nchar: None,
        }
    }
}

/// Case folding plus stopword and length filtering, applied per document.
#[derive(Debug, Clone)]
pub struct Normalizer {
    lowercase: bool,
    stopwords: Option<Arc<StopwordList>>,
    min_nchar: Option<usize>,
}

impl Normalizer {
    /// Resolves the configured stopword list and builds the normalizer.
    pub fn new(cfg: &NormalizeConfig, resources: &Resources) -> Result<Self, TokenError> {
        if cfg.min_nchar == Some(0) {
            return Err(TokenError::invalid("min_nchar must be >= 1 when set"));
        }

        let named = cfg
            .stopwords
            .as_deref()
            .map(|id| resources.stopwords(id))
            .transpose()?;

        let stopwords = match (named, cfg.extra_stopwords.is_empty()) {
            (named, true) => named,
            (named, false) => {
                let mut merged = named.map(|list| (*list).clone()).unwrap_or_default();
                merged.extend(cfg.extra_stopwords.iter().cloned());
                Some(Arc::new(merged))
            }
        };

        Ok(Self {
            lowercase: cfg.lowercase,
            stopwords,
            min_nchar: cfg.min_nchar,
        })
    }

    pub fn with_stopwords(mut self, list: StopwordList) -> Self {
        self.stopwords = Some(Arc::new(list));
        self
    }

    pub fn stopwords(&self) -> Option<&StopwordList> {
        self.stopwords.as_deref()
    }

    /// Lower-cases (if enabled), then removes stopwords and short tokens.
    pub fn normalize(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut tokens = if self.lowercase {
            lowercase_tokens(tokens)
        } else {
            tokens
        };
        if let Some(list) = self.stopwords.as_deref() {
            tokens = remove_stopwords(tokens, list);
        }
        if let Some(min) = self.min_nchar {
            tokens.retain(|t| t.text.chars().count() >= min);
        }
        tokens
    }
}

/// Full Unicode lower-casing of every token's text.
pub fn lowercase_tokens(mut tokens: Vec<Token>) -> Vec<Token> {
    for token in &mut tokens {
        if token.text.chars().any(char::is_uppercase) {
            token.text = token.text.to_lowercase();
        }
    }
    tokens
}
