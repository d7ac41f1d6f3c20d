//! Lexis token layer.
//!
//! Turns raw text into token sequences that the corpus and DFM layers can
//! count. Everything here is a pure function of `(text, config, resources)`.
//!
//! ## What we do
//!
//! - Tokenization on whitespace plus Unicode word boundaries, with byte
//!   spans back into the source text
//! - Category tagging (word, number, punctuation, symbol, URL, separator) so
//!   whole categories can be dropped
//! - Case folding and stopword removal
//! - Term reduction: Snowball stemming or table-lookup lemmatization
//! - Language-keyed stopword lists and lemma tables, passed in explicitly
//!
//! ## Invariants worth knowing
//!
//! - Tokenizing never fails; configs are validated up front
//! - Token spans always point at the source text, even after the token text
//!   is lower-cased, stemmed or lemmatized
//! - With separators kept and nothing removed, token texts concatenate back
//!   to the input
//! - Stopword matching is exact; lower-case first for case-insensitive runs
//!
//! ## Example
//!
//! ```
//! use tokens::{tokenize, Normalizer, NormalizeConfig, Resources, TermReducer, Language, TokenizeConfig};
//!
//! let cfg = TokenizeConfig { remove_punct: true, ..Default::default() };
//! let toks = tokenize("The runners were running quickly!", &cfg).unwrap();
//!
//! let normalizer = Normalizer::new(
//!     &NormalizeConfig { stopwords: Some("en".into()), ..Default::default() },
//!     &Resources::new(),
//! ).unwrap();
//! let toks = normalizer.normalize(toks);
//! let toks = TermReducer::stemmer(Language::English).reduce_tokens(toks);
//!
//! let stems: Vec<&str> = toks.iter().map(|t| t.text.as_str()).collect();
//! assert!(stems.contains(&"run"));
//! ```

mod config;
mod error;
mod language;
mod lemma;
mod normalize;
mod reduce;
mod resources;
mod stopwords;
mod token;

pub use crate::config::{TokenizeConfig, TokenizeMode};
pub use crate::error::TokenError;
pub use crate::language::Language;
pub use crate::lemma::LemmaTable;
pub use crate::normalize::{lowercase_tokens, NormalizeConfig, Normalizer};
pub use crate::reduce::{Lemmatizer, ReduceConfig, SnowballStemmer, TermReducer};
pub use crate::resources::Resources;
pub use crate::stopwords::{remove_stopwords, StopwordList};
pub use crate::token::{tokenize, tokenize_iter, Token, TokenKind, Tokens};
