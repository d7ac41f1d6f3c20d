//! Term reduction: stemming or lemmatization.
//!
//! Both strategies map a token to a root form and plug in after
//! normalization. Stemming strips suffixes with the Snowball algorithm of a
//! language (Porter2 for English) and may over-stem (`"university"` →
//! `"univers"`). Lemmatization swaps a token for its canonical form from a
//! lookup table and leaves unknown tokens alone.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

use rust_stemmers::Stemmer;
use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::language::Language;
use crate::lemma::LemmaTable;
use crate::resources::Resources;
use crate::token::{Token, TokenKind};

/// Selects a term-reduction strategy at configuration time.
///
/// ```yaml
/// reduce:
///   method: stem
///   language: en
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ReduceConfig {
    #[default]
    None,
    Stem {
        language: String,
    },
    /// Exactly one of `language` (a registered table) or `path` (a TSV file).
    Lemmatize {
        #[serde(default)]
        language: Option<String>,
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

/// Snowball stemmer for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnowballStemmer {
    language: Language,
}

impl SnowballStemmer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn stem<'t>(&self, term: &'t str) -> Cow<'t, str> {
        stem_with(&Stemmer::create(self.language.algorithm()), term)
    }
}

/// Never lets a stem grow past the input length.
fn stem_with<'t>(stemmer: &Stemmer, term: &'t str) -> Cow<'t, str> {
    let stemmed = stemmer.stem(term);
    if stemmed.chars().count() > term.chars().count() {
        Cow::Borrowed(term)
    } else {
        stemmed
    }
}

/// Table-lookup lemmatizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lemmatizer {
    table: Arc<LemmaTable>,
}

impl Lemmatizer {
    pub fn new(table: impl Into<Arc<LemmaTable>>) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn lemmatize<'t>(&self, term: &'t str) -> Cow<'t, str> {
        match self.table.lookup(term) {
            Some(lemma) => Cow::Owned(lemma.to_string()),
            None => Cow::Borrowed(term),
        }
    }
}

/// The two term-reduction strategies behind one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermReducer {
    Stem(SnowballStemmer),
    Lemmatize(Lemmatizer),
}

impl TermReducer {
    pub fn stemmer(language: Language) -> Self {
        TermReducer::Stem(SnowballStemmer::new(language))
    }

    pub fn lemmatizer(table: impl Into<Arc<LemmaTable>>) -> Self {
        TermReducer::Lemmatize(Lemmatizer::new(table))
    }

    /// Builds the configured reducer; `Ok(None)` means no reduction.
    pub fn from_config(
        cfg: &ReduceConfig,
        resources: &Resources,
    ) -> Result<Option<Self>, TokenError> {
        match cfg {
            ReduceConfig::None => Ok(None),
            ReduceConfig::Stem { language } => {
                Ok(Some(Self::stemmer(Language::from_code(language)?)))
            }
            ReduceConfig::Lemmatize {
                language: Some(_),
                path: Some(_),
            } => Err(TokenError::invalid(
                "lemmatize takes either `language` or `path`, not both",
            )),
            ReduceConfig::Lemmatize {
                language: Some(id),
                path: None,
            } => Ok(Some(Self::lemmatizer(resources.lemmas(id)?))),
            ReduceConfig::Lemmatize {
                language: None,
                path: Some(path),
            } => Ok(Some(Self::lemmatizer(LemmaTable::from_path(path)?))),
            ReduceConfig::Lemmatize {
                language: None,
                path: None,
            } => Err(TokenError::invalid(
                "lemmatize requires a `language` or a `path`",
            )),
        }
    }

    /// Reduces a single term.
    pub fn reduce<'t>(&self, term: &'t str) -> Cow<'t, str> {
        match self {
            TermReducer::Stem(stemmer) => stemmer.stem(term),
            TermReducer::Lemmatize(lemmatizer) => lemmatizer.lemmatize(term),
        }
    }

    /// Rewrites word tokens in place; numbers, punctuation, symbols, URLs
    /// and separators pass through untouched.
    pub fn reduce_tokens(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        match self {
            TermReducer::Stem(s) => {
                let stemmer = Stemmer::create(s.language.algorithm());
                for token in tokens.iter_mut().filter(|t| t.kind == TokenKind::Word) {
                    let stem = match stem_with(&stemmer, &token.text) {
                        Cow::Owned(stem) => Some(stem),
                        Cow::Borrowed(_) => None,
                    };
                    if let Some(stem) = stem {
                        token.text = stem;
                    }
                }
            }
            TermReducer::Lemmatize(lemmatizer) => {
                for token in tokens.iter_mut().filter(|t| t.kind == TokenKind::Word) {
                    if let Some(lemma) = lemmatizer.table.lookup(&token.text) {
                        token.text = lemma.to_string();
                    }
                }
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_tokens(words: &[&str]) -> Vec<Token> {
        words
            .iter()
            .map(|w| Token::new(*w, 0, w.len(), TokenKind::Word))
            .collect()
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn english_stemming() {
        let reducer = TermReducer::stemmer(Language::English);
        assert_eq!(reducer.reduce("running"), "run");
        assert_eq!(reducer.reduce("cats"), "cat");
        assert_eq!(reducer.reduce("connection"), "connect");
    }

    #[test]
    fn stems_never_longer_than_input() {
        let reducer = TermReducer::stemmer(Language::English);
        for word in ["happy", "generously", "university", "a", "", "skies", "dying"] {
            let stem = reducer.reduce(word);
            assert!(stem.chars().count() <= word.chars().count(), "{word} -> {stem}");
        }
    }

    #[test]
    fn lemmatization_substitutes_known_tokens_only() {
        let reducer = TermReducer::lemmatizer(LemmaTable::from_pairs([
            ("was", "be"),
            ("mice", "mouse"),
        ]));
        let out = reducer.reduce_tokens(word_tokens(&["mice", "was", "here"]));
        assert_eq!(texts(&out), ["mouse", "be", "here"]);
    }

    #[test]
    fn reduction_skips_non_word_tokens() {
        let reducer = TermReducer::stemmer(Language::English);
        let tokens = vec![
            Token::new("jumping", 0, 7, TokenKind::Word),
            Token::new("https://running.example", 8, 31, TokenKind::Url),
        ];
        let out = reducer.reduce_tokens(tokens);
        assert_eq!(texts(&out), ["jump", "https://running.example"]);
    }

    #[test]
    fn config_selects_variant() {
        let mut resources = Resources::new();
        resources.register_lemmas("en", LemmaTable::from_pairs([("geese", "goose")]));

        let stem = TermReducer::from_config(
            &ReduceConfig::Stem {
                language: "en".into(),
            },
            &resources,
        )
        .unwrap();
        assert!(matches!(stem, Some(TermReducer::Stem(_))));

        let lemma = TermReducer::from_config(
            &ReduceConfig::Lemmatize {
                language: Some("en".into()),
                path: None,
            },
            &resources,
        )
        .unwrap()
        .unwrap();
        assert_eq!(lemma.reduce("geese"), "goose");

        assert_eq!(
            TermReducer::from_config(&ReduceConfig::None, &resources).unwrap(),
            None
        );
    }

    #[test]
    fn lemmatize_requires_exactly_one_source() {
        let resources = Resources::new();
        for cfg in [
            ReduceConfig::Lemmatize {
                language: None,
                path: None,
            },
            ReduceConfig::Lemmatize {
                language: Some("en".into()),
                path: Some(PathBuf::from("lemmas.tsv")),
            },
        ] {
            assert!(matches!(
                TermReducer::from_config(&cfg, &resources),
                Err(TokenError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn reduce_config_from_json() {
        let cfg: ReduceConfig =
            serde_json::from_str(r#"{"method": "stem", "language": "de"}"#).unwrap();
        assert_eq!(
            cfg,
            ReduceConfig::Stem {
                language: "de".into()
            }
        );
    }
}
