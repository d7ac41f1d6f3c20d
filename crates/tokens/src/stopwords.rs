//! Stopword lists.
//!
//! Lists are plain data: either one of the bundled `stop-words` lists picked
//! by [`Language`], or any caller-supplied word set. Matching is exact and
//! case-sensitive, so lower-case tokens before filtering when case should not
//! matter.

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::token::Token;

/// A set of terms removed by [`remove_stopwords`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopwordList {
    words: FxHashSet<String>,
}

impl StopwordList {
    /// The bundled list for `language`.
    pub fn for_language(language: Language) -> Self {
        stop_words::get(language.stopword_language())
            .iter()
            .map(|w| w.to_string())
            .collect()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        words.into_iter().map(Into::into).collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        self.words.insert(word.into())
    }

    pub fn remove(&mut self, word: &str) -> bool {
        self.words.remove(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in sorted order, for display and stable serialization.
    pub fn sorted(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.words.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}

impl FromIterator<String> for StopwordList {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

impl Extend<String> for StopwordList {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.words.extend(iter);
    }
}

/// Drops every token whose text is in `list`, keeping the order of the rest.
pub fn remove_stopwords(tokens: Vec<Token>, list: &StopwordList) -> Vec<Token> {
    if list.is_empty() {
        return tokens;
    }
    tokens
        .into_iter()
        .filter(|t| !list.contains(&t.text))
        .collect()
}
