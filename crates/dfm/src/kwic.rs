//! Keyword-in-context search over token sequences.
use std::fmt;

use corpus::Corpus;
use serde::{Deserialize, Serialize};

use crate::error::DfmError;
use crate::pattern::Pattern;

/// One match with its surrounding tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KwicHit {
    /// Set by [`kwic_corpus`].
    pub docname: Option<String>,
    /// Index of the keyword in its token sequence.
    pub position: usize,
    pub pre: Vec<String>,
    pub keyword: String,
    pub post: Vec<String>,
}

impl fmt::Display for KwicHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.docname {
            Some(doc) => write!(f, "[{doc}, {}]", self.position)?,
            None => write!(f, "[{}]", self.position)?,
        }
        write!(
            f,
            " {} | {} | {}",
            self.pre.join(" "),
            self.keyword,
            self.post.join(" ")
        )
    }
}

/// Every position in `tokens` matching `pattern`, with up to `window`
/// tokens of context on each side. Token text is reported as given.
///
/// ```rust
/// use dfm::{kwic, Pattern};
///
/// let hits = kwic(&["a", "b", "c", "d", "e"], &Pattern::new("c"), 1, false);
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].position, 2);
/// assert_eq!(hits[0].pre, ["b"]);
/// assert_eq!(hits[0].post, ["d"]);
/// ```
pub fn kwic<T: AsRef<str>>(
    tokens: &[T],
    pattern: &Pattern,
    window: usize,
    case_insensitive: bool,
) -> Vec<KwicHit> {
    let text = |t: &T| t.as_ref().to_string();
    tokens
        .iter()
        .enumerate()
        .filter(|(_, tok)| pattern.matches(tok.as_ref(), case_insensitive))
        .map(|(pos, tok)| KwicHit {
            docname: None,
            position: pos,
            pre: tokens[pos.saturating_sub(window)..pos].iter().map(text).collect(),
            keyword: text(tok),
            post: tokens[pos + 1..(pos + 1 + window).min(tokens.len())]
                .iter()
                .map(text)
                .collect(),
        })
        .collect()
}

/// Runs [`kwic`] over every document, in corpus order. `docs[i]` holds the
/// tokens of the i-th document.
pub fn kwic_corpus<D, T>(
    corpus: &Corpus,
    docs: &[D],
    pattern: &Pattern,
    window: usize,
    case_insensitive: bool,
) -> Result<Vec<KwicHit>, DfmError>
where
    D: AsRef<[T]>,
    T: AsRef<str>,
{
    if docs.len() != corpus.len() {
        return Err(DfmError::invalid(format!(
            "{} token sequences for a corpus of {} documents",
            docs.len(),
            corpus.len()
        )));
    }
    let mut hits = Vec::new();
    for (doc, tokens) in corpus.iter().zip(docs) {
        let name = doc.id().to_string();
        hits.extend(
            kwic(tokens.as_ref(), pattern, window, case_insensitive)
                .into_iter()
                .map(|hit| KwicHit {
                    docname: Some(name.clone()),
                    ..hit
                }),
        );
    }
    Ok(hits)
}
