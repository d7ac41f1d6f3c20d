//! Per-document corpus summary: token, type and sentence counts.
use std::collections::BTreeSet;

use corpus::{Corpus, Metadata};
use serde::{Deserialize, Serialize};
use tokens::Token;
use unicode_segmentation::UnicodeSegmentation;

/// One summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocSummary {
    pub docname: String,
    /// Distinct token texts (case-sensitive).
    pub ntype: usize,
    pub ntoken: usize,
    pub nsentence: usize,
    pub metadata: Metadata,
}

/// Summarizes each document from its tokens; `tokens[i]` belongs to the
/// i-th document. Sentences are counted on the raw text (UAX #29).
pub(crate) fn summarize(corpus: &Corpus, tokens: &[Vec<Token>]) -> Vec<DocSummary> {
    corpus
        .iter()
        .zip(tokens)
        .map(|(doc, toks)| DocSummary {
            docname: doc.id().to_string(),
            ntype: toks
                .iter()
                .map(|t| t.text.as_str())
                .collect::<BTreeSet<_>>()
                .len(),
            ntoken: toks.len(),
            nsentence: doc
                .text()
                .unicode_sentences()
                .filter(|s| !s.trim().is_empty())
                .count(),
            metadata: doc.metadata().clone(),
        })
        .collect()
}
