//! Lexis document-feature matrices.
//!
//! Counts the terms of each corpus document into a sparse matrix, reshapes
//! it (group, trim, select) and reports on it: frequency tables and
//! keyword-in-context hits.
//!
//! ## Ordering rules
//!
//! - Rows follow corpus order; grouped rows are sorted by group name
//! - Columns appear in first-occurrence order across the corpus and keep
//!   their relative order through trimming and selection
//! - Frequency tables sort by descending count, ties alphabetically
//!
//! ## Example
//!
//! ```
//! use corpus::{Corpus, Document};
//! use dfm::{frequency, DfmBuilder, DfmOptions, TrimOptions};
//!
//! let corpus = Corpus::from_documents([
//!     Document::new("a", "cat dog cat").with_meta("kind", "pets"),
//!     Document::new("b", "dog dog").with_meta("kind", "pets"),
//! ]).unwrap();
//! let terms: Vec<Vec<&str>> = corpus
//!     .iter()
//!     .map(|d| d.text().split_whitespace().collect())
//!     .collect();
//!
//! let dfm = DfmBuilder::new(DfmOptions {
//!     group_by: Some("kind".into()),
//!     trim: Some(TrimOptions::min_termfreq(3)),
//! })
//! .build(&corpus, &terms)
//! .unwrap();
//!
//! assert_eq!(dfm.docnames(), ["pets"]);
//! assert_eq!(frequency(&dfm).rows[0].feature, "dog");
//! ```

mod builder;
mod error;
mod frequency;
mod kwic;
mod matrix;
mod pattern;

pub use crate::builder::{DfmBuilder, DfmOptions};
pub use crate::error::DfmError;
pub use crate::frequency::{
    frequency, frequency_by, write_tables_csv, FeatureFrequency, FrequencyTable,
};
pub use crate::kwic::{kwic, kwic_corpus, KwicHit};
pub use crate::matrix::{Dfm, TrimOptions};
pub use crate::pattern::{matches_any, Pattern};

#[cfg(test)]
mod tests {
    use corpus::Corpus;
    use tokens::{tokenize, NormalizeConfig, Normalizer, Resources, TokenizeConfig};

    use super::*;

    fn preprocess(corpus: &Corpus) -> Vec<Vec<tokens::Token>> {
        let cfg = TokenizeConfig {
            remove_punct: true,
            ..Default::default()
        };
        let normalizer =
            Normalizer::new(&NormalizeConfig::default(), &Resources::new()).expect("normalizer");
        corpus
            .iter()
            .map(|doc| normalizer.normalize(tokenize(doc.text(), &cfg).expect("tokenize")))
            .collect()
    }

    #[test]
    fn row_sums_match_token_counts() {
        let corpus = Corpus::from_texts([
            "Fellow citizens, we meet today.",
            "We the People!",
            "",
        ]);
        let toks = preprocess(&corpus);
        let dfm = DfmBuilder::default().build(&corpus, &toks).unwrap();
        for (doc, seq) in toks.iter().enumerate() {
            assert_eq!(dfm.row_sum(doc), seq.len() as u64);
        }
        assert_eq!(dfm.count(1, "we"), 1);
        assert_eq!(dfm.col_sums()[dfm.feature_index("we").unwrap()], 2);
    }

    #[test]
    fn frequency_of_cat_and_dog() {
        let corpus = Corpus::from_texts(["cat dog cat", "dog dog"]);
        let toks = preprocess(&corpus);
        let dfm = DfmBuilder::default().build(&corpus, &toks).unwrap();
        let table = frequency(&dfm);
        let top: Vec<(&str, u64)> = table
            .rows
            .iter()
            .map(|r| (r.feature.as_str(), r.frequency))
            .collect();
        assert_eq!(top, [("dog", 3), ("cat", 2)]);
    }

    #[test]
    fn kwic_over_tokens_reports_source_text() {
        let tokens = tokenize("Ask not what your country", &TokenizeConfig::default()).unwrap();
        let hits = kwic(&tokens, &Pattern::new("country"), 2, false);
        assert_eq!(hits[0].position, 4);
        assert_eq!(hits[0].pre, ["what", "your"]);
    }
}
