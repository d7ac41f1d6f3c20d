use std::time::Instant;

use corpus::Corpus;
use serde::{Deserialize, Serialize};
use tracing::{info, warn, Level};

use crate::error::DfmError;
use crate::matrix::{Dfm, TrimOptions};

/// Reshaping applied after counting: grouping first, then trimming.
///
/// ```yaml
/// dfm:
///   group_by: party
///   trim:
///     min_termfreq: 5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DfmOptions {
    pub group_by: Option<String>,
    pub trim: Option<TrimOptions>,
}

impl DfmOptions {
    pub fn validate(&self) -> Result<(), DfmError> {
        if let Some(field) = &self.group_by {
            if field.trim().is_empty() {
                return Err(DfmError::invalid("group_by must name a document variable"));
            }
        }
        if let Some(trim) = &self.trim {
            trim.validate()?;
        }
        Ok(())
    }
}

/// Builds a [`Dfm`] from a corpus and its token sequences.
#[derive(Debug, Clone, Default)]
pub struct DfmBuilder {
    options: DfmOptions,
}

impl DfmBuilder {
    pub fn new(options: DfmOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DfmOptions {
        &self.options
    }

    /// `docs[i]` holds the terms of the i-th corpus document.
    ///
    /// Rows follow corpus order and are named after document ids; document
    /// metadata becomes the row's docvars.
    pub fn build<D, T>(&self, corpus: &Corpus, docs: &[D]) -> Result<Dfm, DfmError>
    where
        D: AsRef<[T]>,
        T: AsRef<str>,
    {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "dfm.build",
            documents = corpus.len(),
            group_by = ?self.options.group_by
        );
        let _guard = span.enter();

        match self.build_inner(corpus, docs) {
            Ok(dfm) => {
                let elapsed_micros = start.elapsed().as_micros();
                info!(
                    rows = dfm.ndoc(),
                    features = dfm.nfeat(),
                    elapsed_micros,
                    "dfm_built"
                );
                Ok(dfm)
            }
            Err(err) => {
                let elapsed_micros = start.elapsed().as_micros();
                warn!(error = %err, elapsed_micros, "dfm_build_failure");
                Err(err)
            }
        }
    }

    fn build_inner<D, T>(&self, corpus: &Corpus, docs: &[D]) -> Result<Dfm, DfmError>
    where
        D: AsRef<[T]>,
        T: AsRef<str>,
    {
        self.options.validate()?;
        if docs.len() != corpus.len() {
            return Err(DfmError::invalid(format!(
                "{} token sequences for a corpus of {} documents",
                docs.len(),
                corpus.len()
            )));
        }

        let docvars = corpus.iter().map(|d| d.metadata().clone()).collect();
        let mut dfm = Dfm::from_terms(corpus.docnames(), docvars, docs)?;
        if let Some(field) = &self.options.group_by {
            dfm = dfm.group_by(field)?;
        }
        if let Some(trim) = &self.options.trim {
            dfm = dfm.trim(trim)?;
        }
        Ok(dfm)
    }
}
