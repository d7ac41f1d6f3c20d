//! Workspace umbrella crate for lexis.
//!
//! Stitches the token, corpus and DFM layers into one [`Pipeline`]:
//! tokenize → normalize → reduce per document, then count the results into
//! a document-feature matrix. Stage settings come from a [`PipelineConfig`]
//! (or a YAML [`LexisConfig`]); stopword lists and lemma tables from an
//! explicit [`Resources`] catalog.
//!
//! ```
//! use lexis::{frequency, Corpus, Pipeline, PipelineConfig, Resources};
//!
//! let corpus = Corpus::from_texts(["The cat saw the dog.", "Dogs chase cats!"]);
//! let mut cfg = PipelineConfig::default();
//! cfg.tokenize.remove_punct = true;
//!
//! let pipeline = Pipeline::new(&cfg, &Resources::new()).unwrap();
//! let dfm = pipeline.build_dfm(&corpus).unwrap();
//! assert_eq!(dfm.ndoc(), 2);
//! assert_eq!(frequency(&dfm).rows[0].feature, "the");
//! ```

mod config;
mod summary;

pub use config::{ConfigLoadError, LexisConfig};
pub use corpus::{
    Corpus, CorpusError, DataFormat, DocId, Document, Metadata, ReaderConfig, read_csv,
    read_json, read_json_lines, read_path,
};
pub use dfm::{
    Dfm, DfmBuilder, DfmError, DfmOptions, FeatureFrequency, FrequencyTable, KwicHit, Pattern,
    TrimOptions, frequency, frequency_by, kwic, kwic_corpus, write_tables_csv,
};
pub use summary::DocSummary;
pub use tokens::{
    Language, LemmaTable, NormalizeConfig, Normalizer, ReduceConfig, Resources, StopwordList,
    TermReducer, Token, TokenError, TokenKind, TokenizeConfig, TokenizeMode, tokenize,
};

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{Level, info, warn};

/// Errors that can occur while running documents through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Token(TokenError),
    Corpus(CorpusError),
    Dfm(DfmError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Token(err) => write!(f, "token stage failure: {err}"),
            PipelineError::Corpus(err) => write!(f, "corpus failure: {err}"),
            PipelineError::Dfm(err) => write!(f, "dfm construction failure: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Token(err) => Some(err),
            PipelineError::Corpus(err) => Some(err),
            PipelineError::Dfm(err) => Some(err),
        }
    }
}

impl From<TokenError> for PipelineError {
    fn from(value: TokenError) -> Self {
        PipelineError::Token(value)
    }
}

impl From<CorpusError> for PipelineError {
    fn from(value: CorpusError) -> Self {
        PipelineError::Corpus(value)
    }
}

impl From<DfmError> for PipelineError {
    fn from(value: DfmError) -> Self {
        PipelineError::Dfm(value)
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_tokenize(&self, latency: Duration, result: Result<(), TokenError>);
    /// Normalization and term reduction of one document.
    fn record_normalize(&self, latency: Duration, tokens_in: usize, tokens_out: usize);
    fn record_dfm(&self, latency: Duration, result: Result<(), DfmError>);
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start(recorder: Option<&Arc<dyn PipelineMetrics>>) -> Option<Self> {
        recorder.map(|recorder| Self {
            recorder: Arc::clone(recorder),
            start: Instant::now(),
        })
    }

    fn record_tokenize(self, result: Result<(), TokenError>) {
        self.recorder.record_tokenize(self.start.elapsed(), result);
    }

    fn record_normalize(self, tokens_in: usize, tokens_out: usize) {
        self.recorder
            .record_normalize(self.start.elapsed(), tokens_in, tokens_out);
    }

    fn record_dfm(self, result: Result<(), DfmError>) {
        self.recorder.record_dfm(self.start.elapsed(), result);
    }
}

/// Settings for every pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub tokenize: TokenizeConfig,
    pub normalize: NormalizeConfig,
    pub reduce: ReduceConfig,
    pub dfm: DfmOptions,
    /// Process documents on the rayon pool. Output order is unaffected.
    pub use_parallel: bool,
}

/// A validated, ready-to-run preprocessing pipeline.
///
/// Building one resolves every resource up front, so a constructed pipeline
/// only fails on inputs (e.g. a grouping field no document has).
#[derive(Clone)]
pub struct Pipeline {
    tokenize: TokenizeConfig,
    normalizer: Normalizer,
    reducer: Option<TermReducer>,
    dfm: DfmBuilder,
    use_parallel: bool,
    metrics: Option<Arc<dyn PipelineMetrics>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("tokenize", &self.tokenize)
            .field("normalizer", &self.normalizer)
            .field("reducer", &self.reducer)
            .field("dfm", &self.dfm)
            .field("use_parallel", &self.use_parallel)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl Pipeline {
    pub fn new(cfg: &PipelineConfig, resources: &Resources) -> Result<Self, PipelineError> {
        cfg.tokenize.validate()?;
        cfg.dfm.validate()?;
        Ok(Self {
            tokenize: cfg.tokenize,
            normalizer: Normalizer::new(&cfg.normalize, resources)?,
            reducer: TermReducer::from_config(&cfg.reduce, resources)?,
            dfm: DfmBuilder::new(cfg.dfm.clone()),
            use_parallel: cfg.use_parallel,
            metrics: None,
        })
    }

    pub fn from_config(cfg: &LexisConfig, resources: &Resources) -> Result<Self, PipelineError> {
        Self::new(&cfg.pipeline_config(), resources)
    }

    /// Attaches a metrics observer; every later call reports to it.
    pub fn with_metrics(mut self, recorder: Arc<dyn PipelineMetrics>) -> Self {
        self.metrics = Some(recorder);
        self
    }

    pub fn dfm_options(&self) -> &DfmOptions {
        self.dfm.options()
    }

    /// Tokenizes only: token texts stay as written in the source.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, PipelineError> {
        let span = MetricsSpan::start(self.metrics.as_ref());
        let result = tokens::tokenize(text, &self.tokenize);
        if let Some(span) = span {
            span.record_tokenize(result.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        Ok(result?)
    }

    /// Tokenize, normalize and reduce one text.
    pub fn process_text(&self, text: &str) -> Result<Vec<Token>, PipelineError> {
        let toks = self.tokenize(text)?;
        let span = MetricsSpan::start(self.metrics.as_ref());
        let tokens_in = toks.len();
        let mut toks = self.normalizer.normalize(toks);
        if let Some(reducer) = &self.reducer {
            toks = reducer.reduce_tokens(toks);
        }
        if let Some(span) = span {
            span.record_normalize(tokens_in, toks.len());
        }
        Ok(toks)
    }

    /// Preprocessed tokens of every document, in corpus order.
    pub fn process_corpus(&self, corpus: &Corpus) -> Result<Vec<Vec<Token>>, PipelineError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "lexis.process_corpus",
            documents = corpus.len(),
            parallel = self.use_parallel
        );
        let _guard = span.enter();

        match self.map_documents(corpus, |doc| self.process_text(doc.text())) {
            Ok(docs) => {
                let elapsed_micros = start.elapsed().as_micros();
                info!(
                    tokens = docs.iter().map(Vec::len).sum::<usize>(),
                    elapsed_micros,
                    "pipeline_corpus_processed"
                );
                Ok(docs)
            }
            Err(err) => {
                let elapsed_micros = start.elapsed().as_micros();
                warn!(error = %err, elapsed_micros, "pipeline_corpus_failure");
                Err(err)
            }
        }
    }

    /// Raw tokens of every document, in corpus order.
    pub fn tokenize_corpus(&self, corpus: &Corpus) -> Result<Vec<Vec<Token>>, PipelineError> {
        self.map_documents(corpus, |doc| self.tokenize(doc.text()))
    }

    fn map_documents<T, F>(&self, corpus: &Corpus, f: F) -> Result<Vec<T>, PipelineError>
    where
        T: Send,
        F: Fn(&Document) -> Result<T, PipelineError> + Send + Sync,
    {
        if self.use_parallel {
            corpus
                .documents()
                .par_iter()
                .map(|doc| f(doc.as_ref()))
                .collect()
        } else {
            corpus.iter().map(f).collect()
        }
    }

    /// Runs the pipeline over `corpus` and builds the configured DFM.
    pub fn build_dfm(&self, corpus: &Corpus) -> Result<Dfm, PipelineError> {
        let docs = self.process_corpus(corpus)?;
        self.build_dfm_from_tokens(corpus, &docs)
    }

    /// Builds the configured DFM from already preprocessed tokens.
    pub fn build_dfm_from_tokens(
        &self,
        corpus: &Corpus,
        docs: &[Vec<Token>],
    ) -> Result<Dfm, PipelineError> {
        let span = MetricsSpan::start(self.metrics.as_ref());
        let result = self.dfm.build(corpus, docs);
        if let Some(span) = span {
            span.record_dfm(result.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        Ok(result?)
    }

    /// Frequency tables over the configured DFM.
    ///
    /// With a grouping field the matrix is grouped (then trimmed) first and
    /// each group gets its own table; otherwise a single table is returned.
    pub fn frequency_tables(
        &self,
        corpus: &Corpus,
    ) -> Result<Vec<FrequencyTable>, PipelineError> {
        let dfm = self.build_dfm(corpus)?;
        match &self.dfm_options().group_by {
            Some(field) => Ok(frequency_by(&dfm, field)?),
            None => Ok(vec![frequency(&dfm)]),
        }
    }

    /// Token, type and sentence counts per document, on raw tokens.
    pub fn summarize(&self, corpus: &Corpus) -> Result<Vec<DocSummary>, PipelineError> {
        let docs = self.tokenize_corpus(corpus)?;
        Ok(summary::summarize(corpus, &docs))
    }

    /// Keyword-in-context search over raw tokens, so hits read as written.
    pub fn kwic(
        &self,
        corpus: &Corpus,
        pattern: &Pattern,
        window: usize,
        case_insensitive: bool,
    ) -> Result<Vec<KwicHit>, PipelineError> {
        let docs = self.tokenize_corpus(corpus)?;
        Ok(kwic_corpus(corpus, &docs, pattern, window, case_insensitive)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::RwLock;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn stemming_config() -> PipelineConfig {
        PipelineConfig {
            tokenize: TokenizeConfig {
                remove_punct: true,
                ..Default::default()
            },
            normalize: NormalizeConfig {
                stopwords: Some("en".into()),
                ..Default::default()
            },
            reduce: ReduceConfig::Stem {
                language: "en".into(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn process_text_runs_every_stage() {
        let pipeline = Pipeline::new(&stemming_config(), &Resources::new()).unwrap();
        let toks = pipeline.process_text("The Dogs were running!").unwrap();
        assert_eq!(texts(&toks), ["dog", "run"]);
    }

    #[test]
    fn tokenize_keeps_source_text() {
        let pipeline = Pipeline::new(&stemming_config(), &Resources::new()).unwrap();
        let toks = pipeline.tokenize("The Dogs").unwrap();
        assert_eq!(texts(&toks), ["The", "Dogs"]);
    }

    #[test]
    fn unknown_stopword_list_fails_at_build() {
        let cfg = PipelineConfig {
            normalize: NormalizeConfig {
                stopwords: Some("klingon".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            Pipeline::new(&cfg, &Resources::new()),
            Err(PipelineError::Token(TokenError::InvalidConfiguration(_)))
        ));
    }

    #[test]
    fn parallel_matches_sequential() {
        let corpus =
            Corpus::from_texts((0..40).map(|i| format!("doc {i} says hello to doc {}", i + 1)));
        let seq = Pipeline::new(&stemming_config(), &Resources::new()).unwrap();
        let par = Pipeline::new(
            &PipelineConfig {
                use_parallel: true,
                ..stemming_config()
            },
            &Resources::new(),
        )
        .unwrap();
        assert_eq!(
            seq.process_corpus(&corpus).unwrap(),
            par.process_corpus(&corpus).unwrap()
        );
        assert_eq!(seq.build_dfm(&corpus).unwrap(), par.build_dfm(&corpus).unwrap());
    }

    #[test]
    fn group_by_unknown_field_surfaces_dfm_error() {
        let cfg = PipelineConfig {
            dfm: DfmOptions {
                group_by: Some("party".into()),
                trim: None,
            },
            ..Default::default()
        };
        let pipeline = Pipeline::new(&cfg, &Resources::new()).unwrap();
        let err = pipeline
            .build_dfm(&Corpus::from_texts(["a b"]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Dfm(DfmError::NotFound(_))));
        assert!(err.source().is_some());
    }

    #[test]
    fn frequency_tables_follow_group_then_trim() {
        let corpus = Corpus::from_documents([
            Document::new(1, "union").with_meta("party", "A"),
            Document::new(2, "union").with_meta("party", "A"),
            Document::new(3, "liberty").with_meta("party", "B"),
            Document::new(4, "liberty").with_meta("party", "C"),
        ])
        .unwrap();
        let cfg = PipelineConfig {
            dfm: DfmOptions {
                group_by: Some("party".into()),
                trim: Some(TrimOptions {
                    min_docfreq: Some(2),
                    ..Default::default()
                }),
            },
            ..Default::default()
        };
        let pipeline = Pipeline::new(&cfg, &Resources::new()).unwrap();
        let tables = pipeline.frequency_tables(&corpus).unwrap();

        let groups: Vec<Option<&str>> = tables.iter().map(|t| t.group.as_deref()).collect();
        assert_eq!(groups, [Some("A"), Some("B"), Some("C")]);
        assert!(tables[0].rows.is_empty());
        for table in &tables[1..] {
            let rows: Vec<(&str, u64)> = table
                .rows
                .iter()
                .map(|r| (r.feature.as_str(), r.frequency))
                .collect();
            assert_eq!(rows, [("liberty", 1)]);
        }

        let ungrouped = Pipeline::new(&PipelineConfig::default(), &Resources::new()).unwrap();
        let tables = ungrouped.frequency_tables(&corpus).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].group, None);
        // untrimmed and tied at 2, so alphabetical
        assert_eq!(tables[0].rows[0].feature, "liberty");
        assert_eq!(tables[0].rows[1].feature, "union");
    }

    #[test]
    fn summary_counts() {
        let pipeline = Pipeline::new(&PipelineConfig::default(), &Resources::new()).unwrap();
        let corpus = Corpus::from_texts(["We the People. We hold these truths!"]);
        let summary = pipeline.summarize(&corpus).unwrap();
        assert_eq!(summary[0].docname, "text1");
        assert_eq!(summary[0].ntoken, 9);
        assert_eq!(summary[0].ntype, 8);
        assert_eq!(summary[0].nsentence, 2);
    }

    #[test]
    fn kwic_reports_original_case() {
        let pipeline = Pipeline::new(&stemming_config(), &Resources::new()).unwrap();
        let corpus = Corpus::from_texts(["Government of the People, by the People"]);
        let hits = pipeline
            .kwic(&corpus, &Pattern::new("people"), 2, true)
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].keyword, "People");
        assert_eq!(hits[0].pre, ["of", "the"]);
        assert_eq!(hits[1].docname.as_deref(), Some("text1"));
    }

    #[derive(Default)]
    struct CountingMetrics {
        events: RwLock<Vec<&'static str>>,
    }

    impl CountingMetrics {
        fn snapshot(&self) -> Vec<&'static str> {
            self.events.read().unwrap().clone()
        }
    }

    impl PipelineMetrics for CountingMetrics {
        fn record_tokenize(&self, _latency: Duration, result: Result<(), TokenError>) {
            let label = if result.is_ok() {
                "tokenize_ok"
            } else {
                "tokenize_err"
            };
            self.events.write().unwrap().push(label);
        }

        fn record_normalize(&self, _latency: Duration, tokens_in: usize, tokens_out: usize) {
            assert!(tokens_out <= tokens_in);
            self.events.write().unwrap().push("normalize");
        }

        fn record_dfm(&self, _latency: Duration, result: Result<(), DfmError>) {
            let label = if result.is_ok() { "dfm_ok" } else { "dfm_err" };
            self.events.write().unwrap().push(label);
        }
    }

    #[test]
    fn metrics_recorder_tracks_pipeline_outcome() {
        let metrics = Arc::new(CountingMetrics::default());
        let pipeline = Pipeline::new(&stemming_config(), &Resources::new())
            .unwrap()
            .with_metrics(metrics.clone());

        let corpus = Corpus::from_texts(["This is a metrics payload", "and another"]);
        pipeline.build_dfm(&corpus).unwrap();

        let events = metrics.snapshot();
        assert_eq!(
            events,
            ["tokenize_ok", "normalize", "tokenize_ok", "normalize", "dfm_ok"]
        );
    }
}
