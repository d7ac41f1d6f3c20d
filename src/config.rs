//! YAML configuration file support.
//!
//! One file configures every stage: how the dataset is read, how text is
//! tokenized and normalized, which term reduction runs, and how the DFM is
//! reshaped.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "inaugural speeches"
//! use_parallel: true
//!
//! corpus:
//!   text_field: text
//!   id_field: doc_id
//!   strip_control_chars: true
//!
//! tokenize:
//!   version: 1
//!   mode: word
//!   remove_punct: true
//!   remove_numbers: true
//!   remove_url: true
//!
//! normalize:
//!   lowercase: true
//!   stopwords: en
//!   extra_stopwords: ["applause"]
//!   min_nchar: 2
//!
//! reduce:
//!   method: stem
//!   language: en
//!
//! dfm:
//!   group_by: party
//!   trim:
//!     min_termfreq: 5
//! ```

use std::fs;
use std::path::Path;

use corpus::ReaderConfig;
use dfm::DfmOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokens::{NormalizeConfig, ReduceConfig, TokenizeConfig};

use crate::PipelineConfig;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for a lexis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LexisConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Process documents on the rayon pool
    #[serde(default)]
    pub use_parallel: bool,

    #[serde(default)]
    pub corpus: ReaderConfig,

    #[serde(default)]
    pub tokenize: TokenizeConfig,

    #[serde(default)]
    pub normalize: NormalizeConfig,

    #[serde(default)]
    pub reduce: ReduceConfig,

    #[serde(default)]
    pub dfm: DfmOptions,
}

impl LexisConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: LexisConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks the version and every stage section.
    ///
    /// Resource ids (stopword lists, lemma tables) are resolved later, when
    /// a [`Pipeline`](crate::Pipeline) is built against a
    /// [`Resources`](tokens::Resources) catalog.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.corpus
            .validate()
            .map_err(|e| section_error("corpus", e))?;
        self.tokenize
            .validate()
            .map_err(|e| section_error("tokenize", e))?;
        if self.normalize.min_nchar == Some(0) {
            return Err(ConfigLoadError::Validation(
                "normalize.min_nchar must be >= 1".to_string(),
            ));
        }
        if let ReduceConfig::Lemmatize { language, path } = &self.reduce {
            if language.is_some() == path.is_some() {
                return Err(ConfigLoadError::Validation(
                    "reduce.lemmatize takes exactly one of `language` or `path`".to_string(),
                ));
            }
        }
        self.dfm.validate().map_err(|e| section_error("dfm", e))?;

        Ok(())
    }

    /// The stage settings a [`Pipeline`](crate::Pipeline) is built from.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            tokenize: self.tokenize,
            normalize: self.normalize.clone(),
            reduce: self.reduce.clone(),
            dfm: self.dfm.clone(),
            use_parallel: self.use_parallel,
        }
    }
}

fn section_error(section: &str, err: impl std::fmt::Display) -> ConfigLoadError {
    ConfigLoadError::Validation(format!("{section}: {err}"))
}

impl Default for LexisConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            use_parallel: false,
            corpus: ReaderConfig::default(),
            tokenize: TokenizeConfig::default(),
            normalize: NormalizeConfig::default(),
            reduce: ReduceConfig::default(),
            dfm: DfmOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokens::TokenizeMode;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
tokenize:
  remove_punct: true
normalize:
  stopwords: en
"#;

        let config = LexisConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("test config".to_string()));
        assert!(config.tokenize.remove_punct);
        assert!(config.tokenize.remove_separators);
        assert_eq!(config.tokenize.mode, TokenizeMode::Word);
        assert_eq!(config.normalize.stopwords.as_deref(), Some("en"));
        assert!(config.normalize.lowercase);
        assert_eq!(config.reduce, ReduceConfig::None);
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
reduce:
  method: stem
  language: en
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = LexisConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.reduce,
            ReduceConfig::Stem {
                language: "en".into()
            }
        );
    }

    #[test]
    fn test_default_config() {
        let config = LexisConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_unsupported_version() {
        let result = LexisConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(
            result,
            Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn test_tokenize_validation() {
        let yaml = r#"
version: "1.0"
tokenize:
  mode: whitespace
  split_hyphens: true
"#;

        let result = LexisConfig::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("tokenize"));
    }

    #[test]
    fn test_lemmatize_requires_one_source() {
        let yaml = r#"
version: "1.0"
reduce:
  method: lemmatize
"#;
        let err = LexisConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("exactly one"));
    }

    #[test]
    fn test_trim_range_validation() {
        let yaml = r#"
version: "1.0"
dfm:
  trim:
    min_termfreq: 10
    max_termfreq: 2
"#;
        let err = LexisConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("dfm"));
    }

    #[test]
    fn test_full_yaml_roundtrip() {
        let yaml = r#"
version: "1.0"
name: "inaugural"
use_parallel: true

corpus:
  text_field: speech
  id_field: doc_id
  format: csv

tokenize:
  version: 1
  remove_punct: true
  remove_numbers: true
  split_hyphens: true

normalize:
  stopwords: en
  extra_stopwords: ["applause"]
  min_nchar: 2

reduce:
  method: lemmatize
  path: lemmas.tsv

dfm:
  group_by: party
  trim:
    min_termfreq: 5
    min_docfreq: 2
"#;

        let config = LexisConfig::from_yaml(yaml).unwrap();
        assert!(config.use_parallel);
        assert_eq!(config.corpus.text_field, "speech");
        assert_eq!(config.corpus.format, Some(corpus::DataFormat::Csv));
        assert!(config.tokenize.split_hyphens);
        assert_eq!(config.normalize.extra_stopwords, ["applause"]);
        assert_eq!(config.dfm.group_by.as_deref(), Some("party"));
        assert_eq!(config.dfm.trim.and_then(|t| t.min_docfreq), Some(2));

        let again = LexisConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(again, config);
    }
}
