//! Dataset reader configuration.
//!
//! ```rust
//! use corpus::{DataFormat, ReaderConfig};
//!
//! let cfg = ReaderConfig {
//!     text_field: "speech".into(),
//!     id_field: Some("doc_id".into()),
//!     ..Default::default()
//! };
//! cfg.validate().expect("valid reader config");
//! assert_eq!(DataFormat::from_path("inaugural.jsonl"), Some(DataFormat::JsonLines));
//! ```
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CorpusError;

/// On-disk layouts the readers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFormat {
    Csv,
    Tsv,
    /// A single JSON array of objects.
    Json,
    /// One JSON object per line.
    JsonLines,
}

impl DataFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(DataFormat::Csv),
            "tsv" | "tab" => Some(DataFormat::Tsv),
            "json" => Some(DataFormat::Json),
            "jsonl" | "ndjson" => Some(DataFormat::JsonLines),
            _ => None,
        }
    }
}

/// How a tabular dataset maps onto documents.
///
/// `text_field` names the column holding the document text, `id_field`
/// (optional) the column holding its id. Every other column becomes
/// metadata. Without an id column documents are named `text1`, `text2`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub text_field: String,
    pub id_field: Option<String>,

    /// Overrides extension-based detection in [`read_path`](crate::read_path).
    pub format: Option<DataFormat>,

    /// CSV field delimiter; defaults to `,` (or tab for [`DataFormat::Tsv`]).
    pub delimiter: Option<char>,

    pub strip_control_chars: bool,

    /// Name given to the resulting corpus.
    pub name: Option<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            text_field: "text".to_string(),
            id_field: None,
            format: None,
            delimiter: None,
            strip_control_chars: true,
            name: None,
        }
    }
}

impl ReaderConfig {
    pub fn validate(&self) -> Result<(), CorpusError> {
        if self.text_field.trim().is_empty() {
            return Err(CorpusError::invalid("text_field must not be empty"));
        }
        if let Some(id) = &self.id_field {
            if id.trim().is_empty() {
                return Err(CorpusError::invalid("id_field must not be empty"));
            }
            if id == &self.text_field {
                return Err(CorpusError::invalid(
                    "id_field and text_field must name different columns",
                ));
            }
        }
        if let Some(d) = self.delimiter {
            if !d.is_ascii() || d == '"' || d == '\n' || d == '\r' {
                return Err(CorpusError::invalid(format!(
                    "delimiter {d:?} must be a single ASCII character other than quote or newline"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn delimiter_for(&self, format: DataFormat) -> u8 {
        match (self.delimiter, format) {
            // validate() guarantees ASCII
            (Some(d), _) => d as u8,
            (None, DataFormat::Tsv) => b'\t',
            (None, _) => b',',
        }
    }
}
