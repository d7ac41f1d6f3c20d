//! Token → lemma tables.
//!
//! Tables are loaded from plain data, never baked into the binary. The file
//! format is one `token<TAB>lemma` pair per line; blank lines and lines
//! starting with `#` are skipped.
//!
//! ```text
//! # English verb forms
//! was	be
//! were	be
//! running	run
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TokenError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemmaTable {
    entries: FxHashMap<String, String>,
}

impl LemmaTable {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses tab-separated pairs. A later line for the same token wins.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, TokenError> {
        let mut entries = FxHashMap::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|err| TokenError::Resource {
                path: "<reader>".into(),
                message: err.to_string(),
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((token, lemma)) = trimmed.split_once('\t') else {
                return Err(TokenError::invalid(format!(
                    "lemma table line {} is not `token<TAB>lemma`",
                    idx + 1
                )));
            };
            let (token, lemma) = (token.trim(), lemma.trim());
            if token.is_empty() || lemma.is_empty() {
                return Err(TokenError::invalid(format!(
                    "lemma table line {} has an empty field",
                    idx + 1
                )));
            }
            entries.insert(token.to_string(), lemma.to_string());
        }
        Ok(Self { entries })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TokenError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| TokenError::Resource {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let table = Self::from_reader(BufReader::new(file))?;
        debug!(path = %path.display(), entries = table.len(), "lemma_table_loaded");
        Ok(table)
    }

    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn insert(&mut self, token: impl Into<String>, lemma: impl Into<String>) {
        self.entries.insert(token.into(), lemma.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
