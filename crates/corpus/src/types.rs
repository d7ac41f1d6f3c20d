//! Core data model: document ids, documents and their metadata.
//!
//! ```text
//! Document
//! ├── id: DocId            (Int(i64) | Name(String))
//! ├── text: String         (raw, never rewritten)
//! └── metadata: Metadata   (BTreeMap<String, serde_json::Value>)
//! ```
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open set of metadata fields (document variables).
pub type Metadata = BTreeMap<String, Value>;

/// Document identifier: an integer or a name.
///
/// Integers order before names; within a kind the natural order applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocId {
    Int(i64),
    Name(String),
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocId::Int(n) => write!(f, "{n}"),
            DocId::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for DocId {
    fn from(value: i64) -> Self {
        DocId::Int(value)
    }
}

impl From<i32> for DocId {
    fn from(value: i32) -> Self {
        DocId::Int(i64::from(value))
    }
}

impl From<&str> for DocId {
    fn from(value: &str) -> Self {
        DocId::Name(value.to_string())
    }
}

impl From<String> for DocId {
    fn from(value: String) -> Self {
        DocId::Name(value)
    }
}

impl From<&DocId> for DocId {
    fn from(value: &DocId) -> Self {
        value.clone()
    }
}

/// A single text with its id and metadata.
///
/// Built with [`Document::new`] plus [`with_meta`](Document::with_meta);
/// once handed to a [`Corpus`](crate::Corpus) it is shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: DocId,
    text: String,
    #[serde(default)]
    metadata: Metadata,
}

impl Document {
    pub fn new(id: impl Into<DocId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_meta(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(field.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> &DocId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn meta(&self, field: &str) -> Option<&Value> {
        self.metadata.get(field)
    }

    /// Metadata value rendered as a group label. `null` and absent fields
    /// have no label.
    pub fn meta_label(&self, field: &str) -> Option<String> {
        value_label(self.metadata.get(field)?)
    }
}

/// Renders a metadata value as a label: strings verbatim, numbers and
/// booleans via `Display`, arrays/objects as compact JSON.
pub fn value_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn doc_id_display_and_order() {
        assert_eq!(DocId::from(7).to_string(), "7");
        assert_eq!(DocId::from("text1").to_string(), "text1");
        assert!(DocId::from(100) < DocId::from("a"));
    }

    #[test]
    fn doc_id_serde_is_untagged() {
        assert_eq!(serde_json::to_string(&DocId::from(3)).unwrap(), "3");
        let id: DocId = serde_json::from_str("\"speech-1\"").unwrap();
        assert_eq!(id, DocId::from("speech-1"));
    }

    #[test]
    fn labels_from_metadata() {
        let doc = Document::new("d", "text")
            .with_meta("country", "Sweden")
            .with_meta("year", 1994)
            .with_meta("eu", true)
            .with_meta("note", Value::Null);
        assert_eq!(doc.meta_label("country").as_deref(), Some("Sweden"));
        assert_eq!(doc.meta_label("year").as_deref(), Some("1994"));
        assert_eq!(doc.meta_label("eu").as_deref(), Some("true"));
        assert_eq!(doc.meta_label("note"), None);
        assert_eq!(doc.meta_label("missing"), None);
        assert_eq!(doc.meta("year"), Some(&json!(1994)));
    }
}
