//! Lexis corpus layer.
//!
//! Holds the documents a pipeline runs over: each one an id, the raw text
//! and a bag of metadata fields ("document variables"). Corpora can be
//! subset and grouped on that metadata, and loaded from CSV/TSV or JSON
//! datasets.
//!
//! ## What we do here
//!
//! - **Keep ids unique** - [`Corpus::add`] rejects duplicates instead of
//!   silently overwriting
//! - **Preserve order** - documents, subsets and groups always come back in
//!   insertion order
//! - **Share, don't copy** - subsets and groups are views over the same
//!   reference-counted documents
//! - **Read datasets** - one text column, an optional id column, every other
//!   column as typed metadata
//!
//! ## Example
//!
//! ```
//! use corpus::{read_csv, ReaderConfig};
//!
//! let data = "id,text,party\n\
//!             a,We the people,Democratic\n\
//!             b,Four score,Republican\n\
//!             c,Ask not,Democratic\n";
//! let cfg = ReaderConfig { id_field: Some("id".into()), ..Default::default() };
//! let corpus = read_csv(data.as_bytes(), &cfg).unwrap();
//!
//! let by_party = corpus.group_by_field("party").unwrap();
//! assert_eq!(by_party["Democratic"].docnames(), ["a", "c"]);
//! ```

mod config;
mod corpus;
mod error;
mod metadata;
mod reader;
mod types;

pub use crate::config::{DataFormat, ReaderConfig};
pub use crate::corpus::Corpus;
pub use crate::error::CorpusError;
pub use crate::reader::{read_csv, read_json, read_json_lines, read_path};
pub use crate::types::{value_label, DocId, Document, Metadata};
