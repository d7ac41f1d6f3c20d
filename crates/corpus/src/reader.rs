//! Dataset readers: CSV/TSV and JSON (array or lines) into a [`Corpus`].
//!
//! One column holds the text, one optional column the id, and everything
//! else becomes metadata. Texts are stored verbatim; only metadata strings
//! are sanitized.
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{info, warn, Level};

use crate::config::{DataFormat, ReaderConfig};
use crate::corpus::Corpus;
use crate::error::CorpusError;
use crate::metadata::{infer_value, sanitize, sanitize_value};
use crate::types::{DocId, Document, Metadata};

const INLINE_SOURCE: &str = "<reader>";

/// Reads a delimited dataset with a header row.
pub fn read_csv<R: Read>(input: R, cfg: &ReaderConfig) -> Result<Corpus, CorpusError> {
    cfg.validate()?;
    let format = match cfg.format {
        Some(DataFormat::Tsv) => DataFormat::Tsv,
        _ => DataFormat::Csv,
    };
    csv_records(input, cfg, format, INLINE_SOURCE)
}

/// Reads a JSON array of objects.
pub fn read_json<R: Read>(input: R, cfg: &ReaderConfig) -> Result<Corpus, CorpusError> {
    cfg.validate()?;
    json_array(input, cfg, INLINE_SOURCE)
}

/// Reads one JSON object per line; blank lines are skipped.
pub fn read_json_lines<R: BufRead>(input: R, cfg: &ReaderConfig) -> Result<Corpus, CorpusError> {
    cfg.validate()?;
    json_lines(input, cfg, INLINE_SOURCE)
}

/// Reads a dataset file, picking the format from `cfg.format` or the file
/// extension.
pub fn read_path(path: impl AsRef<Path>, cfg: &ReaderConfig) -> Result<Corpus, CorpusError> {
    let start = Instant::now();
    let path = path.as_ref();
    let source = path.display().to_string();

    let span = tracing::span!(Level::INFO, "corpus.read", path = %source);
    let _guard = span.enter();

    match read_path_inner(path, &source, cfg) {
        Ok((corpus, format)) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                format = ?format,
                documents = corpus.len(),
                fields = corpus.fields().len(),
                elapsed_micros,
                "corpus_read_success"
            );
            Ok(corpus)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(error = %err, elapsed_micros, "corpus_read_failure");
            Err(err)
        }
    }
}

fn read_path_inner(
    path: &Path,
    source: &str,
    cfg: &ReaderConfig,
) -> Result<(Corpus, DataFormat), CorpusError> {
    cfg.validate()?;
    let format = cfg
        .format
        .or_else(|| DataFormat::from_path(path))
        .ok_or_else(|| {
            CorpusError::invalid(format!(
                "cannot infer dataset format of {source}; set `format` explicitly"
            ))
        })?;
    let file = File::open(path).map_err(|e| read_error(source, e))?;

    let mut corpus = match format {
        DataFormat::Csv | DataFormat::Tsv => csv_records(file, cfg, format, source)?,
        DataFormat::Json => json_array(BufReader::new(file), cfg, source)?,
        DataFormat::JsonLines => json_lines(BufReader::new(file), cfg, source)?,
    };
    if cfg.name.is_none() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            corpus.set_name(stem);
        }
    }
    Ok((corpus, format))
}

fn read_error(source: &str, err: impl std::fmt::Display) -> CorpusError {
    CorpusError::Read {
        path: source.to_string(),
        message: err.to_string(),
    }
}

fn new_corpus(cfg: &ReaderConfig) -> Corpus {
    match &cfg.name {
        Some(name) => Corpus::named(name.clone()),
        None => Corpus::new(),
    }
}

fn default_id(record: usize) -> DocId {
    DocId::Name(format!("text{record}"))
}

fn csv_records<R: Read>(
    input: R,
    cfg: &ReaderConfig,
    format: DataFormat,
    source: &str,
) -> Result<Corpus, CorpusError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(cfg.delimiter_for(format))
        .from_reader(input);

    let headers = reader.headers().map_err(|e| read_error(source, e))?.clone();
    let text_col = headers
        .iter()
        .position(|h| h == cfg.text_field)
        .ok_or_else(|| {
            CorpusError::invalid(format!(
                "text column `{}` not found; available columns: {:?}",
                cfg.text_field,
                headers.iter().collect::<Vec<_>>()
            ))
        })?;
    let id_col = match &cfg.id_field {
        Some(field) => Some(headers.iter().position(|h| h == field).ok_or_else(|| {
            CorpusError::invalid(format!("id column `{field}` not found"))
        })?),
        None => None,
    };

    let mut corpus = new_corpus(cfg);
    for (idx, row) in reader.records().enumerate() {
        let record_no = idx + 1;
        let row = row.map_err(|e| read_error(source, e))?;

        let id = match id_col {
            Some(col) => {
                let cell = sanitize(row.get(col).unwrap_or_default(), cfg.strip_control_chars)
                    .ok_or_else(|| {
                        CorpusError::invalid(format!("record {record_no} has an empty id"))
                    })?;
                match cell.parse::<i64>() {
                    Ok(n) => DocId::Int(n),
                    Err(_) => DocId::Name(cell),
                }
            }
            None => default_id(record_no),
        };

        let text = row.get(text_col).unwrap_or_default();
        let metadata: Metadata = headers
            .iter()
            .zip(row.iter())
            .enumerate()
            .filter(|(col, _)| *col != text_col && Some(*col) != id_col)
            .map(|(_, (name, cell))| {
                (name.to_string(), infer_value(cell, cfg.strip_control_chars))
            })
            .collect();

        corpus.add(Document::new(id, text).with_metadata(metadata))?;
    }
    Ok(corpus)
}

fn json_array<R: Read>(input: R, cfg: &ReaderConfig, source: &str) -> Result<Corpus, CorpusError> {
    let records: Vec<Value> = serde_json::from_reader(input).map_err(|e| read_error(source, e))?;
    let mut corpus = new_corpus(cfg);
    for (idx, record) in records.into_iter().enumerate() {
        corpus.add(json_document(record, idx + 1, cfg)?)?;
    }
    Ok(corpus)
}

fn json_lines<R: BufRead>(input: R, cfg: &ReaderConfig, source: &str) -> Result<Corpus, CorpusError> {
    let mut corpus = new_corpus(cfg);
    let mut record_no = 0;
    for (line_idx, line) in input.lines().enumerate() {
        let line = line.map_err(|e| read_error(source, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Value = serde_json::from_str(&line)
            .map_err(|e| read_error(source, format!("line {}: {e}", line_idx + 1)))?;
        record_no += 1;
        corpus.add(json_document(record, record_no, cfg)?)?;
    }
    Ok(corpus)
}

fn json_document(
    record: Value,
    record_no: usize,
    cfg: &ReaderConfig,
) -> Result<Document, CorpusError> {
    let Value::Object(mut fields) = record else {
        return Err(CorpusError::invalid(format!(
            "record {record_no} is not a JSON object"
        )));
    };

    let text = match fields.remove(&cfg.text_field) {
        Some(Value::String(text)) => text,
        Some(other) => {
            return Err(CorpusError::invalid(format!(
                "field `{}` of record {record_no} is not text: {other}",
                cfg.text_field
            )))
        }
        None => {
            return Err(CorpusError::invalid(format!(
                "record {record_no} has no `{}` field",
                cfg.text_field
            )))
        }
    };

    let id = match &cfg.id_field {
        Some(field) => json_id(fields.remove(field), field, record_no, cfg)?,
        None => default_id(record_no),
    };

    Ok(Document::new(id, text).with_metadata(json_metadata(fields, cfg)))
}

fn json_id(
    value: Option<Value>,
    field: &str,
    record_no: usize,
    cfg: &ReaderConfig,
) -> Result<DocId, CorpusError> {
    match value {
        Some(Value::Number(n)) if n.is_i64() => Ok(DocId::Int(n.as_i64().unwrap_or_default())),
        Some(Value::String(s)) => sanitize(&s, cfg.strip_control_chars)
            .map(DocId::Name)
            .ok_or_else(|| CorpusError::invalid(format!("record {record_no} has an empty id"))),
        Some(other) => Err(CorpusError::invalid(format!(
            "id field `{field}` of record {record_no} must be an integer or string, got {other}"
        ))),
        None => Err(CorpusError::invalid(format!(
            "record {record_no} has no `{field}` field"
        ))),
    }
}

fn json_metadata(fields: Map<String, Value>, cfg: &ReaderConfig) -> Metadata {
    fields
        .into_iter()
        .map(|(k, v)| (k, sanitize_value(v, cfg.strip_control_chars)))
        .collect()
}
