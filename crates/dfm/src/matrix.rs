//! The sparse document-feature matrix and its reshaping operations.
//!
//! ```text
//!               features (first-occurrence order)
//!             ┌──────┬──────┬──────┐
//!  docnames   │ cat  │ dog  │ bird │
//!  ───────────┼──────┼──────┼──────┤
//!  text1      │  2   │  1   │  .   │   rows: sorted (column, count) pairs
//!  text2      │  .   │  2   │  1   │   zero cells are not stored
//!             └──────┴──────┴──────┘
//! ```
use std::collections::BTreeMap;
use std::io::Write;

use corpus::{value_label, Metadata};
use fxhash::{FxHashMap, FxHashSet};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::DfmError;
use crate::pattern::{matches_any, Pattern};

/// Column-wise limits for [`Dfm::trim`]. Unset limits do not apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrimOptions {
    pub min_termfreq: Option<u64>,
    pub max_termfreq: Option<u64>,
    pub min_docfreq: Option<u64>,
    pub max_docfreq: Option<u64>,
}

impl TrimOptions {
    pub fn min_termfreq(min: u64) -> Self {
        Self {
            min_termfreq: Some(min),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), DfmError> {
        check_range("termfreq", self.min_termfreq, self.max_termfreq)?;
        check_range("docfreq", self.min_docfreq, self.max_docfreq)
    }

    fn keeps(&self, termfreq: u64, docfreq: u64) -> bool {
        self.min_termfreq.map_or(true, |min| termfreq >= min)
            && self.max_termfreq.map_or(true, |max| termfreq <= max)
            && self.min_docfreq.map_or(true, |min| docfreq >= min)
            && self.max_docfreq.map_or(true, |max| docfreq <= max)
    }
}

fn check_range(what: &str, min: Option<u64>, max: Option<u64>) -> Result<(), DfmError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(DfmError::invalid(format!(
            "min_{what} ({min}) exceeds max_{what} ({max})"
        ))),
        _ => Ok(()),
    }
}

/// Document-feature matrix: one row per document, one column per distinct
/// term, cells holding counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dfm {
    docnames: Vec<String>,
    docvars: Vec<Metadata>,
    features: Vec<String>,
    rows: Vec<Vec<(u32, u64)>>,
    #[serde(skip)]
    index: FxHashMap<String, u32>,
}

impl Dfm {
    /// Counts terms per document. Whitespace-only terms are not counted.
    ///
    /// Row names must be unique: ids `1` and `"1"` are distinct in a corpus
    /// but would share a row name here, so they are rejected.
    pub fn from_terms<D, T>(
        docnames: Vec<String>,
        docvars: Vec<Metadata>,
        docs: &[D],
    ) -> Result<Self, DfmError>
    where
        D: AsRef<[T]>,
        T: AsRef<str>,
    {
        if docnames.len() != docs.len() || docvars.len() != docs.len() {
            return Err(DfmError::invalid(format!(
                "{} token sequences for {} documents",
                docs.len(),
                docnames.len()
            )));
        }
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        if let Some(dup) = docnames.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(DfmError::invalid(format!(
                "document name '{dup}' is used by more than one document"
            )));
        }

        let mut features: Vec<String> = Vec::new();
        let mut index: FxHashMap<String, u32> = FxHashMap::default();
        let mut rows = Vec::with_capacity(docs.len());

        for doc in docs {
            let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
            for term in doc.as_ref() {
                let term = term.as_ref();
                if term.trim().is_empty() {
                    continue;
                }
                let col = match index.get(term) {
                    Some(&col) => col,
                    None => {
                        let col = u32::try_from(features.len())
                            .map_err(|_| DfmError::invalid("vocabulary exceeds u32::MAX features"))?;
                        features.push(term.to_string());
                        index.insert(term.to_string(), col);
                        col
                    }
                };
                *counts.entry(col).or_insert(0) += 1;
            }
            rows.push(counts.into_iter().collect());
        }

        Ok(Self {
            docnames,
            docvars,
            features,
            rows,
            index,
        })
    }

    pub fn ndoc(&self) -> usize {
        self.rows.len()
    }

    pub fn nfeat(&self) -> usize {
        self.features.len()
    }

    pub fn docnames(&self) -> &[String] {
        &self.docnames
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn docvars(&self, doc: usize) -> Option<&Metadata> {
        self.docvars.get(doc)
    }

    pub fn doc_index(&self, docname: &str) -> Option<usize> {
        self.docnames.iter().position(|d| d == docname)
    }

    pub fn feature_index(&self, feature: &str) -> Option<usize> {
        self.index.get(feature).map(|&c| c as usize)
    }

    /// Count of `feature` in row `doc`; zero for unknown features or rows.
    pub fn count(&self, doc: usize, feature: &str) -> u64 {
        let (Some(row), Some(&col)) = (self.rows.get(doc), self.index.get(feature)) else {
            return 0;
        };
        row.binary_search_by_key(&col, |&(c, _)| c)
            .map_or(0, |pos| row[pos].1)
    }

    /// Non-zero cells of row `doc` as `(feature, count)`, in column order.
    pub fn row(&self, doc: usize) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.rows
            .get(doc)
            .into_iter()
            .flatten()
            .map(|&(col, n)| (self.features[col as usize].as_str(), n))
    }

    pub fn row_sum(&self, doc: usize) -> u64 {
        self.rows
            .get(doc)
            .map_or(0, |row| row.iter().map(|&(_, n)| n).sum())
    }

    /// Tokens counted per document.
    pub fn ntoken(&self) -> Vec<u64> {
        (0..self.ndoc()).map(|d| self.row_sum(d)).collect()
    }

    /// Distinct features per document.
    pub fn ntype(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }

    /// Total count per feature, in column order.
    pub fn col_sums(&self) -> Vec<u64> {
        let mut sums = vec![0u64; self.nfeat()];
        for row in &self.rows {
            for &(col, n) in row {
                sums[col as usize] += n;
            }
        }
        sums
    }

    /// Number of documents containing each feature, in column order.
    pub fn docfreq(&self) -> Vec<u64> {
        let mut df = vec![0u64; self.nfeat()];
        for row in &self.rows {
            for &(col, _) in row {
                df[col as usize] += 1;
            }
        }
        df
    }

    /// The `n` most frequent features; ties in alphabetical order.
    pub fn topfeatures(&self, n: usize) -> Vec<(&str, u64)> {
        let mut totals: Vec<(&str, u64)> = self
            .features
            .iter()
            .map(String::as_str)
            .zip(self.col_sums())
            .collect();
        totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        totals.truncate(n);
        totals
    }

    /// Dense copy, rows by columns.
    pub fn to_dense(&self) -> Vec<Vec<u64>> {
        self.rows
            .iter()
            .map(|row| {
                let mut dense = vec![0u64; self.nfeat()];
                for &(col, n) in row {
                    dense[col as usize] = n;
                }
                dense
            })
            .collect()
    }

    /// Writes non-zero cells as `docname,feature,count` rows with a header.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<(), DfmError> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(["docname", "feature", "count"])?;
        for (doc, docname) in self.docnames.iter().enumerate() {
            for (feature, n) in self.row(doc) {
                let count = n.to_string();
                writer.write_record([docname.as_str(), feature, count.as_str()])?;
            }
        }
        writer.flush().map_err(|e| DfmError::Write(e.to_string()))
    }

    /// Drops columns outside the limits; survivors keep their order.
    pub fn trim(&self, opts: &TrimOptions) -> Result<Dfm, DfmError> {
        opts.validate()?;
        let keep: Vec<bool> = self
            .col_sums()
            .into_iter()
            .zip(self.docfreq())
            .map(|(tf, df)| opts.keeps(tf, df))
            .collect();
        let trimmed = self.keep_columns(&keep);
        debug!(
            before = self.nfeat(),
            after = trimmed.nfeat(),
            "dfm_trimmed"
        );
        Ok(trimmed)
    }

    /// Keeps only features matching one of `patterns`.
    pub fn select(&self, patterns: &[Pattern], case_insensitive: bool) -> Dfm {
        let keep: Vec<bool> = self
            .features
            .iter()
            .map(|f| matches_any(patterns, f, case_insensitive))
            .collect();
        self.keep_columns(&keep)
    }

    /// Drops features matching any of `patterns`.
    pub fn remove(&self, patterns: &[Pattern], case_insensitive: bool) -> Dfm {
        let keep: Vec<bool> = self
            .features
            .iter()
            .map(|f| !matches_any(patterns, f, case_insensitive))
            .collect();
        self.keep_columns(&keep)
    }

    fn keep_columns(&self, keep: &[bool]) -> Dfm {
        let mut remap: Vec<Option<u32>> = Vec::with_capacity(keep.len());
        let mut features = Vec::new();
        let mut index = FxHashMap::default();
        for (feature, &kept) in self.features.iter().zip(keep) {
            if kept {
                // new index < old index <= u32::MAX
                let col = features.len() as u32;
                remap.push(Some(col));
                index.insert(feature.clone(), col);
                features.push(feature.clone());
            } else {
                remap.push(None);
            }
        }
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|&(col, n)| remap[col as usize].map(|c| (c, n)))
                    .collect()
            })
            .collect();
        Dfm {
            docnames: self.docnames.clone(),
            docvars: self.docvars.clone(),
            features,
            rows,
            index,
        }
    }

    /// Document indices per value of `field`, groups sorted by label.
    /// Documents without the field (or with `null`) are left out.
    pub fn groups(&self, field: &str) -> Result<BTreeMap<String, Vec<usize>>, DfmError> {
        if !self.docvars.iter().any(|m| m.contains_key(field)) {
            return Err(DfmError::NotFound(format!("document variable '{field}'")));
        }
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (doc, meta) in self.docvars.iter().enumerate() {
            if let Some(label) = meta.get(field).and_then(value_label) {
                groups.entry(label).or_default().push(doc);
            }
        }
        Ok(groups)
    }

    /// Sums rows sharing a value of `field` into one row per group.
    ///
    /// Groups are named after the value and sorted by name. Document
    /// variables with a single value across a group are kept; the others
    /// are dropped. Columns are unchanged, even when a feature ends up with
    /// all-zero counts.
    pub fn group_by(&self, field: &str) -> Result<Dfm, DfmError> {
        let groups = self.groups(field)?;

        let mut docnames = Vec::with_capacity(groups.len());
        let mut docvars = Vec::with_capacity(groups.len());
        let mut rows = Vec::with_capacity(groups.len());
        for (label, members) in groups {
            let mut summed: BTreeMap<u32, u64> = BTreeMap::new();
            for &doc in &members {
                for &(col, n) in &self.rows[doc] {
                    *summed.entry(col).or_insert(0) += n;
                }
            }
            docvars.push(shared_docvars(&self.docvars, &members));
            docnames.push(label);
            rows.push(summed.into_iter().collect());
        }

        Ok(Dfm {
            docnames,
            docvars,
            features: self.features.clone(),
            rows,
            index: self.index.clone(),
        })
    }
}

fn shared_docvars(docvars: &[Metadata], members: &[usize]) -> Metadata {
    let Some((&first, rest)) = members.split_first() else {
        return Metadata::new();
    };
    docvars[first]
        .iter()
        .filter(|(field, value)| {
            rest.iter()
                .all(|&doc| docvars[doc].get(field.as_str()) == Some(*value))
        })
        .map(|(field, value): (&String, &Value)| (field.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn meta(pairs: &[(&str, Value)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn sample() -> Dfm {
        let docs = [
            vec!["cat", "dog", "cat"],
            vec!["dog", "dog", "bird"],
            vec!["fish"],
        ];
        Dfm::from_terms(
            vec!["d1".into(), "d2".into(), "d3".into()],
            vec![
                meta(&[("kind", json!("pets")), ("year", json!(2020))]),
                meta(&[("kind", json!("pets")), ("year", json!(2021))]),
                meta(&[("kind", json!("water")), ("year", json!(2021))]),
            ],
            &docs,
        )
        .unwrap()
    }

    #[test]
    fn columns_in_first_occurrence_order() {
        let dfm = sample();
        assert_eq!(dfm.features(), ["cat", "dog", "bird", "fish"]);
        assert_eq!(
            dfm.to_dense(),
            vec![vec![2, 1, 0, 0], vec![0, 2, 1, 0], vec![0, 0, 0, 1]]
        );
    }

    #[test]
    fn accessors() {
        let dfm = sample();
        assert_eq!(dfm.ndoc(), 3);
        assert_eq!(dfm.nfeat(), 4);
        assert_eq!(dfm.count(0, "cat"), 2);
        assert_eq!(dfm.count(2, "cat"), 0);
        assert_eq!(dfm.count(9, "cat"), 0);
        assert_eq!(dfm.count(0, "zebra"), 0);
        assert_eq!(dfm.row(1).collect::<Vec<_>>(), [("dog", 2), ("bird", 1)]);
        assert_eq!(dfm.ntoken(), [3, 3, 1]);
        assert_eq!(dfm.ntype(), [2, 2, 1]);
        assert_eq!(dfm.col_sums(), [2, 3, 1, 1]);
        assert_eq!(dfm.docfreq(), [1, 2, 1, 1]);
        assert_eq!(dfm.doc_index("d2"), Some(1));
        assert_eq!(dfm.feature_index("bird"), Some(2));
    }

    #[test]
    fn topfeatures_break_ties_alphabetically() {
        let dfm = sample();
        assert_eq!(
            dfm.topfeatures(3),
            [("dog", 3), ("cat", 2), ("bird", 1)]
        );
    }

    #[test]
    fn whitespace_terms_are_not_counted() {
        let docs = [vec!["a", " ", "b", "\n"]];
        let dfm = Dfm::from_terms(vec!["d".into()], vec![Metadata::new()], &docs).unwrap();
        assert_eq!(dfm.features(), ["a", "b"]);
        assert_eq!(dfm.row_sum(0), 2);
    }

    #[test]
    fn sequence_count_mismatch_is_invalid() {
        let docs = [vec!["a"]];
        let err = Dfm::from_terms(
            vec!["d1".into(), "d2".into()],
            vec![Metadata::new(), Metadata::new()],
            &docs,
        )
        .unwrap_err();
        assert!(matches!(err, DfmError::InvalidConfiguration(_)));
    }

    #[test]
    fn duplicate_row_names_are_invalid() {
        let docs = [vec!["a"], vec!["b"]];
        let err = Dfm::from_terms(
            vec!["1".into(), "1".into()],
            vec![Metadata::new(), Metadata::new()],
            &docs,
        )
        .unwrap_err();
        assert!(matches!(err, DfmError::InvalidConfiguration(ref msg) if msg.contains("'1'")));
    }

    #[test]
    fn trim_keeps_relative_order() {
        let dfm = sample();
        let trimmed = dfm.trim(&TrimOptions::min_termfreq(2)).unwrap();
        assert_eq!(trimmed.features(), ["cat", "dog"]);
        assert_eq!(trimmed.to_dense(), vec![vec![2, 1], vec![0, 2], vec![0, 0]]);
        assert_eq!(trimmed.count(1, "dog"), 2);
    }

    #[test]
    fn trim_on_docfreq_and_max() {
        let dfm = sample();
        let df = dfm
            .trim(&TrimOptions {
                min_docfreq: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(df.features(), ["dog"]);

        let capped = dfm
            .trim(&TrimOptions {
                max_termfreq: Some(1),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(capped.features(), ["bird", "fish"]);
    }

    #[test]
    fn trim_rejects_inverted_range() {
        let opts = TrimOptions {
            min_docfreq: Some(3),
            max_docfreq: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            sample().trim(&opts),
            Err(DfmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn select_and_remove_with_globs() {
        let dfm = sample();
        let pats = [Pattern::new("?og"), Pattern::new("f*")];
        assert_eq!(dfm.select(&pats, false).features(), ["dog", "fish"]);
        assert_eq!(dfm.remove(&pats, false).features(), ["cat", "bird"]);
        assert_eq!(
            dfm.select(&[Pattern::new("CAT")], true).features(),
            ["cat"]
        );
    }

    #[test]
    fn group_by_sums_rows() {
        let grouped = sample().group_by("kind").unwrap();
        assert_eq!(grouped.docnames(), ["pets", "water"]);
        assert_eq!(grouped.features(), ["cat", "dog", "bird", "fish"]);
        assert_eq!(grouped.to_dense(), vec![vec![2, 3, 1, 0], vec![0, 0, 0, 1]]);
        // year differs inside "pets"
        let pets = grouped.docvars(0).unwrap();
        assert_eq!(pets.get("kind"), Some(&json!("pets")));
        assert!(pets.get("year").is_none());
        assert_eq!(grouped.docvars(1).unwrap().get("year"), Some(&json!(2021)));
    }

    #[test]
    fn group_by_unknown_field() {
        assert!(matches!(
            sample().group_by("party"),
            Err(DfmError::NotFound(_))
        ));
    }

    #[test]
    fn long_format_csv() {
        let mut out = Vec::new();
        sample().write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "docname,feature,count");
        assert_eq!(lines[1], "d1,cat,2");
        assert_eq!(lines.len(), 1 + 5);
    }

    #[test]
    fn serializes_without_index() {
        let value = serde_json::to_value(sample().trim(&TrimOptions::min_termfreq(3)).unwrap()).unwrap();
        assert_eq!(value["features"], json!(["dog"]));
        assert!(value.get("index").is_none());
    }
}
