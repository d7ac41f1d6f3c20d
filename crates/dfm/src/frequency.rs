//! Feature frequency tables.
//!
//! Features are sorted by descending total count with alphabetical
//! tie-break. Ranks use the "min" rule: equal counts share the rank of the
//! first of them, so `[5, 3, 3, 1]` ranks as `[1, 2, 2, 4]`.
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::DfmError;
use crate::matrix::Dfm;

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFrequency {
    pub feature: String,
    pub frequency: u64,
    pub rank: usize,
    /// Documents containing the feature.
    pub docfreq: u64,
    /// Group label for tables built by [`frequency_by`].
    pub group: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub group: Option<String>,
    pub rows: Vec<FeatureFrequency>,
}

impl FrequencyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureFrequency> {
        self.rows.iter().find(|r| r.feature == feature)
    }

    /// First `n` rows.
    pub fn top(&self, n: usize) -> &[FeatureFrequency] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Writes `feature,frequency,rank,docfreq,group` rows with a header.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<(), DfmError> {
        write_tables_csv(std::slice::from_ref(self), out)
    }
}

/// Writes several tables as one CSV with a shared header.
pub fn write_tables_csv<W: Write>(tables: &[FrequencyTable], out: W) -> Result<(), DfmError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["feature", "frequency", "rank", "docfreq", "group"])?;
    for row in tables.iter().flat_map(|t| &t.rows) {
        let frequency = row.frequency.to_string();
        let rank = row.rank.to_string();
        let docfreq = row.docfreq.to_string();
        writer.write_record([
            row.feature.as_str(),
            frequency.as_str(),
            rank.as_str(),
            docfreq.as_str(),
            row.group.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush().map_err(|e| DfmError::Write(e.to_string()))
}

/// Frequency table over the whole matrix.
///
/// ```rust
/// use dfm::{frequency, Dfm};
/// use corpus::Metadata;
///
/// let docs = [vec!["cat", "dog", "cat"], vec!["dog", "dog"]];
/// let dfm = Dfm::from_terms(
///     vec!["d1".into(), "d2".into()],
///     vec![Metadata::new(), Metadata::new()],
///     &docs,
/// ).unwrap();
///
/// let table = frequency(&dfm);
/// assert_eq!(table.rows[0].feature, "dog");
/// assert_eq!(table.rows[0].frequency, 3);
/// assert_eq!(table.rows[1].feature, "cat");
/// ```
pub fn frequency(dfm: &Dfm) -> FrequencyTable {
    let all: Vec<usize> = (0..dfm.ndoc()).collect();
    table_for(dfm, &all, None)
}

/// One table per value of document variable `field`, sorted by group name.
/// Document frequencies count the documents inside each group.
pub fn frequency_by(dfm: &Dfm, field: &str) -> Result<Vec<FrequencyTable>, DfmError> {
    Ok(dfm
        .groups(field)?
        .into_iter()
        .map(|(label, members)| table_for(dfm, &members, Some(label)))
        .collect())
}

fn table_for(dfm: &Dfm, docs: &[usize], group: Option<String>) -> FrequencyTable {
    let mut freq = vec![0u64; dfm.nfeat()];
    let mut docfreq = vec![0u64; dfm.nfeat()];
    let features = dfm.features();
    for &doc in docs {
        for (feature, n) in dfm.row(doc) {
            if let Some(col) = dfm.feature_index(feature) {
                freq[col] += n;
                docfreq[col] += 1;
            }
        }
    }

    let mut order: Vec<usize> = (0..features.len()).filter(|&c| freq[c] > 0).collect();
    order.sort_by(|&a, &b| {
        freq[b]
            .cmp(&freq[a])
            .then_with(|| features[a].cmp(&features[b]))
    });

    let mut rows: Vec<FeatureFrequency> = Vec::with_capacity(order.len());
    for (pos, col) in order.into_iter().enumerate() {
        let rank = match rows.last() {
            Some(prev) if prev.frequency == freq[col] => prev.rank,
            _ => pos + 1,
        };
        rows.push(FeatureFrequency {
            feature: features[col].clone(),
            frequency: freq[col],
            rank,
            docfreq: docfreq[col],
            group: group.clone(),
        });
    }
    FrequencyTable { group, rows }
}
