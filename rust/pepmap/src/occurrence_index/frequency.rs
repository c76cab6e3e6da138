use crate::models::{
    Occurrence,
    PeptideRecord,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Number of occurrences per distinct peptide sequence text.
///
/// Records sharing a sequence contribute additively. Only sequences with at
/// least one occurrence are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    counts: BTreeMap<Arc<str>, usize>,
}

impl FrequencyTable {
    pub fn from_occurrences<'a>(
        records: &[PeptideRecord],
        occurrences: impl IntoIterator<Item = &'a Occurrence>,
    ) -> Self {
        let mut counts: BTreeMap<Arc<str>, usize> = BTreeMap::new();
        for occ in occurrences {
            let record = &records[occ.record().0];
            *counts.entry(record.shared_sequence()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, sequence: &str) -> Option<usize> {
        self.counts.get(sequence).copied()
    }

    pub fn contains(&self, sequence: &str) -> bool {
        self.counts.contains_key(sequence)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_ref(), *v))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Distinct count values, ascending.
    pub fn distinct_counts(&self) -> Vec<usize> {
        let mut out: Vec<usize> = self.counts.values().copied().collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}
