//! Aggregation of every peptide's matches against the reference.
//!
//! The index is built once per run and is read-only afterwards, so it can be
//! shared across threads while report views are laid out.

mod frequency;
mod partitions;

pub use frequency::FrequencyTable;
pub use partitions::{
    derive_group_name,
    ExperimentPartitions,
    ALL_GROUP,
};

use crate::errors::Result;
use crate::matcher::PeptideMatcher;
use crate::models::{
    Occurrence,
    PeptideRecord,
    RecordId,
    ReferenceSequence,
};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{
    debug,
    info,
    instrument,
};

#[derive(Debug, Clone)]
pub struct OccurrenceIndex {
    reference: ReferenceSequence,
    records: Vec<PeptideRecord>,
    occurrences: Vec<Vec<Occurrence>>,
    frequencies: FrequencyTable,
    partitions: ExperimentPartitions,
}

impl OccurrenceIndex {
    #[instrument(skip_all, fields(reference_len = reference.len(), num_records = records.len()))]
    pub fn build(reference: ReferenceSequence, records: Vec<PeptideRecord>) -> Result<Self> {
        let st = std::time::Instant::now();

        // Many rows repeat the same peptide, each distinct sequence is searched once.
        let mut distinct: Vec<Arc<str>> = records.iter().map(|r| r.shared_sequence()).collect();
        distinct.sort_unstable();
        distinct.dedup();

        let positions: HashMap<Arc<str>, Vec<usize>> = distinct
            .into_par_iter()
            .map(|seq| -> Result<(Arc<str>, Vec<usize>)> {
                let starts = PeptideMatcher::new(seq.as_ref())?.find_all(reference.as_str());
                Ok((seq, starts))
            })
            .collect::<Result<_>>()?;

        let occurrences: Vec<Vec<Occurrence>> = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let len = record.sequence().len();
                positions
                    .get(record.sequence())
                    .map(|starts| {
                        starts
                            .iter()
                            .map(|&s| Occurrence::new(RecordId(i), s, len))
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect();

        let frequencies = FrequencyTable::from_occurrences(&records, occurrences.iter().flatten());
        let partitions = ExperimentPartitions::from_records(&records);

        let out = Self {
            reference,
            records,
            occurrences,
            frequencies,
            partitions,
        };
        for id in out.unmatched_records() {
            debug!(
                "Peptide {} ({}) not found in the reference",
                out.record(id).sequence(),
                out.record(id).experiment()
            );
        }
        info!(
            "Indexed {} occurrences of {} distinct peptides ({}/{} records matched) in {:?}",
            out.frequencies.total(),
            out.frequencies.len(),
            out.num_matched_records(),
            out.records.len(),
            st.elapsed()
        );
        Ok(out)
    }

    pub fn reference(&self) -> &ReferenceSequence {
        &self.reference
    }

    pub fn records(&self) -> &[PeptideRecord] {
        &self.records
    }

    pub fn record(&self, id: RecordId) -> &PeptideRecord {
        &self.records[id.0]
    }

    pub fn occurrences_of(&self, id: RecordId) -> &[Occurrence] {
        &self.occurrences[id.0]
    }

    /// Occurrence counts over every record.
    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn partitions(&self) -> &ExperimentPartitions {
        &self.partitions
    }

    pub fn group_names(&self) -> &[String] {
        &self.partitions.groups
    }

    pub fn sample_names(&self) -> &[String] {
        &self.partitions.samples
    }

    pub fn num_matched_records(&self) -> usize {
        self.occurrences.iter().filter(|o| !o.is_empty()).count()
    }

    pub fn unmatched_records(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.occurrences
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_empty())
            .map(|(i, _)| RecordId(i))
    }

    /// Occurrences of the records accepted by `predicate`, sorted by `(start, end)`.
    ///
    /// Occurrences of different records at the same range are all kept.
    pub fn select<F>(&self, predicate: F) -> Vec<Occurrence>
    where
        F: Fn(&PeptideRecord) -> bool,
    {
        let mut out: Vec<Occurrence> = self
            .records
            .iter()
            .zip(self.occurrences.iter())
            .filter(|(record, _)| predicate(record))
            .flat_map(|(_, occs)| occs.iter().copied())
            .collect();
        out.sort_unstable();
        out
    }

    pub fn all_occurrences(&self) -> Vec<Occurrence> {
        self.select(|_| true)
    }
}
