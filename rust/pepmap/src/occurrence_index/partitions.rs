use crate::models::PeptideRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

/// Name of the synthetic group that contains every record.
pub const ALL_GROUP: &str = "All";

static TRAILING_NON_LETTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}]+$").expect("static regex is valid"));

/// Group an experiment label belongs to: the label without its trailing run
/// of non-letter characters (`"Ctrl_2"` -> `"Ctrl"`). Letters are Unicode
/// letters, so `"Kontrollé_1"` keeps its accent.
///
/// Labels made only of non-letters are their own group.
pub fn derive_group_name(experiment: &str) -> &str {
    match TRAILING_NON_LETTERS.find(experiment) {
        Some(m) if m.start() > 0 => &experiment[..m.start()],
        _ => experiment,
    }
}

/// Sorted, deduplicated group and sample names of a record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExperimentPartitions {
    /// Starts with [`ALL_GROUP`], the rest sorted.
    pub groups: Vec<String>,
    pub samples: Vec<String>,
}

impl ExperimentPartitions {
    pub fn from_records(records: &[PeptideRecord]) -> Self {
        let samples: BTreeSet<&str> = records.iter().map(|r| r.experiment()).collect();
        let groups: BTreeSet<&str> = samples
            .iter()
            .copied()
            .map(derive_group_name)
            .filter(|g| *g != ALL_GROUP)
            .collect();

        let mut group_names = Vec::with_capacity(groups.len() + 1);
        group_names.push(ALL_GROUP.to_string());
        group_names.extend(groups.into_iter().map(String::from));

        Self {
            groups: group_names,
            samples: samples.into_iter().map(String::from).collect(),
        }
    }
}
