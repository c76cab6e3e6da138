//! Report views: which records go into each rendered report.
//!
//! A run produces one view per group (including the synthetic `All` group)
//! and one per sample. Views never share mutable state, the selection for a
//! view is computed from the frozen [`OccurrenceIndex`].

use crate::models::{
    Occurrence,
    RecordId,
};
use crate::occurrence_index::{
    derive_group_name,
    ExperimentPartitions,
    FrequencyTable,
    OccurrenceIndex,
    ALL_GROUP,
};
use serde::Serialize;
use std::collections::{
    BTreeMap,
    BTreeSet,
    HashSet,
};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Group,
    Sample,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Group => "group",
            ViewKind::Sample => "sample",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ReportView {
    pub kind: ViewKind,
    pub name: String,
}

impl ReportView {
    pub fn all() -> Self {
        Self::group(ALL_GROUP)
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self {
            kind: ViewKind::Group,
            name: name.into(),
        }
    }

    pub fn sample(name: impl Into<String>) -> Self {
        Self {
            kind: ViewKind::Sample,
            name: name.into(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.kind == ViewKind::Group && self.name == ALL_GROUP
    }

    /// Whether a record with this experiment label belongs to the view.
    pub fn includes(&self, experiment: &str) -> bool {
        match self.kind {
            ViewKind::Group => self.is_all() || derive_group_name(experiment) == self.name,
            ViewKind::Sample => experiment == self.name,
        }
    }

    /// File name stem used for this view's report, e.g. `type_group-All`.
    pub fn file_stem(&self) -> String {
        let name: String = self
            .name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("type_{}-{}", self.kind.as_str(), name)
    }
}

impl std::fmt::Display for ReportView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.name)
    }
}

/// Every view of a run: groups first (`All` leading), then samples.
pub fn report_views(partitions: &ExperimentPartitions) -> Vec<ReportView> {
    partitions
        .groups
        .iter()
        .map(ReportView::group)
        .chain(partitions.samples.iter().map(ReportView::sample))
        .collect()
}

/// File stems for `views`, in order, no two alike.
///
/// Names that only differ in characters [`ReportView::file_stem`] replaces
/// (`"Ctrl 1"` and `"Ctrl_1"`) would share a file; the later view gets a
/// `-2`, `-3`, ... suffix instead.
pub fn unique_file_stems(views: &[ReportView]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(views.len());
    views
        .iter()
        .map(|view| {
            let base = view.file_stem();
            let mut stem = base.clone();
            let mut suffix = 2;
            while taken.contains(&stem) {
                stem = format!("{}-{}", base, suffix);
                suffix += 1;
            }
            if stem != base {
                warn!("View {} would overwrite {}, writing {} instead", view, base, stem);
            }
            taken.insert(stem.clone());
            stem
        })
        .collect()
}

/// The occurrences, counts and contributing records of one view.
#[derive(Debug, Clone)]
pub struct ViewSelection<'a> {
    index: &'a OccurrenceIndex,
    view: ReportView,
    occurrences: Vec<Occurrence>,
    frequencies: FrequencyTable,
    contributors: BTreeMap<Arc<str>, Vec<RecordId>>,
    samples: Vec<String>,
}

impl<'a> ViewSelection<'a> {
    pub fn new(index: &'a OccurrenceIndex, view: &ReportView) -> Self {
        Self::from_predicate(index, view.clone(), |experiment| view.includes(experiment))
    }

    /// Builds a view from an arbitrary predicate over experiment labels.
    pub fn from_predicate<F>(index: &'a OccurrenceIndex, view: ReportView, predicate: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let occurrences = index.select(|r| predicate(r.experiment()));
        let frequencies = FrequencyTable::from_occurrences(index.records(), &occurrences);

        let mut contributors: BTreeMap<Arc<str>, Vec<RecordId>> = BTreeMap::new();
        for occ in occurrences.iter() {
            let ids = contributors
                .entry(index.record(occ.record()).shared_sequence())
                .or_default();
            if !ids.contains(&occ.record()) {
                ids.push(occ.record());
            }
        }
        for ids in contributors.values_mut() {
            ids.sort_unstable();
        }

        let samples: BTreeSet<&str> = index
            .records()
            .iter()
            .map(|r| r.experiment())
            .filter(|e| predicate(e))
            .collect();

        Self {
            index,
            view,
            occurrences,
            frequencies,
            contributors,
            samples: samples.into_iter().map(String::from).collect(),
        }
    }

    pub fn index(&self) -> &'a OccurrenceIndex {
        self.index
    }

    pub fn view(&self) -> &ReportView {
        &self.view
    }

    /// Sorted by `(start, end)`.
    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    /// Occurrence counts restricted to the records of this view.
    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// Records of this view with the given sequence and at least one occurrence.
    pub fn contributing_records(&self, sequence: &str) -> &[RecordId] {
        self.contributors
            .get(sequence)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Sample names of every record in the view, matched or not.
    pub fn samples(&self) -> &[String] {
        &self.samples
    }
}
