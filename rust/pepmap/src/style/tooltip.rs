use crate::models::ProteinSet;
use crate::views::ViewSelection;
use serde::Serialize;
use std::fmt;

/// A sequence is unique when all its records point at a single protein.
pub fn is_unique(proteins: &ProteinSet) -> bool {
    proteins.len() == 1
}

/// Merged metadata shown when hovering a displayed sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeptideTooltip {
    pub sequence: String,
    pub proteins: ProteinSet,
    pub unique: bool,
    pub experiments: Vec<String>,
    /// Samples of the view where this sequence was never matched.
    pub experiments_not_found: Vec<String>,
    pub amount: usize,
}

impl PeptideTooltip {
    /// Merges every record of the view that matched `sequence`.
    ///
    /// Records outside the view do not contribute, even when they carry the
    /// same sequence text. Returns `None` if nothing in the view matched it.
    pub fn for_sequence(selection: &ViewSelection<'_>, sequence: &str) -> Option<Self> {
        let contributors = selection.contributing_records(sequence);
        if contributors.is_empty() {
            return None;
        }

        let index = selection.index();
        let mut proteins = ProteinSet::new();
        let mut experiments: Vec<String> = Vec::new();
        for id in contributors {
            let record = index.record(*id);
            proteins.extend_from(record.proteins());
            if !experiments.iter().any(|e| e == record.experiment()) {
                experiments.push(record.experiment().to_string());
            }
        }

        let experiments_not_found = selection
            .samples()
            .iter()
            .filter(|s| !experiments.contains(s))
            .cloned()
            .collect();

        Some(Self {
            sequence: sequence.to_string(),
            unique: is_unique(&proteins),
            proteins,
            experiments,
            experiments_not_found,
            amount: selection.frequencies().get(sequence).unwrap_or(0),
        })
    }
}

impl fmt::Display for PeptideTooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let proteins: Vec<&str> = self.proteins.iter().collect();
        writeln!(f, "Sequence: {}", self.sequence)?;
        writeln!(f, "Proteins: {}", proteins.join(", "))?;
        writeln!(f, "Unique: {}", if self.unique { "True" } else { "False" })?;
        writeln!(f, "Experiment: {}", self.experiments.join(", "))?;
        write!(f, "Amount: {}", self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        PeptideRecord,
        ReferenceSequence,
    };
    use crate::occurrence_index::OccurrenceIndex;
    use crate::views::ReportView;

    fn build(rows: &[(&str, &str, &str)]) -> OccurrenceIndex {
        let records = rows
            .iter()
            .map(|(s, p, e)| PeptideRecord::new(s, ProteinSet::from_field(p), e).unwrap())
            .collect();
        OccurrenceIndex::build(ReferenceSequence::new("ABCABCABCABC").unwrap(), records).unwrap()
    }

    #[test]
    fn test_same_protein_twice_is_unique() {
        let index = build(&[("CAB", "P1", "E1"), ("CAB", "P1", "E1")]);
        let sel = ViewSelection::new(&index, &ReportView::all());
        let tip = PeptideTooltip::for_sequence(&sel, "CAB").unwrap();
        assert!(tip.unique);
        assert_eq!(tip.proteins.len(), 1);
        assert_eq!(tip.amount, 6);
        assert_eq!(tip.experiments, vec!["E1"]);
    }

    #[test]
    fn test_second_protein_breaks_uniqueness() {
        let index = build(&[("CAB", "P1", "E1"), ("CAB", "P1", "E2"), ("CAB", "P2", "E1")]);
        let sel = ViewSelection::new(&index, &ReportView::all());
        let tip = PeptideTooltip::for_sequence(&sel, "CAB").unwrap();
        assert!(!tip.unique);
        assert_eq!(tip.proteins.iter().collect::<Vec<_>>(), vec!["P1", "P2"]);
        assert_eq!(tip.experiments, vec!["E1", "E2"]);
    }

    #[test]
    fn test_missing_samples_and_text_rendering() {
        let index = build(&[("CAB", "P1;P2", "S1"), ("ZZZ", "P3", "S2")]);
        let sel = ViewSelection::new(&index, &ReportView::all());
        let tip = PeptideTooltip::for_sequence(&sel, "CAB").unwrap();
        assert_eq!(tip.experiments_not_found, vec!["S2"]);
        assert_eq!(
            tip.to_string(),
            "Sequence: CAB\nProteins: P1, P2\nUnique: False\nExperiment: S1\nAmount: 3"
        );
        assert!(PeptideTooltip::for_sequence(&sel, "ZZZ").is_none());
    }
}
