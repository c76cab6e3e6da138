use crate::errors::RecordErrorKind;
use serde::Serialize;
use std::sync::Arc;

/// Protein identifiers a peptide was assigned to.
///
/// Keeps first-seen order for display but compares as a set.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ProteinSet(Vec<Arc<str>>);

impl ProteinSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parses a `;`-separated protein field, e.g. `"P1;P2"`.
    pub fn from_field(field: &str) -> Self {
        let mut out = Self::new();
        for protein in field.split(';') {
            out.insert(protein);
        }
        out
    }

    /// Returns `true` if the protein was not already present.
    pub fn insert(&mut self, protein: &str) -> bool {
        let protein = protein.trim();
        if protein.is_empty() || self.contains(protein) {
            return false;
        }
        self.0.push(protein.into());
        true
    }

    pub fn extend_from(&mut self, other: &ProteinSet) {
        for protein in other.iter() {
            self.insert(protein);
        }
    }

    pub fn contains(&self, protein: &str) -> bool {
        self.0.iter().any(|p| p.as_ref() == protein)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for ProteinSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|p| other.contains(p))
    }
}

impl Eq for ProteinSet {}

impl<'a> FromIterator<&'a str> for ProteinSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut out = Self::new();
        for protein in iter {
            out.insert(protein);
        }
        out
    }
}

/// One row of the peptide table.
///
/// Several records may share the same sequence text (the same peptide seen
/// in different experiments).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeptideRecord {
    sequence: Arc<str>,
    proteins: ProteinSet,
    experiment: Arc<str>,
}

impl PeptideRecord {
    pub fn new(
        sequence: &str,
        proteins: ProteinSet,
        experiment: &str,
    ) -> Result<Self, RecordErrorKind> {
        let sequence = sequence.trim();
        if sequence.is_empty() {
            return Err(RecordErrorKind::EmptySequence);
        }
        if proteins.is_empty() {
            return Err(RecordErrorKind::MissingProteins);
        }
        let experiment = experiment.trim();
        if experiment.is_empty() {
            return Err(RecordErrorKind::MissingExperiment);
        }
        Ok(Self {
            sequence: sequence.into(),
            proteins,
            experiment: experiment.into(),
        })
    }

    pub fn sequence(&self) -> &str {
        self.sequence.as_ref()
    }

    pub fn shared_sequence(&self) -> Arc<str> {
        self.sequence.clone()
    }

    pub fn proteins(&self) -> &ProteinSet {
        &self.proteins
    }

    pub fn experiment(&self) -> &str {
        self.experiment.as_ref()
    }
}
