use crate::errors::{
    PepMapError,
    Result,
};
use std::ops::Range;
use std::sync::Arc;

/// The protein sequence every peptide is searched against.
///
/// Residues are stored as ASCII text so that residue offsets and byte
/// offsets coincide. An empty reference is valid and produces an empty report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSequence {
    residues: Arc<str>,
}

impl ReferenceSequence {
    pub fn new(residues: impl Into<Arc<str>>) -> Result<Self> {
        let residues: Arc<str> = residues.into();
        if let Some(pos) = residues.bytes().position(|b| !b.is_ascii()) {
            return Err(PepMapError::ParseError {
                msg: format!("Non-ASCII residue at position {} of the reference", pos),
            });
        }
        Ok(Self { residues })
    }

    pub fn as_str(&self) -> &str {
        self.residues.as_ref()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.residues.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Residues in `range`, clamped to the end of the sequence.
    pub fn slice(&self, range: Range<usize>) -> &str {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        &self.residues[start..end]
    }
}
