use serde::Serialize;
use std::ops::Range;

/// Position of a [`crate::PeptideRecord`] in the record list it was indexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub usize);

/// One match of a peptide record at `[start, end)` of the reference.
///
/// Ordering is by `(start, end)` and then by record, which is the order the
/// layout consumes occurrences in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Occurrence {
    start: usize,
    end: usize,
    record: RecordId,
}

impl Occurrence {
    pub fn new(record: RecordId, start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
            record,
        }
    }

    pub fn record(&self) -> RecordId {
        self.record
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
