mod occurrence;
mod peptide;
mod reference;

pub use occurrence::{
    Occurrence,
    RecordId,
};
pub use peptide::{
    PeptideRecord,
    ProteinSet,
};
pub use reference::ReferenceSequence;
