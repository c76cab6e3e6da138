#![doc = include_str!("../README.md")]

pub mod data_sources;
pub mod errors;
pub mod layout;
pub mod matcher;
pub mod models;
pub mod occurrence_index;
pub mod report;
pub mod style;
pub mod views;

pub use data_sources::{
    read_reference_fasta,
    PeptideTable,
};
pub use errors::{
    PepMapError,
    RecordError,
    RecordErrorKind,
};
pub use layout::{
    AnnotationSpan,
    LayoutConfig,
    LayoutEngine,
    Line,
};
pub use matcher::PeptideMatcher;
pub use models::{
    Occurrence,
    PeptideRecord,
    ProteinSet,
    RecordId,
    ReferenceSequence,
};
pub use occurrence_index::{
    FrequencyTable,
    OccurrenceIndex,
};
pub use report::{
    ReportBuilder,
    ViewReport,
};
pub use views::{
    ReportView,
    ViewKind,
    ViewSelection,
};
