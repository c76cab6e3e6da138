//! Loaders for the two run inputs: the reference FASTA and the peptide table.

mod fasta;
mod peptide_table;

pub use fasta::{
    parse_reference_fasta,
    read_reference_fasta,
};
pub use peptide_table::{
    delimiter_for,
    PeptideTable,
};
