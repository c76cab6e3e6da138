use clap::{
    Parser,
    Subcommand,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Map peptides onto the reference and write one report per view.
    Run(RunArgs),
    /// Write a template configuration file.
    WriteTemplate(WriteTemplateArgs),
}

/// Every flag overrides the matching entry of the configuration file.
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to the json configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// FASTA file with the reference protein.
    #[arg(short = 'f', long)]
    pub reference_fasta: Option<PathBuf>,

    /// Peptide table (.csv, or tab separated .tsv/.txt).
    #[arg(short, long)]
    pub peptide_table: Option<PathBuf>,

    /// Directory where the reports are written.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Residues per line.
    #[arg(long)]
    pub line_width: Option<usize>,

    /// Height of one annotation row.
    #[arg(long)]
    pub vertical_increment: Option<f64>,

    /// Column where the protein text starts.
    #[arg(long)]
    pub text_left_offset: Option<usize>,

    /// Abort on the first unusable peptide row instead of skipping it.
    #[arg(long)]
    pub strict: bool,

    /// Indent the written json.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Parser, Debug)]
pub struct WriteTemplateArgs {
    /// The directory the template is written to.
    #[arg(short, long)]
    pub output_path: PathBuf,
}
