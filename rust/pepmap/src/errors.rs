use std::fmt::Display;
use std::path::PathBuf;

/// Reasons a single peptide row can be rejected.
///
/// These are recoverable: the row is skipped and reported once the whole
/// table has been read. A strict read turns the first one into
/// [`PepMapError::InvalidRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordErrorKind {
    MissingSequence,
    MissingProteins,
    MissingExperiment,
    EmptySequence,
    Malformed(String),
}

impl Display for RecordErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSequence => write!(f, "missing sequence"),
            Self::MissingProteins => write!(f, "missing proteins"),
            Self::MissingExperiment => write!(f, "missing experiment"),
            Self::EmptySequence => write!(f, "empty sequence"),
            Self::Malformed(msg) => write!(f, "malformed row: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// 1-based data row (the header is not counted).
    pub row: usize,
    pub kind: RecordErrorKind,
}

impl Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.kind)
    }
}

impl std::error::Error for RecordError {}

#[derive(Debug)]
pub enum TableReadingError {
    Csv(csv::Error),
    MissingColumn { column: &'static str, path: PathBuf },
}

impl Display for TableReadingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(e) => write!(f, "{}", e),
            Self::MissingColumn { column, path } => write!(
                f,
                "Required column '{}' not found in {}",
                column,
                path.display()
            ),
        }
    }
}

#[derive(Debug)]
pub enum PepMapError {
    InvalidPattern,
    InvalidRecord(RecordError),
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },
    /// An occurrence that runs past the end of the reference reached the layout.
    SequenceLengthInvariantViolation {
        start: usize,
        end: usize,
        reference_len: usize,
    },
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
    ParseError {
        msg: String,
    },
    TableReading(TableReadingError),
}

impl Display for PepMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPattern => write!(f, "Peptide pattern must not be empty"),
            Self::InvalidRecord(e) => write!(f, "Invalid peptide record at {}", e),
            Self::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            Self::SequenceLengthInvariantViolation {
                start,
                end,
                reference_len,
            } => write!(
                f,
                "Occurrence {}..{} exceeds the reference length {}",
                start, end, reference_len
            ),
            Self::Io { source, path } => match path {
                Some(path) => write!(f, "Error reading file {}: {}", path.display(), source),
                None => write!(f, "Error reading file: {}", source),
            },
            Self::ParseError { msg } => write!(f, "Error parsing input: {}", msg),
            Self::TableReading(e) => write!(f, "Error reading peptide table: {}", e),
        }
    }
}

impl std::error::Error for PepMapError {}

pub type Result<T> = std::result::Result<T, PepMapError>;

impl From<RecordError> for PepMapError {
    fn from(x: RecordError) -> Self {
        Self::InvalidRecord(x)
    }
}

impl From<TableReadingError> for PepMapError {
    fn from(x: TableReadingError) -> Self {
        Self::TableReading(x)
    }
}

impl From<csv::Error> for PepMapError {
    fn from(x: csv::Error) -> Self {
        Self::TableReading(TableReadingError::Csv(x))
    }
}

impl From<std::io::Error> for PepMapError {
    fn from(x: std::io::Error) -> Self {
        Self::Io {
            source: x,
            path: None,
        }
    }
}

impl From<serde_json::Error> for PepMapError {
    fn from(val: serde_json::Error) -> Self {
        PepMapError::ParseError {
            msg: val.to_string(),
        }
    }
}
