use crate::errors::{
    PepMapError,
    RecordError,
    RecordErrorKind,
    Result,
    TableReadingError,
};
use crate::models::{
    PeptideRecord,
    ProteinSet,
};
use serde::Deserialize;
use std::io::Read;
use std::path::{
    Path,
    PathBuf,
};
use tracing::{
    info,
    warn,
};

const REQUIRED_COLUMNS: [&str; 3] = ["Sequence", "Proteins", "Experiment"];

#[derive(Debug, Clone, Deserialize)]
struct PeptideRow {
    #[serde(rename = "Sequence")]
    sequence: Option<String>,
    #[serde(rename = "Proteins")]
    proteins: Option<String>,
    #[serde(rename = "Experiment")]
    experiment: Option<String>,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|f| !f.trim().is_empty())
}

impl PeptideRow {
    fn into_record(self) -> std::result::Result<PeptideRecord, RecordErrorKind> {
        let sequence = non_empty(self.sequence).ok_or(RecordErrorKind::MissingSequence)?;
        let proteins = non_empty(self.proteins).ok_or(RecordErrorKind::MissingProteins)?;
        let experiment = non_empty(self.experiment).ok_or(RecordErrorKind::MissingExperiment)?;
        PeptideRecord::new(
            &sequence.to_ascii_uppercase(),
            ProteinSet::from_field(&proteins),
            &experiment,
        )
    }
}

/// Tab separated for `.tsv`/`.txt`, comma separated otherwise.
pub fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv") | Some("txt") => b'\t',
        _ => b',',
    }
}

/// Peptide rows that could be used, and the ones that could not.
#[derive(Debug, Clone, Default)]
pub struct PeptideTable {
    pub records: Vec<PeptideRecord>,
    pub skipped: Vec<RecordError>,
}

impl PeptideTable {
    pub fn read<T: AsRef<Path>>(path: T) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| PepMapError::Io {
            source: e,
            path: Some(path.to_path_buf()),
        })?;
        info!("Reading peptide table from {}", path.display());
        Self::from_reader(file, delimiter_for(path)).map_err(|e| match e {
            PepMapError::TableReading(TableReadingError::MissingColumn { column, .. }) => {
                TableReadingError::MissingColumn {
                    column,
                    path: path.to_path_buf(),
                }
                .into()
            }
            other => other,
        })
    }

    /// Reads a delimited table with `Sequence`, `Proteins` and `Experiment`
    /// columns. Other columns are ignored.
    ///
    /// Only a missing column or an I/O failure is fatal, problems with a
    /// single row are collected in [`PeptideTable::skipped`].
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if let Some(column) = REQUIRED_COLUMNS
            .into_iter()
            .find(|c| !headers.iter().any(|h| h == *c))
        {
            return Err(TableReadingError::MissingColumn {
                column,
                path: PathBuf::new(),
            }
            .into());
        }

        let mut out = Self::default();
        for (i, row) in rdr.deserialize::<PeptideRow>().enumerate() {
            let kind = match row {
                Ok(row) => match row.into_record() {
                    Ok(record) => {
                        out.records.push(record);
                        continue;
                    }
                    Err(kind) => kind,
                },
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => RecordErrorKind::Malformed(e.to_string()),
            };
            let err = RecordError { row: i + 1, kind };
            warn!("Skipping peptide {}", err);
            out.skipped.push(err);
        }

        info!(
            "Read {} peptide records ({} rows skipped)",
            out.records.len(),
            out.skipped.len()
        );
        Ok(out)
    }

    /// The usable records, or [`PepMapError::InvalidRecord`] for the first
    /// skipped row.
    pub fn into_strict_records(self) -> Result<Vec<PeptideRecord>> {
        match self.skipped.into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(self.records),
        }
    }
}
