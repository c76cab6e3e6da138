use crate::errors::{
    PepMapError,
    Result,
};
use crate::models::ReferenceSequence;
use std::io::BufRead;
use std::path::Path;
use tracing::{
    debug,
    info,
};

/// Reads the reference protein from a single-record FASTA file.
pub fn read_reference_fasta<T: AsRef<Path>>(path: T) -> Result<ReferenceSequence> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| PepMapError::Io {
        source: e,
        path: Some(path.to_path_buf()),
    })?;
    info!("Reading reference sequence from {}", path.display());
    parse_reference_fasta(std::io::BufReader::new(file)).map_err(|e| match e {
        PepMapError::Io { source, path: None } => PepMapError::Io {
            source,
            path: Some(path.to_path_buf()),
        },
        other => other,
    })
}

/// Header lines (`>`) are skipped, every other line is trimmed and appended.
///
/// Residues are upper-cased. When the file holds several records their
/// residues end up concatenated.
pub fn parse_reference_fasta<R: BufRead>(reader: R) -> Result<ReferenceSequence> {
    let mut residues = String::new();
    let mut num_headers = 0;
    for line in reader.lines() {
        let line = line?;
        if line.starts_with('>') {
            num_headers += 1;
            continue;
        }
        residues.push_str(&line.trim().to_ascii_uppercase());
    }
    if num_headers > 1 {
        debug!("{} FASTA headers found, their sequences are concatenated", num_headers);
    }
    ReferenceSequence::new(residues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped_fasta() {
        let text = ">sp|O60264|SMCA5_HUMAN\nMSSAAEPPPP\n  pppeglk \n\nAAK\n";
        let reference = parse_reference_fasta(text.as_bytes()).unwrap();
        assert_eq!(reference.as_str(), "MSSAAEPPPPPPPEGLKAAK");
    }

    #[test]
    fn test_headers_only() {
        let reference = parse_reference_fasta(">empty\n".as_bytes()).unwrap();
        assert!(reference.is_empty());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_reference_fasta("/definitely/not/here.fasta").unwrap_err();
        match err {
            PepMapError::Io { path, .. } => {
                assert_eq!(path.unwrap().to_str(), Some("/definitely/not/here.fasta"))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
