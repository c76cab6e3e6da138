use indicatif::{
    ParallelProgressIterator,
    ProgressStyle,
};
use pepmap::data_sources::{
    read_reference_fasta,
    PeptideTable,
};
use pepmap::report::ViewSummary;
use pepmap::{
    OccurrenceIndex,
    ReportBuilder,
    ReportView,
    ViewKind,
    ViewReport,
};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{
    BufWriter,
    Write,
};
use std::path::Path;
use std::time::Instant;
use tracing::{
    info,
    instrument,
    warn,
};

use crate::config::Config;
use crate::error::CliError;

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewEntry {
    pub kind: ViewKind,
    pub name: String,
    pub file: String,
    #[serde(flatten)]
    pub summary: ViewSummary,
}

impl ViewEntry {
    fn from_report(report: &ViewReport) -> Self {
        Self {
            kind: report.view.kind,
            name: report.view.name.clone(),
            file: format!("{}.json", report.file_stem),
            summary: report.summary,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub num_records: usize,
    pub num_matched_records: usize,
    pub num_unmatched_records: usize,
    pub skipped_rows: Vec<SkippedRow>,
    pub views: Vec<ViewEntry>,
}

impl RunSummary {
    pub fn log(&self) {
        info!(
            "{} records ({} matched, {} not found in the reference), {} rows skipped",
            self.num_records,
            self.num_matched_records,
            self.num_unmatched_records,
            self.skipped_rows.len()
        );
        for skipped in self.skipped_rows.iter() {
            warn!("Skipped row {}: {}", skipped.row, skipped.reason);
        }
        for view in self.views.iter() {
            info!(
                "{:?} {} -> {} ({} lines, {} spans, max level {})",
                view.kind,
                view.name,
                view.file,
                view.summary.num_lines,
                view.summary.num_spans,
                view.summary.max_level
            );
        }
    }
}

/// Navigation data for the written reports.
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    default: String,
    groups: Vec<&'a ViewEntry>,
    samples: Vec<&'a ViewEntry>,
}

fn write_json<T: Serialize>(value: &T, path: &Path, pretty: bool) -> Result<(), CliError> {
    let mut writer = BufWriter::new(File::create(path)?);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.flush()?;
    Ok(())
}

/// Loads the inputs, lays out every view and writes the reports.
#[instrument(skip_all)]
pub fn run(config: &Config) -> Result<RunSummary, CliError> {
    let start = Instant::now();
    let (fasta_path, table_path) = config.inputs()?;
    let output = config.output_config()?;
    let layout = config.layout.layout_config()?;

    let reference = read_reference_fasta(fasta_path)?;
    let table = PeptideTable::read(table_path)?;
    let skipped_rows: Vec<SkippedRow> = table
        .skipped
        .iter()
        .map(|e| SkippedRow {
            row: e.row,
            reason: e.kind.to_string(),
        })
        .collect();
    let records = if config.input.strict {
        table.into_strict_records()?
    } else {
        table.records
    };

    let index = OccurrenceIndex::build(reference, records)?;
    std::fs::create_dir_all(&output.directory)?;

    let builder =
        ReportBuilder::new(&index, layout).with_text_left_offset(config.layout.text_left_offset);
    let views = builder.planned_views();
    info!("Laying out {} views", views.len());

    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    let entries: Vec<ViewEntry> = views
        .par_iter()
        .progress_with_style(style)
        .map(|(view, stem)| -> Result<ViewEntry, CliError> {
            let mut report = builder.build_view(view)?;
            report.file_stem = stem.clone();
            let entry = ViewEntry::from_report(&report);
            write_json(&report, &output.directory.join(&entry.file), output.pretty)?;
            Ok(entry)
        })
        .collect::<Result<_, _>>()?;

    let manifest = Manifest {
        default: format!("{}.json", ReportView::all().file_stem()),
        groups: entries.iter().filter(|e| e.kind == ViewKind::Group).collect(),
        samples: entries.iter().filter(|e| e.kind == ViewKind::Sample).collect(),
    };
    write_json(&manifest, &output.directory.join("index.json"), true)?;

    let summary = RunSummary {
        num_records: index.records().len(),
        num_matched_records: index.num_matched_records(),
        num_unmatched_records: index.unmatched_records().count(),
        skipped_rows,
        views: entries,
    };
    write_json(&summary, &output.directory.join("run_summary.json"), true)?;
    info!(
        "Wrote {} reports to {} in {:?}",
        summary.views.len(),
        output.directory.display(),
        start.elapsed()
    );
    Ok(summary)
}
