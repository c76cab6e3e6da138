//! Assembles laid out, styled reports for every view.

use crate::errors::{
    PepMapError,
    Result,
};
use crate::layout::{
    AnnotationSpan,
    LayoutConfig,
    LayoutEngine,
    Line,
};
use crate::models::RecordId;
use crate::occurrence_index::OccurrenceIndex;
use crate::style::{
    ColorLegend,
    ColorResolver,
    PeptideTooltip,
};
use crate::views::{
    report_views,
    unique_file_stems,
    ReportView,
    ViewSelection,
};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{
    debug,
    info,
    instrument,
};

#[derive(Debug, Clone, Serialize)]
pub struct RenderedSpan {
    /// The residues drawn on this line.
    pub text: String,
    /// Full sequence of the peptide this span belongs to.
    pub sequence: String,
    pub occurrence_start: usize,
    pub occurrence_end: usize,
    pub records: Vec<RecordId>,
    pub start_in_line: usize,
    pub length_in_line: usize,
    /// Text column, `text_left_offset + start_in_line`.
    pub left: usize,
    pub top: f64,
    pub level: usize,
    pub is_continuation: bool,
    pub color: String,
    pub underline: bool,
    pub tooltip: Arc<PeptideTooltip>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedLine {
    pub index: usize,
    pub protein_offset: usize,
    pub protein_text: String,
    pub text_top: f64,
    pub floor: f64,
    pub bottom: f64,
    pub spans: Vec<RenderedSpan>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewSummary {
    pub num_occurrences: usize,
    pub num_sequences: usize,
    pub num_lines: usize,
    pub num_spans: usize,
    pub num_continuations: usize,
    pub max_level: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewReport {
    pub view: ReportView,
    pub file_stem: String,
    pub line_width: usize,
    pub vertical_increment: f64,
    pub text_left_offset: usize,
    pub samples: Vec<String>,
    pub legend: ColorLegend,
    pub lines: Vec<RenderedLine>,
    pub summary: ViewSummary,
}

/// Builds [`ViewReport`]s from a frozen [`OccurrenceIndex`].
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder<'a> {
    index: &'a OccurrenceIndex,
    config: LayoutConfig,
    text_left_offset: usize,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(index: &'a OccurrenceIndex, config: LayoutConfig) -> Self {
        Self {
            index,
            config,
            text_left_offset: 0,
        }
    }

    pub fn with_text_left_offset(mut self, text_left_offset: usize) -> Self {
        self.text_left_offset = text_left_offset;
        self
    }

    pub fn views(&self) -> Vec<ReportView> {
        report_views(self.index.partitions())
    }

    /// Every view paired with the file stem its report is written under.
    pub fn planned_views(&self) -> Vec<(ReportView, String)> {
        let views = self.views();
        let stems = unique_file_stems(&views);
        views.into_iter().zip(stems).collect()
    }

    #[instrument(skip_all, fields(view = %view))]
    pub fn build_view(&self, view: &ReportView) -> Result<ViewReport> {
        let selection = ViewSelection::new(self.index, view);
        self.build_selection(&selection)
    }

    pub fn build_selection(&self, selection: &ViewSelection<'a>) -> Result<ViewReport> {
        let colors = ColorResolver::from_frequencies(selection.frequencies());
        let tooltips: HashMap<&str, Arc<PeptideTooltip>> = selection
            .frequencies()
            .iter()
            .filter_map(|(seq, _)| {
                PeptideTooltip::for_sequence(selection, seq).map(|t| (seq, Arc::new(t)))
            })
            .collect();

        let engine = LayoutEngine::new(self.index.reference(), self.config);
        let mut summary = ViewSummary {
            num_occurrences: selection.occurrences().len(),
            num_sequences: selection.frequencies().len(),
            ..Default::default()
        };
        let mut lines = Vec::new();
        for line in engine.lines(selection.occurrences())? {
            let rendered = self.render_line(&line, &colors, &tooltips)?;
            summary.num_spans += rendered.spans.len();
            summary.num_continuations += rendered.spans.iter().filter(|s| s.is_continuation).count();
            summary.max_level = rendered
                .spans
                .iter()
                .map(|s| s.level)
                .fold(summary.max_level, usize::max);
            lines.push(rendered);
        }
        summary.num_lines = lines.len();

        let view = selection.view().clone();
        info!(
            "View {}: {} occurrences of {} sequences, {} spans over {} lines",
            view,
            summary.num_occurrences,
            summary.num_sequences,
            summary.num_spans,
            summary.num_lines
        );
        Ok(ViewReport {
            file_stem: view.file_stem(),
            view,
            line_width: self.config.line_width(),
            vertical_increment: self.config.vertical_increment(),
            text_left_offset: self.text_left_offset,
            samples: selection.samples().to_vec(),
            legend: colors.legend().clone(),
            lines,
            summary,
        })
    }

    fn render_line(
        &self,
        line: &Line<'_>,
        colors: &ColorResolver,
        tooltips: &HashMap<&str, Arc<PeptideTooltip>>,
    ) -> Result<RenderedLine> {
        let spans = line
            .spans
            .iter()
            .map(|span| self.render_span(span, colors, tooltips))
            .collect::<Result<Vec<_>>>()?;
        debug!("Rendered line {} with {} spans", line.index, spans.len());
        Ok(RenderedLine {
            index: line.index,
            protein_offset: line.protein_offset,
            protein_text: line.protein_text.to_string(),
            text_top: line.text_top,
            floor: line.floor,
            bottom: line.bottom(),
            spans,
        })
    }

    fn render_span(
        &self,
        span: &AnnotationSpan,
        colors: &ColorResolver,
        tooltips: &HashMap<&str, Arc<PeptideTooltip>>,
    ) -> Result<RenderedSpan> {
        let reference = self.index.reference();
        let sequence = reference.slice(span.occurrence_range());
        let tooltip = tooltips.get(sequence).cloned().ok_or_else(|| PepMapError::ParseError {
            msg: format!(
                "No tooltip for sequence {} at [{}, {})",
                sequence, span.occurrence_start, span.occurrence_end
            ),
        })?;

        Ok(RenderedSpan {
            text: reference
                .slice(span.segment_range(self.config.line_width()))
                .to_string(),
            sequence: sequence.to_string(),
            occurrence_start: span.occurrence_start,
            occurrence_end: span.occurrence_end,
            records: span.records.clone(),
            start_in_line: span.start_in_line,
            length_in_line: span.length_in_line,
            left: self.text_left_offset + span.start_in_line,
            top: span.vertical_slot,
            level: span.level,
            is_continuation: span.is_continuation,
            color: colors
                .color_for(tooltip.amount)
                .unwrap_or_default()
                .to_string(),
            underline: tooltip.unique,
            tooltip,
        })
    }

    /// Every view of the run, laid out in parallel.
    pub fn build_all(&self) -> Result<Vec<ViewReport>> {
        self.planned_views()
            .par_iter()
            .map(|(view, stem)| -> Result<ViewReport> {
                let mut report = self.build_view(view)?;
                report.file_stem = stem.clone();
                Ok(report)
            })
            .collect()
    }
}
