use super::config::LayoutConfig;
use super::state::LayoutState;
use crate::errors::{
    PepMapError,
    Result,
};
use crate::models::{
    Occurrence,
    RecordId,
    ReferenceSequence,
};
use serde::Serialize;
use std::ops::Range;
use std::sync::Arc;
use tracing::trace;

/// The part of one displayed occurrence visible on one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationSpan {
    pub occurrence_start: usize,
    pub occurrence_end: usize,
    /// Every record matched at exactly this range, sorted.
    pub records: Vec<RecordId>,
    pub line_index: usize,
    pub start_in_line: usize,
    pub length_in_line: usize,
    /// 0 is the row right below the protein text.
    pub level: usize,
    pub vertical_slot: f64,
    pub is_continuation: bool,
}

impl AnnotationSpan {
    pub fn occurrence_range(&self) -> Range<usize> {
        self.occurrence_start..self.occurrence_end
    }

    /// The reference range covered by this span.
    pub fn segment_range(&self, line_width: usize) -> Range<usize> {
        let start = self.line_index * line_width + self.start_in_line;
        start..start + self.length_in_line
    }

    pub fn end_in_line(&self) -> usize {
        self.start_in_line + self.length_in_line
    }

    pub fn is_split(&self) -> bool {
        self.length_in_line < self.occurrence_end - self.occurrence_start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line<'r> {
    pub index: usize,
    pub protein_offset: usize,
    pub protein_text: &'r str,
    /// Top of the protein text row.
    pub text_top: f64,
    /// Slot of level 0 annotations.
    pub floor: f64,
    /// Continuations first, then new spans by ascending start.
    pub spans: Vec<AnnotationSpan>,
}

impl Line<'_> {
    /// Lowest slot used on this line (the floor when there are no spans).
    pub fn bottom(&self) -> f64 {
        self.spans
            .iter()
            .map(|s| s.vertical_slot)
            .fold(self.floor, f64::max)
    }
}

/// Occurrences of several records at the same range collapse into one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DisplayedOccurrence {
    start: usize,
    end: usize,
    records: Vec<RecordId>,
}

#[derive(Debug, Clone, Copy)]
struct Continuation {
    displayed: usize,
    from: usize,
}

/// Places occurrences on a line-wrapped rendering of the reference.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine<'r> {
    reference: &'r ReferenceSequence,
    config: LayoutConfig,
}

impl<'r> LayoutEngine<'r> {
    pub fn new(reference: &'r ReferenceSequence, config: LayoutConfig) -> Self {
        Self { reference, config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lazily yields the lines for one view.
    ///
    /// Fails if any occurrence lies outside the reference. Calling this again
    /// (or cloning the iterator) restarts the layout from the first line.
    pub fn lines(&self, occurrences: &[Occurrence]) -> Result<Lines<'r>> {
        let reference_len = self.reference.len();
        if let Some(bad) = occurrences
            .iter()
            .find(|o| o.end() > reference_len || o.is_empty())
        {
            return Err(PepMapError::SequenceLengthInvariantViolation {
                start: bad.start(),
                end: bad.end(),
                reference_len,
            });
        }

        Ok(Lines {
            reference: self.reference,
            config: self.config,
            displayed: coalesce(occurrences).into(),
            cursor: 0,
            next_line: 0,
            num_lines: self.config.num_lines(reference_len),
            pending: Vec::new(),
            state: LayoutState::new(),
        })
    }

    pub fn layout(&self, occurrences: &[Occurrence]) -> Result<Vec<Line<'r>>> {
        Ok(self.lines(occurrences)?.collect())
    }
}

fn coalesce(occurrences: &[Occurrence]) -> Vec<DisplayedOccurrence> {
    let mut sorted = occurrences.to_vec();
    sorted.sort_unstable();

    let mut out: Vec<DisplayedOccurrence> = Vec::with_capacity(sorted.len());
    for occ in sorted {
        match out.last_mut() {
            Some(last) if last.start == occ.start() && last.end == occ.end() => {
                if last.records.last() != Some(&occ.record()) {
                    last.records.push(occ.record());
                }
            }
            _ => out.push(DisplayedOccurrence {
                start: occ.start(),
                end: occ.end(),
                records: vec![occ.record()],
            }),
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct Lines<'r> {
    reference: &'r ReferenceSequence,
    config: LayoutConfig,
    displayed: Arc<[DisplayedOccurrence]>,
    cursor: usize,
    next_line: usize,
    num_lines: usize,
    pending: Vec<Continuation>,
    state: LayoutState,
}

impl Lines<'_> {
    fn place(
        &mut self,
        displayed: usize,
        from: usize,
        line: Range<usize>,
        floor: f64,
        is_continuation: bool,
    ) -> AnnotationSpan {
        let occ = &self.displayed[displayed];
        let segment_end = occ.end.min(line.end);
        let level = self.state.assign_level(from..segment_end);
        if occ.end > line.end {
            self.pending.push(Continuation {
                displayed,
                from: line.end,
            });
        }

        AnnotationSpan {
            occurrence_start: occ.start,
            occurrence_end: occ.end,
            records: occ.records.clone(),
            line_index: self.next_line,
            start_in_line: from - line.start,
            length_in_line: segment_end - from,
            level,
            vertical_slot: floor + level as f64 * self.config.vertical_increment(),
            is_continuation,
        }
    }
}

impl<'r> Iterator for Lines<'r> {
    type Item = Line<'r>;

    fn next(&mut self) -> Option<Line<'r>> {
        if self.next_line >= self.num_lines {
            debug_assert!(self.pending.is_empty());
            return None;
        }

        let width = self.config.line_width();
        let increment = self.config.vertical_increment();
        let line_start = self.next_line * width;
        let line_end = (line_start + width).min(self.reference.len());
        let line = line_start..line_end;

        self.state.begin_line();
        let text_top = self.state.text_top();
        let floor = text_top + increment;
        let mut spans = Vec::new();

        // Carried-over tails are anchored at the left edge, they are placed first.
        for cont in std::mem::take(&mut self.pending) {
            spans.push(self.place(cont.displayed, cont.from, line.clone(), floor, true));
        }
        while self.cursor < self.displayed.len() && self.displayed[self.cursor].start < line_end {
            let start = self.displayed[self.cursor].start;
            spans.push(self.place(self.cursor, start, line.clone(), floor, false));
            self.cursor += 1;
        }

        trace!(
            "Line {} [{}, {}): {} spans, max level {:?}",
            self.next_line,
            line_start,
            line_end,
            spans.len(),
            self.state.max_level()
        );
        self.state.finish_line(floor, increment);

        let out = Line {
            index: self.next_line,
            protein_offset: line_start,
            protein_text: self.reference.slice(line),
            text_top,
            floor,
            spans,
        };
        self.next_line += 1;
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_lines - self.next_line;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Lines<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn occs(starts: &[usize], len: usize) -> Vec<Occurrence> {
        starts
            .iter()
            .map(|&s| Occurrence::new(RecordId(0), s, len))
            .collect()
    }

    #[test]
    fn test_abcabc_scenario() {
        let reference = ReferenceSequence::new("ABCABCABCABC").unwrap();
        let config = LayoutConfig::new(5, 20.0).unwrap();
        let engine = LayoutEngine::new(&reference, config);
        let lines = engine.layout(&occs(&[2, 5, 8], 3)).unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].protein_text, "ABCAB");
        assert_eq!(lines[1].protein_text, "CABCA");
        assert_eq!(lines[2].protein_text, "BC");

        assert_eq!(lines[0].spans.len(), 1);
        let s = &lines[0].spans[0];
        assert_eq!((s.start_in_line, s.length_in_line), (2, 3));
        assert_eq!(s.vertical_slot, lines[0].floor);
        assert!(!s.is_continuation);

        assert_eq!(lines[1].spans.len(), 2);
        let full = &lines[1].spans[0];
        let head = &lines[1].spans[1];
        assert_eq!((full.start_in_line, full.length_in_line), (0, 3));
        assert_eq!((head.start_in_line, head.length_in_line), (3, 2));
        assert!(head.is_split());
        assert_eq!(head.vertical_slot, lines[1].floor);

        assert_eq!(lines[2].spans.len(), 1);
        let tail = &lines[2].spans[0];
        assert!(tail.is_continuation);
        assert_eq!((tail.start_in_line, tail.length_in_line), (0, 1));
        assert_eq!(tail.occurrence_start, 8);
        assert_eq!(tail.vertical_slot, lines[2].floor);

        assert_eq!(lines[0].text_top, 0.0);
        assert_eq!(lines[0].floor, 20.0);
        assert_eq!(lines[1].text_top, 40.0);
        assert_eq!(lines[2].text_top, 80.0);
    }

    #[test]
    fn test_overlaps_are_stacked() {
        let reference = ReferenceSequence::new("AAAAAAAAAA").unwrap();
        let config = LayoutConfig::new(10, 10.0).unwrap();
        let lines = LayoutEngine::new(&reference, config)
            .layout(&occs(&[0, 1, 2], 2))
            .unwrap();
        let levels: Vec<_> = lines[0].spans.iter().map(|s| s.level).collect();
        // [2, 4) only touches [0, 2) but intersects [1, 3), so it goes above the latter.
        assert_eq!(levels, vec![0, 1, 2]);
        assert_eq!(lines[0].bottom(), 30.0);
    }

    #[test]
    fn test_continuation_collides_with_new_span() {
        // "CDEFG" crosses into line 1 and "FGH" starts under its tail.
        let reference = ReferenceSequence::new("ABCDEFGHIJ").unwrap();
        let config = LayoutConfig::new(5, 1.0).unwrap();
        let occurrences = vec![
            Occurrence::new(RecordId(0), 2, 5),
            Occurrence::new(RecordId(1), 5, 3),
        ];
        let lines = LayoutEngine::new(&reference, config)
            .layout(&occurrences)
            .unwrap();
        let spans = &lines[1].spans;
        assert!(spans[0].is_continuation);
        assert_eq!((spans[0].start_in_line, spans[0].length_in_line, spans[0].level), (0, 2, 0));
        assert_eq!((spans[1].start_in_line, spans[1].level), (0, 1));
        assert_eq!(spans[1].vertical_slot, lines[1].floor + 1.0);
    }

    #[test]
    fn test_peptide_spanning_several_lines() {
        let reference = ReferenceSequence::new("ABCDEFGHIJKLMNOPQRST").unwrap();
        let config = LayoutConfig::new(4, 1.0).unwrap();
        // "CDEFGHIJKLM" covers lines 0..=3
        let lines = LayoutEngine::new(&reference, config)
            .layout(&occs(&[2], 11))
            .unwrap();
        let pieces: Vec<_> = lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .map(|s| {
                (
                    s.line_index,
                    s.start_in_line,
                    s.length_in_line,
                    s.is_continuation,
                )
            })
            .collect();
        assert_eq!(
            pieces,
            vec![(0, 2, 2, false), (1, 0, 4, true), (2, 0, 4, true), (3, 0, 1, true)]
        );
        let text: String = lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .map(|s| reference.slice(s.segment_range(4)))
            .collect();
        assert_eq!(text, "CDEFGHIJKLM");
    }

    #[test]
    fn test_identical_ranges_coalesce() {
        let reference = ReferenceSequence::new("ABCABCABCABC").unwrap();
        let config = LayoutConfig::new(12, 1.0).unwrap();
        let occurrences = vec![
            Occurrence::new(RecordId(3), 2, 3),
            Occurrence::new(RecordId(1), 2, 3),
            Occurrence::new(RecordId(1), 5, 3),
        ];
        let lines = LayoutEngine::new(&reference, config)
            .layout(&occurrences)
            .unwrap();
        assert_eq!(lines[0].spans.len(), 2);
        assert_eq!(lines[0].spans[0].records, vec![RecordId(1), RecordId(3)]);
        assert_eq!(lines[0].spans[0].level, 0);
        assert_eq!(lines[0].spans[1].records, vec![RecordId(1)]);
    }

    #[test]
    fn test_out_of_bounds_occurrence_rejected() {
        let reference = ReferenceSequence::new("ABCDE").unwrap();
        let config = LayoutConfig::new(2, 1.0).unwrap();
        let res = LayoutEngine::new(&reference, config).lines(&occs(&[3], 3));
        assert!(matches!(
            res,
            Err(PepMapError::SequenceLengthInvariantViolation {
                start: 3,
                end: 6,
                reference_len: 5
            })
        ));
    }

    #[test]
    fn test_empty_reference_has_no_lines() {
        let reference = ReferenceSequence::new("").unwrap();
        let config = LayoutConfig::new(5, 1.0).unwrap();
        let lines = LayoutEngine::new(&reference, config).layout(&[]).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_lines_are_restartable() {
        let reference = ReferenceSequence::new("ABCABCABCABC").unwrap();
        let config = LayoutConfig::new(5, 20.0).unwrap();
        let engine = LayoutEngine::new(&reference, config);
        let occurrences = occs(&[2, 5, 8], 3);
        let mut iter = engine.lines(&occurrences).unwrap();
        assert_eq!(iter.len(), 3);
        let first = iter.next().unwrap();
        assert_eq!(iter.clone().count(), 2);
        assert_eq!(engine.lines(&occurrences).unwrap().next().unwrap(), first);
    }

    #[test]
    fn test_empty_lines_still_advance_text_top() {
        let reference = ReferenceSequence::new("ABCDEFGH").unwrap();
        let config = LayoutConfig::new(4, 5.0).unwrap();
        let lines = LayoutEngine::new(&reference, config).layout(&[]).unwrap();
        assert_eq!(lines[0].text_top, 0.0);
        assert_eq!(lines[1].text_top, 10.0);
    }
}
