use std::ops::Range;

/// Transient bookkeeping while one view is laid out.
///
/// `placed` holds the spans of the line under construction and is cleared at
/// every line boundary; `text_top` carries over from line to line.
#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    placed: Vec<(Range<usize>, usize)>,
    text_top: f64,
}

impl LayoutState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top of the protein text row of the current line.
    pub fn text_top(&self) -> f64 {
        self.text_top
    }

    pub fn begin_line(&mut self) {
        self.placed.clear();
    }

    /// Stacking level for `range` (reference coordinates, clipped to the line).
    ///
    /// Level 0 unless the range intersects a span already placed on this
    /// line, in which case it goes one level above the highest of those.
    pub fn assign_level(&mut self, range: Range<usize>) -> usize {
        let level = self
            .placed
            .iter()
            .filter(|(r, _)| r.start < range.end && range.start < r.end)
            .map(|(_, level)| level + 1)
            .max()
            .unwrap_or(0);
        self.placed.push((range, level));
        level
    }

    pub fn max_level(&self) -> Option<usize> {
        self.placed.iter().map(|(_, level)| *level).max()
    }

    /// Moves the text row of the next line below every annotation of this one.
    pub fn finish_line(&mut self, floor: f64, vertical_increment: f64) {
        let bottom = match self.max_level() {
            Some(level) => floor + level as f64 * vertical_increment,
            None => floor,
        };
        self.text_top = bottom + vertical_increment;
        self.placed.clear();
    }
}
