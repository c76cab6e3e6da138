use crate::occurrence_index::FrequencyTable;
use palette::{
    FromColor,
    Hsl,
    IntoColor,
    Mix,
    Srgb,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Two-endpoint gradient, interpolated in HSL.
#[derive(Debug, Clone, Copy)]
pub struct ColorGradient {
    start: Srgb<u8>,
    end: Srgb<u8>,
}

impl ColorGradient {
    pub fn new(start: Srgb<u8>, end: Srgb<u8>) -> Self {
        Self { start, end }
    }

    /// LightBlue (least frequent) to MediumBlue (most frequent).
    pub fn blues() -> Self {
        Self::new(Srgb::new(0xad, 0xd8, 0xe6), Srgb::new(0x00, 0x00, 0xcd))
    }

    /// `n` evenly spaced colors, both endpoints included.
    pub fn steps(&self, n: usize) -> Vec<String> {
        match n {
            0 => Vec::new(),
            1 => vec![to_hex(self.start)],
            n => {
                let start: Hsl = self.start.into_format::<f32>().into_color();
                let end: Hsl = self.end.into_format::<f32>().into_color();
                (0..n)
                    .map(|i| {
                        if i == 0 {
                            to_hex(self.start)
                        } else if i == n - 1 {
                            to_hex(self.end)
                        } else {
                            let mixed = start.mix(&end, i as f32 / (n - 1) as f32);
                            to_hex(Srgb::<f32>::from_color(mixed).into_format::<u8>())
                        }
                    })
                    .collect()
            }
        }
    }
}

fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorStop {
    pub count: usize,
    pub color: String,
}

/// What the color bar next to a report shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColorLegend {
    pub stops: Vec<ColorStop>,
    /// `0` followed by every stop count.
    pub boundaries: Vec<usize>,
}

/// Maps an occurrence count to its color.
///
/// Colors are assigned by rank of the distinct count values, so the legend is
/// evenly spaced however skewed the counts are.
#[derive(Debug, Clone)]
pub struct ColorResolver {
    colors: BTreeMap<usize, String>,
    legend: ColorLegend,
}

impl ColorResolver {
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {
        Self::with_gradient(frequencies, &ColorGradient::blues())
    }

    pub fn with_gradient(frequencies: &FrequencyTable, gradient: &ColorGradient) -> Self {
        let mut counts = frequencies.distinct_counts();
        if counts.len() == 1 {
            // A single count still needs a two-color range for the legend.
            counts.push(counts[0] + 1);
        }
        let stops: Vec<ColorStop> = counts
            .iter()
            .zip(gradient.steps(counts.len()))
            .map(|(&count, color)| ColorStop { count, color })
            .collect();

        let boundaries = if stops.is_empty() {
            Vec::new()
        } else {
            std::iter::once(0).chain(counts.iter().copied()).collect()
        };
        let colors = stops
            .iter()
            .map(|s| (s.count, s.color.clone()))
            .collect();

        Self {
            colors,
            legend: ColorLegend { stops, boundaries },
        }
    }

    pub fn color_for(&self, count: usize) -> Option<&str> {
        self.colors.get(&count).map(|c| c.as_str())
    }

    pub fn legend(&self) -> &ColorLegend {
        &self.legend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Occurrence,
        PeptideRecord,
        ProteinSet,
        RecordId,
    };

    fn table(counts: &[(&str, usize)]) -> FrequencyTable {
        let records: Vec<_> = counts
            .iter()
            .map(|(s, _)| PeptideRecord::new(s, ProteinSet::from_field("P1"), "E1").unwrap())
            .collect();
        let occs: Vec<_> = counts
            .iter()
            .enumerate()
            .flat_map(|(i, (_, n))| (0..*n).map(move |s| Occurrence::new(RecordId(i), s, 1)))
            .collect();
        FrequencyTable::from_occurrences(&records, &occs)
    }

    #[test]
    fn test_gradient_endpoints() {
        let steps = ColorGradient::blues().steps(4);
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], "#add8e6");
        assert_eq!(steps[3], "#0000cd");
        assert_ne!(steps[1], steps[2]);
        assert!(ColorGradient::blues().steps(0).is_empty());
    }

    #[test]
    fn test_colors_follow_count_rank() {
        let resolver = ColorResolver::from_frequencies(&table(&[("A", 1), ("B", 50), ("C", 2), ("D", 2)]));
        let legend = resolver.legend();
        let counts: Vec<_> = legend.stops.iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![1, 2, 50]);
        assert_eq!(legend.boundaries, vec![0, 1, 2, 50]);
        assert_eq!(resolver.color_for(1), Some("#add8e6"));
        assert_eq!(resolver.color_for(50), Some("#0000cd"));
        assert!(resolver.color_for(2).is_some());
        assert_eq!(resolver.color_for(3), None);
    }

    #[test]
    fn test_single_count_gets_synthetic_endpoint() {
        let resolver = ColorResolver::from_frequencies(&table(&[("A", 3), ("B", 3)]));
        assert_eq!(resolver.legend().stops.len(), 2);
        assert_eq!(resolver.legend().boundaries, vec![0, 3, 4]);
        assert_eq!(resolver.color_for(3), Some("#add8e6"));
    }

    #[test]
    fn test_empty_table() {
        let resolver = ColorResolver::from_frequencies(&FrequencyTable::default());
        assert!(resolver.legend().stops.is_empty());
        assert!(resolver.legend().boundaries.is_empty());
    }
}
