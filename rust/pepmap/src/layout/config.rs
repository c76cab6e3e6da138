use crate::errors::{
    PepMapError,
    Result,
};
use serde::Serialize;

/// Geometry of the rendered report.
///
/// `line_width` is in residues, `vertical_increment` is the height of one
/// stacking row in whatever unit the presentation uses (pixels in HTML).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutConfig {
    line_width: usize,
    vertical_increment: f64,
}

impl LayoutConfig {
    pub fn new(line_width: usize, vertical_increment: f64) -> Result<Self> {
        if line_width < 1 {
            return Err(PepMapError::InvalidConfiguration {
                field: "line_width",
                reason: format!("must be at least 1, got {}", line_width),
            });
        }
        if !vertical_increment.is_finite() || vertical_increment <= 0.0 {
            return Err(PepMapError::InvalidConfiguration {
                field: "vertical_increment",
                reason: format!("must be a positive number, got {}", vertical_increment),
            });
        }
        Ok(Self {
            line_width,
            vertical_increment,
        })
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }

    pub fn vertical_increment(&self) -> f64 {
        self.vertical_increment
    }

    /// Number of lines needed for a reference of `len` residues.
    pub fn num_lines(&self, len: usize) -> usize {
        len.div_ceil(self.line_width)
    }
}
