//! Line-wrapped placement of peptide occurrences.
//!
//! The reference is cut into fixed-width lines. Every occurrence starting on a
//! line is drawn under it at the lowest stacking level that does not collide
//! with an annotation already placed on that line; an occurrence that runs past
//! the line end is split and its tail is carried to the start of the next line.
//! The next line's text row is drawn below the deepest annotation of the
//! previous one.

mod config;
mod engine;
mod state;

pub use config::LayoutConfig;
pub use engine::{
    AnnotationSpan,
    LayoutEngine,
    Line,
    Lines,
};
pub use state::LayoutState;
