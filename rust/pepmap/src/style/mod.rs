//! Colors and hover text for displayed sequences.

mod gradient;
mod tooltip;

pub use gradient::{
    ColorGradient,
    ColorLegend,
    ColorResolver,
    ColorStop,
};
pub use tooltip::{
    is_unique,
    PeptideTooltip,
};
