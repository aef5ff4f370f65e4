//! Chart rendering for the counts report.
//!
//! - `figure`: SVG figure with both panels (Plotters)
//! - `ascii`: the same two charts as terminal bars

pub mod ascii;
pub mod figure;

pub use ascii::*;
pub use figure::*;
