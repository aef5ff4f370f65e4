//! Linear oxygen-saturation models.
//!
//! Models are described by data (`ModelFormula`) and evaluated by small, pure
//! functions so fitting and cross-validation code can stay generic.

pub mod formula;

pub use formula::*;
