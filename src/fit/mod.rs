//! Model fitting and comparison.
//!
//! Responsibilities:
//!
//! - fit each candidate formula by OLS (`fitter`)
//! - score fits by AICc / BIC (`criteria`)
//! - assign seeded folds and cross-validate (`folds`, `cv`)
//! - bundle everything into one comparison (`selection`)

pub mod criteria;
pub mod cv;
pub mod fitter;
pub mod folds;
pub mod selection;

pub use criteria::*;
pub use cv::*;
pub use fitter::*;
pub use folds::*;
pub use selection::*;
