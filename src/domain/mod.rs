//! Domain types used throughout both pipelines.
//!
//! This module defines:
//!
//! - ingested records (`AmphibianRecord`, `SeawaterSample`)
//! - model descriptions and fit outputs (`ModelFormula`, `FittedModel`, `Criteria`)
//! - run configuration (`CountsConfig`, `SeawaterConfig`, `CvConfig`, `SynthConfig`)

pub mod types;

pub use types::*;
