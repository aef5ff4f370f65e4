//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - JSON export of the seawater comparison (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
