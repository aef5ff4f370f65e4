//! `eda-reports` library crate.
//!
//! The binary (`eda`) is a thin wrapper around this library so that:
//!
//! - both report pipelines are testable without spawning processes
//! - aggregation, fitting and rendering stay separate from argument parsing

pub mod app;
pub mod cli;
pub mod counts;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
