//! Plain-text reports for stdout.

pub mod format;

pub use format::*;
