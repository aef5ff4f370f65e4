//! Synthetic input generation.

pub mod synth;

pub use synth::{SynthOutput, generate_amphibians, generate_seawater, write_synthetic_inputs};
