//! Command-line parsing for the field-survey EDA reports.
//!
//! Argument parsing and command dispatch stay separate from the aggregation
//! and modeling code: each subcommand's args are turned into a config struct
//! in `app` and nothing below that layer sees clap types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "eda", version, about = "Amphibian count and seawater oxygen-model reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Yearly counts by life stage and the top lakes for one species.
    Amphibians(AmphibianArgs),
    /// Compare the five oxygen-saturation models by AICc, BIC and k-fold CV.
    Seawater(SeawaterArgs),
    /// Write reproducible synthetic input sheets for both reports.
    Synth(SynthArgs),
}

#[derive(Debug, Args, Clone)]
pub struct AmphibianArgs {
    /// Amphibian survey CSV.
    #[arg(long, value_name = "CSV")]
    pub input: PathBuf,

    /// Species code to report on.
    #[arg(long, env = "EDA_SPECIES", default_value = "RAMU")]
    pub species: String,

    /// Number of lakes in the top-lakes chart.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Directory for `amphibian_counts.svg`.
    #[arg(long, env = "EDA_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Skip the SVG figure.
    #[arg(long)]
    pub no_plot: bool,

    /// Terminal bar width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,
}

#[derive(Debug, Args, Clone)]
pub struct SeawaterArgs {
    /// Seawater sample CSV.
    #[arg(long, value_name = "CSV")]
    pub input: PathBuf,

    /// Number of cross-validation folds.
    #[arg(long, env = "EDA_FOLDS", default_value_t = 10)]
    pub folds: usize,

    /// Seed for the fold shuffle.
    #[arg(long, env = "EDA_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Model (1-5) whose equation is reported; defaults to the lowest AICc.
    #[arg(long, value_name = "N")]
    pub final_model: Option<usize>,

    /// Write criteria, CV results and the reported model to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// Directory for `amphibians.csv` and `seawater.csv`.
    #[arg(long, env = "EDA_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Random seed.
    #[arg(long, env = "EDA_SEED", default_value_t = 42)]
    pub seed: u64,

    #[arg(long, default_value_t = 2000)]
    pub amphibian_rows: usize,

    #[arg(long, default_value_t = 400)]
    pub seawater_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seawater_defaults() {
        let cli = Cli::try_parse_from(["eda", "seawater", "--input", "s.csv"]).unwrap();
        let Command::Seawater(args) = cli.command else {
            panic!("expected seawater command");
        };
        assert_eq!(args.input, PathBuf::from("s.csv"));
        assert_eq!(args.final_model, None);
        assert!(args.export.is_none());
    }

    #[test]
    fn amphibian_flags_parse() {
        let cli = Cli::try_parse_from([
            "eda", "amphibians", "--input", "a.csv", "--species", "PSRE", "--top", "3", "--no-plot",
        ])
        .unwrap();
        let Command::Amphibians(args) = cli.command else {
            panic!("expected amphibians command");
        };
        assert_eq!(args.species, "PSRE");
        assert_eq!(args.top, 3);
        assert!(args.no_plot);
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["eda", "amphibians"]).is_err());
    }
}
