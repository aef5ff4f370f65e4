//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real main that:
//! - loads `.env` and installs logging
//! - parses CLI arguments into config structs
//! - runs a pipeline and prints its report
//! - writes optional exports

use clap::Parser;

use crate::cli::{AmphibianArgs, Cli, Command, SeawaterArgs, SynthArgs};
use crate::domain::{CountsConfig, CvConfig, SeawaterConfig, SynthConfig};
use crate::error::AppError;
use crate::report::CountsSummary;

pub mod pipeline;

/// Entry point for the `eda` binary.
pub fn run() -> Result<(), AppError> {
    // Must run before parsing so `env` defaults see `.env` values.
    dotenvy::dotenv().ok();
    crate::logging::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Amphibians(args) => handle_amphibians(&counts_config_from_args(&args)),
        Command::Seawater(args) => handle_seawater(&seawater_config_from_args(&args)),
        Command::Synth(args) => handle_synth(&synth_config_from_args(&args)),
    }
}

fn handle_amphibians(config: &CountsConfig) -> Result<(), AppError> {
    let run = pipeline::run_counts(config)?;

    let summary = CountsSummary {
        species: &config.species,
        records_read: run.records_read,
        records_used: run.records_used,
        stage_year: &run.stage_year,
        lakes: &run.lakes,
    };
    println!("{}", crate::report::format_counts_report(&summary));
    println!("{}", crate::plot::render_stage_year_bars(&run.stage_year, config.width));
    println!("{}", crate::plot::render_lake_bars(&run.lakes, config.width));

    if let Some(path) = &run.figure {
        println!("Figure written to {}", path.display());
    }
    Ok(())
}

fn handle_seawater(config: &SeawaterConfig) -> Result<(), AppError> {
    let run = pipeline::run_seawater(config)?;
    println!("{}", crate::report::format_seawater_report(&run.data, &run.comparison));

    if let Some(path) = &config.export {
        crate::io::export::write_comparison_json(path, &run.data, &run.comparison)?;
    }
    Ok(())
}

fn handle_synth(config: &SynthConfig) -> Result<(), AppError> {
    let out = crate::data::write_synthetic_inputs(config)?;
    println!("Wrote {}", out.amphibians.display());
    println!("Wrote {}", out.seawater.display());
    Ok(())
}

pub fn counts_config_from_args(args: &AmphibianArgs) -> CountsConfig {
    CountsConfig {
        input: args.input.clone(),
        species: args.species.clone(),
        top_n: args.top,
        out_dir: args.out_dir.clone(),
        plot: !args.no_plot,
        width: args.width,
    }
}

pub fn seawater_config_from_args(args: &SeawaterArgs) -> SeawaterConfig {
    SeawaterConfig {
        input: args.input.clone(),
        cv: CvConfig {
            folds: args.folds,
            seed: args.seed,
        },
        final_model: args.final_model,
        export: args.export.clone(),
    }
}

pub fn synth_config_from_args(args: &SynthArgs) -> SynthConfig {
    SynthConfig {
        out_dir: args.out_dir.clone(),
        seed: args.seed,
        amphibian_rows: args.amphibian_rows,
        seawater_rows: args.seawater_rows,
    }
}
