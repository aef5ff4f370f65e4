//! Shared pipeline logic behind the CLI handlers.
//!
//! Each pipeline goes ingest -> aggregate/fit -> (figure) and returns all
//! computed outputs, so the handlers in `app` only print and export, and the
//! integration tests can drive the same code without spawning a process.

use std::path::PathBuf;

use crate::counts::{StageYearCounts, counts_by_stage_year, filter_records, top_lakes};
use crate::domain::{CountsConfig, LakeCount, SeawaterConfig};
use crate::error::AppError;
use crate::fit::selection::{ModelComparison, compare_models};
use crate::io::ingest::{SeawaterData, load_amphibians, load_seawater};
use crate::models::candidate_formulas;

/// File name of the counts figure inside the output directory.
pub const COUNTS_FIGURE: &str = "amphibian_counts.svg";

/// All computed outputs of an `eda amphibians` run.
#[derive(Debug, Clone)]
pub struct CountsOutput {
    pub records_read: usize,
    pub records_used: usize,
    pub stage_year: StageYearCounts,
    pub lakes: Vec<LakeCount>,
    /// Path of the SVG figure, if one was written.
    pub figure: Option<PathBuf>,
}

/// All computed outputs of an `eda seawater` run.
#[derive(Debug, Clone)]
pub struct SeawaterOutput {
    pub data: SeawaterData,
    pub comparison: ModelComparison,
}

pub fn run_counts(config: &CountsConfig) -> Result<CountsOutput, AppError> {
    let records = load_amphibians(&config.input)?;
    let records_used = filter_records(&records, &config.species).len();
    if records_used == 0 {
        tracing::warn!(species = %config.species, "no matching records");
    }

    let stage_year = counts_by_stage_year(&records, &config.species);
    let lakes = top_lakes(&records, &config.species, config.top_n);

    let figure = if config.plot {
        std::fs::create_dir_all(&config.out_dir).map_err(|e| {
            AppError::input(format!("Failed to create '{}': {e}", config.out_dir.display()))
        })?;
        let path = config.out_dir.join(COUNTS_FIGURE);
        crate::plot::render_counts_figure(&path, &stage_year, &lakes, &config.species)?;
        Some(path)
    } else {
        None
    };

    Ok(CountsOutput {
        records_read: records.len(),
        records_used,
        stage_year,
        lakes,
        figure,
    })
}

pub fn run_seawater(config: &SeawaterConfig) -> Result<SeawaterOutput, AppError> {
    let data = load_seawater(&config.input)?;
    let comparison = compare_models(&candidate_formulas(), &data.samples, &config.cv, config.final_model)?;
    tracing::info!(
        reported = %comparison.reported_fit().formula.id,
        aicc = %comparison.leaders.aicc,
        cv_rmse = %comparison.leaders.cv_rmse,
        "model comparison complete"
    );
    Ok(SeawaterOutput { data, comparison })
}
