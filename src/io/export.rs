//! Export the seawater model comparison to JSON.
//!
//! The export carries everything the text report prints (criteria, CV summary,
//! per-fold RMSE and the reported model) so downstream scripts do not need to
//! parse the terminal output. Infinite AICc values serialise as `null`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::FittedModel;
use crate::error::AppError;
use crate::fit::criteria::CriteriaRow;
use crate::fit::cv::{CvSummary, FoldError};
use crate::fit::selection::{Leaders, ModelComparison};
use crate::io::ingest::SeawaterData;

#[derive(Debug, Serialize)]
pub struct ComparisonExport<'a> {
    pub tool: &'static str,
    pub samples_read: usize,
    pub samples_used: usize,
    pub samples_incomplete: usize,
    pub folds: usize,
    pub seed: u64,
    pub criteria: &'a [CriteriaRow],
    pub cv_summary: &'a [CvSummary],
    pub fold_rmse: &'a [FoldError],
    pub leaders: &'a Leaders,
    pub reported_model: &'a FittedModel,
    pub equation: String,
}

impl<'a> ComparisonExport<'a> {
    pub fn new(data: &SeawaterData, cmp: &'a ModelComparison) -> Self {
        Self {
            tool: "eda",
            samples_read: data.rows_read,
            samples_used: data.samples.len(),
            samples_incomplete: data.rows_incomplete,
            folds: cmp.cv.folds,
            seed: cmp.cv.seed,
            criteria: &cmp.criteria.rows,
            cv_summary: &cmp.cv.summaries,
            fold_rmse: &cmp.cv.fold_errors,
            leaders: &cmp.leaders,
            reported_model: cmp.reported_fit(),
            equation: crate::report::format_equation(cmp.reported_fit()),
        }
    }
}

/// Write the comparison as pretty-printed JSON to `path`.
pub fn write_comparison_json(path: &Path, data: &SeawaterData, cmp: &ModelComparison) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export JSON '{}': {e}", path.display())))?;
    write_comparison(file, data, cmp)?;
    tracing::info!(path = %path.display(), "wrote comparison export");
    Ok(())
}

pub fn write_comparison<W: Write>(mut writer: W, data: &SeawaterData, cmp: &ModelComparison) -> Result<(), AppError> {
    let export = ComparisonExport::new(data, cmp);
    serde_json::to_writer_pretty(&mut writer, &export)
        .map_err(|e| AppError::input(format!("Failed to write export JSON: {e}")))?;
    writeln!(writer).map_err(|e| AppError::input(format!("Failed to write export JSON: {e}")))?;
    Ok(())
}
