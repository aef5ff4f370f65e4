//! Full model comparison: fits, information criteria and cross-validation.
//!
//! Nothing here picks a winner automatically. The comparison records which
//! model leads on each signal (AICc, BIC, mean CV RMSE) and carries one
//! *reported* model whose equation goes at the end of the report. The caller
//! chooses that model; by default it is the lowest-AICc one.

use serde::Serialize;

use crate::domain::{CvConfig, FittedModel, ModelFormula, SeawaterSample};
use crate::error::AppError;
use crate::fit::criteria::CriteriaTable;
use crate::fit::cv::{CvResult, cross_validate};
use crate::fit::fitter::fit_all;

/// Which model leads on each comparison signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaders {
    pub aicc: String,
    pub bic: String,
    pub cv_rmse: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelComparison {
    /// Fits on the full sample set, in formula order.
    pub fits: Vec<FittedModel>,
    pub criteria: CriteriaTable,
    pub cv: CvResult,
    pub leaders: Leaders,
    /// Index into `fits` of the model whose equation is reported.
    pub reported: usize,
}

impl ModelComparison {
    pub fn reported_fit(&self) -> &FittedModel {
        &self.fits[self.reported]
    }
}

/// Fit, score and cross-validate every formula.
///
/// `final_model` is a 1-based index into `formulas`; `None` reports the
/// lowest-AICc model.
pub fn compare_models(
    formulas: &[ModelFormula],
    samples: &[SeawaterSample],
    cv_config: &CvConfig,
    final_model: Option<usize>,
) -> Result<ModelComparison, AppError> {
    if formulas.is_empty() {
        return Err(AppError::input("No candidate formulas to compare."));
    }
    if let Some(idx) = final_model {
        if idx == 0 || idx > formulas.len() {
            return Err(AppError::input(format!(
                "--final-model must be between 1 and {} (got {idx}).",
                formulas.len()
            )));
        }
    }

    let refs: Vec<&SeawaterSample> = samples.iter().collect();
    let fits = fit_all(formulas, &refs)?;
    let criteria = CriteriaTable::from_fits(&fits);
    let cv = cross_validate(formulas, samples, cv_config)?;

    let leaders = Leaders {
        aicc: leader_id(criteria.best_by_aicc().map(|r| r.model_id.as_str()))?,
        bic: leader_id(criteria.best_by_bic().map(|r| r.model_id.as_str()))?,
        cv_rmse: leader_id(cv.best().map(|s| s.model_id.as_str()))?,
    };

    let reported = match final_model {
        Some(idx) => idx - 1,
        None => formulas
            .iter()
            .position(|f| f.id == leaders.aicc)
            .ok_or_else(|| AppError::numeric("Lowest-AICc model not found among formulas."))?,
    };

    Ok(ModelComparison {
        fits,
        criteria,
        cv,
        leaders,
        reported,
    })
}

fn leader_id(id: Option<&str>) -> Result<String, AppError> {
    id.map(str::to_string)
        .ok_or_else(|| AppError::numeric("No model could be ranked."))
}
