//! k-fold cross-validation of the candidate formulas.
//!
//! For each fold in order: refit every formula on the other folds, predict the
//! held-out fold and record the RMSE. Folds run strictly one after another and
//! the first fitting error aborts the whole run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{CvConfig, ModelFormula, SeawaterSample};
use crate::error::AppError;
use crate::fit::fitter::fit_formula;
use crate::fit::folds::FoldAssignment;
use crate::math::{mean, rmse, sample_sd};
use crate::models::predict;

/// RMSE of one model on one held-out fold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldError {
    pub fold: usize,
    pub model_id: String,
    pub n_test: usize,
    pub rmse: f64,
}

/// Per-model summary across all folds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvSummary {
    pub model_id: String,
    pub mean_rmse: f64,
    pub sd_rmse: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CvResult {
    pub folds: usize,
    pub seed: u64,
    #[serde(skip)]
    pub assignment: FoldAssignment,
    /// Fold-major: all models for fold 1, then fold 2, ...
    pub fold_errors: Vec<FoldError>,
    /// One summary per model, in formula order.
    pub summaries: Vec<CvSummary>,
}

impl CvResult {
    /// Model with the lowest mean RMSE (ties keep formula order).
    pub fn best(&self) -> Option<&CvSummary> {
        self.summaries.iter().fold(None, |best: Option<&CvSummary>, s| match best {
            Some(b) if b.mean_rmse <= s.mean_rmse => Some(b),
            _ => Some(s),
        })
    }

    /// Per-fold RMSE values of one model, in fold order.
    pub fn rmse_by_fold(&self, model_id: &str) -> Vec<f64> {
        self.fold_errors
            .iter()
            .filter(|e| e.model_id == model_id)
            .map(|e| e.rmse)
            .collect()
    }
}

pub fn cross_validate(
    formulas: &[ModelFormula],
    samples: &[SeawaterSample],
    config: &CvConfig,
) -> Result<CvResult, AppError> {
    let assignment = FoldAssignment::new(samples.len(), config)?;
    tracing::debug!(fold_sizes = ?assignment.fold_sizes(), "fold assignment");

    let mut fold_errors = Vec::with_capacity(assignment.k * formulas.len());
    for fold in 1..=assignment.k {
        let train: Vec<&SeawaterSample> = assignment.train_indices(fold).into_iter().map(|i| &samples[i]).collect();
        let test: Vec<&SeawaterSample> = assignment.test_indices(fold).into_iter().map(|i| &samples[i]).collect();
        let actual: Vec<f64> = test.iter().map(|s| s.o2_saturation).collect();

        for formula in formulas {
            let fit = fit_formula(formula, &train)
                .map_err(|e| AppError::new(e.exit_code(), format!("Fold {fold}: {e}")))?;
            let coef = fit.estimates();
            let predicted: Vec<f64> = test.iter().map(|s| predict(formula, &coef, s)).collect();
            fold_errors.push(FoldError {
                fold,
                model_id: formula.id.clone(),
                n_test: test.len(),
                rmse: rmse(&predicted, &actual),
            });
        }
        tracing::debug!(fold, n_train = train.len(), n_test = test.len(), "fold complete");
    }

    let mut per_model: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for e in &fold_errors {
        per_model.entry(e.model_id.as_str()).or_default().push(e.rmse);
    }
    let summaries = formulas
        .iter()
        .map(|f| {
            let values = per_model.get(f.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            CvSummary {
                model_id: f.id.clone(),
                mean_rmse: mean(values),
                sd_rmse: sample_sd(values),
            }
        })
        .collect();

    tracing::info!(folds = assignment.k, models = formulas.len(), "cross-validation complete");

    Ok(CvResult {
        folds: assignment.k,
        seed: config.seed,
        assignment,
        fold_errors,
        summaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Predictor;
    use crate::models::candidate_formulas;

    fn synthetic(n: usize, noise: bool) -> Vec<SeawaterSample> {
        (0..n)
            .map(|i| {
                let x = i as f64;
                let temperature = 5.0 + (x * 0.37).sin() * 4.0 + x * 0.05;
                let salinity = 33.0 + (x * 0.61).cos();
                let phosphate = 0.5 + (x * 0.23).sin().abs() * 2.0;
                let nitrate = ((x * 0.71).sin() + 1.0) * 0.3;
                let chlorophyll = ((x * 0.11).cos() + 1.1) * 0.5;
                let depth = (i % 17) as f64 * 10.0;
                let eps = if noise { (x * 1.7).sin() * 1.5 } else { 0.0 };
                SeawaterSample {
                    o2_saturation: 140.0 - 3.0 * temperature + 0.8 * salinity - 12.0 * phosphate
                        - 0.02 * depth
                        + eps,
                    temperature,
                    salinity,
                    phosphate,
                    nitrate,
                    chlorophyll,
                    depth,
                }
            })
            .collect()
    }

    #[test]
    fn rmse_is_non_negative_and_zero_for_exact_model() {
        let samples = synthetic(60, false);
        let formulas = candidate_formulas();
        let cv = cross_validate(&formulas, &samples, &CvConfig::default()).unwrap();

        assert_eq!(cv.fold_errors.len(), 10 * formulas.len());
        assert!(cv.fold_errors.iter().all(|e| e.rmse >= 0.0));
        // Model 2 is the data-generating formula; it predicts held-out rows exactly.
        for e in cv.fold_errors.iter().filter(|e| e.model_id == "Model 2") {
            assert!(e.rmse < 1e-8, "fold {} rmse {}", e.fold, e.rmse);
        }
        // Model 1 omits depth and cannot be exact.
        assert!(cv.rmse_by_fold("Model 1").iter().all(|&r| r > 0.0));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let samples = synthetic(80, true);
        let formulas = candidate_formulas();
        let cfg = CvConfig { folds: 10, seed: 42 };
        let a = cross_validate(&formulas, &samples, &cfg).unwrap();
        let b = cross_validate(&formulas, &samples, &cfg).unwrap();
        assert_eq!(a.assignment, b.assignment);
        assert_eq!(a.fold_errors, b.fold_errors);
        assert_eq!(a.summaries, b.summaries);
    }

    #[test]
    fn summaries_are_mean_and_sd_of_fold_rmse() {
        let samples = synthetic(50, true);
        let formulas = candidate_formulas();
        let cv = cross_validate(&formulas, &samples, &CvConfig { folds: 5, seed: 3 }).unwrap();

        for s in &cv.summaries {
            let values = cv.rmse_by_fold(&s.model_id);
            assert_eq!(values.len(), 5);
            assert!((s.mean_rmse - mean(&values)).abs() < 1e-12);
            assert!((s.sd_rmse - sample_sd(&values)).abs() < 1e-12);
        }
        assert!(cv.best().is_some());
    }

    #[test]
    fn rank_deficient_fold_aborts() {
        // Depth is constant, so any formula using it is collinear with the intercept.
        let mut samples = synthetic(30, true);
        for s in &mut samples {
            s.depth = 5.0;
        }
        let formula = ModelFormula::new("depth only", &[Predictor::Depth]);
        let err = cross_validate(&[formula], &samples, &CvConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.message().starts_with("Fold 1:"));
    }
}
