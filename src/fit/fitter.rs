//! Fit a single formula to a set of seawater samples.

use crate::domain::{Coefficient, FittedModel, ModelFormula, SeawaterSample};
use crate::error::AppError;
use crate::math::{gaussian_log_likelihood, solve_ols, two_sided_t_p_value};
use crate::models::design_matrix;

/// Fit `formula` by OLS on `samples`.
///
/// Errors name the formula so a failing fold is easy to trace.
pub fn fit_formula(formula: &ModelFormula, samples: &[&SeawaterSample]) -> Result<FittedModel, AppError> {
    let (x, y) = design_matrix(formula, samples);
    let sol = solve_ols(&x, &y).map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", formula.id)))?;

    let n = samples.len();
    let terms = std::iter::once("(Intercept)").chain(formula.predictors.iter().map(|p| p.display_name()));
    let coefficients = terms
        .zip(sol.beta.iter())
        .zip(&sol.std_errors)
        .map(|((term, &estimate), &std_error)| {
            let t_value = estimate / std_error;
            Coefficient {
                term: term.to_string(),
                estimate,
                std_error,
                t_value,
                p_value: two_sided_t_p_value(t_value, sol.df_residual),
            }
        })
        .collect();

    Ok(FittedModel {
        formula: formula.clone(),
        coefficients,
        sse: sol.sse,
        n,
        df_residual: sol.df_residual,
        log_likelihood: gaussian_log_likelihood(sol.sse, n),
        k: formula.coef_len() + 1,
    })
}

/// Fit every formula on the same samples, stopping at the first failure.
pub fn fit_all(formulas: &[ModelFormula], samples: &[&SeawaterSample]) -> Result<Vec<FittedModel>, AppError> {
    formulas.iter().map(|f| fit_formula(f, samples)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Predictor;

    fn sample(o2: f64, t: f64, s: f64) -> SeawaterSample {
        SeawaterSample {
            o2_saturation: o2,
            temperature: t,
            salinity: s,
            phosphate: 0.0,
            nitrate: 0.0,
            chlorophyll: 0.0,
            depth: 0.0,
        }
    }

    #[test]
    fn fit_reports_coefficients_in_formula_order() {
        let samples: Vec<SeawaterSample> = (0..12)
            .map(|i| {
                let t = i as f64;
                let s = ((i * 7) % 5) as f64;
                sample(100.0 - 2.0 * t + 0.5 * s, t, s)
            })
            .collect();
        let refs: Vec<&SeawaterSample> = samples.iter().collect();
        let f = ModelFormula::new("m", &[Predictor::Temperature, Predictor::Salinity]);

        let fit = fit_formula(&f, &refs).unwrap();
        let terms: Vec<&str> = fit.coefficients.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, ["(Intercept)", "temperature", "salinity"]);
        let b = fit.estimates();
        assert!((b[0] - 100.0).abs() < 1e-8);
        assert!((b[1] + 2.0).abs() < 1e-8);
        assert!((b[2] - 0.5).abs() < 1e-8);
        assert_eq!(fit.k, 4);
        assert_eq!(fit.df_residual, 9);
    }

    #[test]
    fn constant_predictor_fails_with_formula_id() {
        let samples: Vec<SeawaterSample> = (0..6).map(|i| sample(i as f64, 1.0, 2.0)).collect();
        let refs: Vec<&SeawaterSample> = samples.iter().collect();
        let f = ModelFormula::new("Model X", &[Predictor::Temperature]);
        let err = fit_formula(&f, &refs).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.message().starts_with("Model X:"));
    }
}
