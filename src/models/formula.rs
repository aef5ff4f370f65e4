//! Candidate oxygen-saturation models and their design rows.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a sample (for OLS)
//! - predict `o2_saturation` given coefficients (for CV error and reporting)

use nalgebra::{DMatrix, DVector};

use crate::domain::{ModelFormula, Predictor, SeawaterSample};

/// The five nested formulas compared by the seawater report.
pub fn candidate_formulas() -> Vec<ModelFormula> {
    use Predictor::*;
    vec![
        ModelFormula::new("Model 1", &[Temperature, Salinity, Phosphate]),
        ModelFormula::new("Model 2", &[Temperature, Salinity, Phosphate, Depth]),
        ModelFormula::new("Model 3", &[Temperature, Salinity, Phosphate, Nitrate]),
        ModelFormula::new("Model 4", &[Temperature, Salinity, Phosphate, Nitrate, Depth]),
        ModelFormula::new(
            "Model 5",
            &[Temperature, Salinity, Phosphate, Nitrate, Chlorophyll, Depth],
        ),
    ]
}

/// Fill a design row: intercept first, then predictors in formula order.
///
/// # Panics
/// Panics if `out.len() != formula.coef_len()`.
pub fn fill_design_row(formula: &ModelFormula, sample: &SeawaterSample, out: &mut [f64]) {
    assert_eq!(out.len(), formula.coef_len(), "design row length mismatch");
    out[0] = 1.0;
    for (slot, p) in out[1..].iter_mut().zip(&formula.predictors) {
        *slot = p.value(sample);
    }
}

/// Design matrix and response vector for a set of samples.
pub fn design_matrix(formula: &ModelFormula, samples: &[&SeawaterSample]) -> (DMatrix<f64>, DVector<f64>) {
    let p = formula.coef_len();
    let mut x = DMatrix::<f64>::zeros(samples.len(), p);
    let mut row = vec![0.0; p];
    for (i, s) in samples.iter().enumerate() {
        fill_design_row(formula, s, &mut row);
        for (j, v) in row.iter().enumerate() {
            x[(i, j)] = *v;
        }
    }
    let y = DVector::from_iterator(samples.len(), samples.iter().map(|s| s.o2_saturation));
    (x, y)
}

/// Predict oxygen saturation for one sample.
pub fn predict(formula: &ModelFormula, coefficients: &[f64], sample: &SeawaterSample) -> f64 {
    let slopes = formula
        .predictors
        .iter()
        .zip(&coefficients[1..])
        .map(|(p, b)| b * p.value(sample))
        .sum::<f64>();
    coefficients[0] + slopes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SeawaterSample {
        SeawaterSample {
            o2_saturation: 90.0,
            temperature: 10.0,
            salinity: 33.0,
            phosphate: 1.0,
            nitrate: 0.5,
            chlorophyll: 0.2,
            depth: 100.0,
        }
    }

    #[test]
    fn candidates_are_nested_in_predictor_count() {
        let formulas = candidate_formulas();
        assert_eq!(formulas.len(), 5);
        let base = &formulas[0].predictors;
        for f in &formulas {
            assert!(base.iter().all(|p| f.predictors.contains(p)), "{}", f.id);
        }
        assert_eq!(formulas[4].predictors.len(), 6);
    }

    #[test]
    fn design_row_and_prediction_agree() {
        let f = ModelFormula::new("m", &[Predictor::Temperature, Predictor::Depth]);
        let s = sample();
        let mut row = [0.0; 3];
        fill_design_row(&f, &s, &mut row);
        assert_eq!(row, [1.0, 10.0, 100.0]);

        let coef = [5.0, 2.0, -0.1];
        let expected: f64 = row.iter().zip(coef).map(|(x, b)| x * b).sum();
        assert!((predict(&f, &coef, &s) - expected).abs() < 1e-12);
    }

    #[test]
    fn design_matrix_shapes() {
        let f = &candidate_formulas()[1];
        let s1 = sample();
        let s2 = SeawaterSample { o2_saturation: 80.0, ..sample() };
        let (x, y) = design_matrix(f, &[&s1, &s2]);
        assert_eq!(x.shape(), (2, 5));
        assert_eq!(y[1], 80.0);
        assert_eq!(x[(1, 4)], 100.0);
    }
}
