//! Small descriptive statistics helpers.

use statrs::distribution::{ContinuousCDF, StudentsT};

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (`n - 1` denominator). `NaN` for fewer than two values.
pub fn sample_sd(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Root-mean-squared error between paired predictions and observations.
pub fn rmse(predicted: &[f64], actual: &[f64]) -> f64 {
    debug_assert_eq!(predicted.len(), actual.len());
    if predicted.is_empty() {
        return f64::NAN;
    }
    let mse = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).powi(2))
        .sum::<f64>()
        / predicted.len() as f64;
    mse.sqrt()
}

/// Total sum of squares around the mean.
pub fn total_sum_of_squares(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum()
}

/// Maximised Gaussian log-likelihood of a least-squares fit.
///
/// Uses the MLE of the error variance, `SSE / n`.
pub fn gaussian_log_likelihood(sse: f64, n: usize) -> f64 {
    let n_f = n as f64;
    -0.5 * n_f * ((2.0 * std::f64::consts::PI).ln() + (sse / n_f).ln() + 1.0)
}

/// Two-sided p-value of a t statistic with `df` degrees of freedom.
pub fn two_sided_t_p_value(t: f64, df: usize) -> f64 {
    if !t.is_finite() {
        return if t.is_nan() { f64::NAN } else { 0.0 };
    }
    match StudentsT::new(0.0, 1.0, df as f64) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}
