//! Information-criterion model comparison.
//!
//! For each fitted model with `K` parameters (coefficients plus the residual
//! variance) and log-likelihood `LL` on `n` samples:
//!
//! - `AIC  = 2K - 2LL`
//! - `AICc = AIC + 2K(K+1) / (n - K - 1)`
//! - `BIC  = K ln(n) - 2LL`
//!
//! Smaller is better for all three. The comparison table reports each model's
//! deltas relative to the best value in the column.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Criteria, FittedModel};

pub fn aic(log_likelihood: f64, k: usize) -> f64 {
    2.0 * k as f64 - 2.0 * log_likelihood
}

/// Small-sample corrected AIC. Infinite when `n <= K + 1`.
pub fn aicc(log_likelihood: f64, k: usize, n: usize) -> f64 {
    if n <= k + 1 {
        return f64::INFINITY;
    }
    let k_f = k as f64;
    aic(log_likelihood, k) + 2.0 * k_f * (k_f + 1.0) / (n - k - 1) as f64
}

pub fn bic(log_likelihood: f64, k: usize, n: usize) -> f64 {
    k as f64 * (n as f64).ln() - 2.0 * log_likelihood
}

pub fn criteria(fit: &FittedModel) -> Criteria {
    Criteria {
        k: fit.k,
        n: fit.n,
        log_likelihood: fit.log_likelihood,
        aic: aic(fit.log_likelihood, fit.k),
        aicc: aicc(fit.log_likelihood, fit.k, fit.n),
        bic: bic(fit.log_likelihood, fit.k, fit.n),
    }
}

/// One row of the AICc/BIC comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriteriaRow {
    pub model_id: String,
    pub formula: String,
    pub criteria: Criteria,
    pub delta_aicc: f64,
    pub delta_bic: f64,
}

/// Comparison of all models, ordered by ascending AICc.
#[derive(Debug, Clone, Serialize)]
pub struct CriteriaTable {
    pub rows: Vec<CriteriaRow>,
}

impl CriteriaTable {
    pub fn from_fits(fits: &[FittedModel]) -> Self {
        let by_id: BTreeMap<&str, (&FittedModel, Criteria)> = fits
            .iter()
            .map(|f| (f.formula.id.as_str(), (f, criteria(f))))
            .collect();

        let min_aicc = by_id.values().map(|(_, c)| c.aicc).fold(f64::INFINITY, f64::min);
        let min_bic = by_id.values().map(|(_, c)| c.bic).fold(f64::INFINITY, f64::min);

        let mut rows: Vec<CriteriaRow> = by_id
            .into_iter()
            .map(|(id, (fit, c))| CriteriaRow {
                model_id: id.to_string(),
                formula: fit.formula.describe(),
                criteria: c,
                delta_aicc: c.aicc - min_aicc,
                delta_bic: c.bic - min_bic,
            })
            .collect();
        rows.sort_by(|a, b| a.criteria.aicc.total_cmp(&b.criteria.aicc));

        Self { rows }
    }

    pub fn best_by_aicc(&self) -> Option<&CriteriaRow> {
        self.rows.first()
    }

    pub fn best_by_bic(&self) -> Option<&CriteriaRow> {
        self.rows.iter().min_by(|a, b| a.criteria.bic.total_cmp(&b.criteria.bic))
    }
}
