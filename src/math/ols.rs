//! Ordinary least squares solver.
//!
//! Every candidate model is a small linear regression
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! with an intercept column and at most six covariates, so a dense SVD solve
//! is cheap even when it is repeated for every cross-validation fold.
//!
//! Rank deficiency is reported as an error rather than papered over with a
//! minimum-norm solution: coefficients of a collinear design are not
//! interpretable, and a fold that produces one should abort the run.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;

/// Coefficients and residual summary of one OLS solve.
#[derive(Debug, Clone)]
pub struct OlsSolution {
    pub beta: DVector<f64>,
    /// Standard error of each coefficient, same order as `beta`.
    pub std_errors: Vec<f64>,
    pub sse: f64,
    pub df_residual: usize,
}

/// Solve `x β ≈ y` by least squares.
///
/// Fails when the design has no residual degrees of freedom (`n <= p`) or is
/// rank-deficient.
pub fn solve_ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<OlsSolution, AppError> {
    let (n, p) = x.shape();
    if y.len() != n {
        return Err(AppError::numeric(format!(
            "Design has {n} rows but response has {} values.",
            y.len()
        )));
    }
    if n <= p {
        return Err(AppError::numeric(format!(
            "Cannot fit {p} coefficients to {n} rows: no residual degrees of freedom."
        )));
    }

    let svd = x.clone().svd(true, true);
    let s_max = svd.singular_values.max();
    // Same cut-off LAPACK-style rank checks use.
    let tol = s_max * (n.max(p) as f64) * f64::EPSILON;
    let rank = svd.rank(tol);
    if !(s_max.is_finite() && rank == p) {
        return Err(AppError::numeric(format!(
            "Design matrix is rank-deficient (rank {rank} < {p} columns)."
        )));
    }

    let beta = svd
        .solve(y, tol)
        .map_err(|e| AppError::numeric(format!("Least-squares solve failed: {e}")))?;
    if !beta.iter().all(|v| v.is_finite()) {
        return Err(AppError::numeric("Least-squares solve produced non-finite coefficients."));
    }

    let residuals = y - x * &beta;
    let sse = residuals.norm_squared();
    let df_residual = n - p;
    let sigma2 = sse / df_residual as f64;

    let xtx_inv = (x.transpose() * x)
        .try_inverse()
        .ok_or_else(|| AppError::numeric("X'X is singular; cannot compute standard errors."))?;
    let std_errors = (0..p).map(|j| (sigma2 * xtx_inv[(j, j)]).max(0.0).sqrt()).collect();

    Ok(OlsSolution {
        beta,
        std_errors,
        sse,
        df_residual,
    })
}
