//! Ordinary Least Squares (OLS) regression with coefficient standard errors.
//!
//! Used by the Augmented Dickey-Fuller regression; the Cholesky helpers are
//! shared with the SARIMA standard-error computation.

use crate::error::{ForecastError, Result};

/// Fitted OLS regression.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Coefficients, one per design column.
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients.
    pub std_errors: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Number of observations.
    pub nobs: usize,
}

impl OlsFit {
    /// Akaike information criterion with the Gaussian log-likelihood.
    pub fn aic(&self) -> f64 {
        let n = self.nobs as f64;
        let llf = -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (self.rss / n).ln() + 1.0);
        -2.0 * llf + 2.0 * self.coefficients.len() as f64
    }

    /// t statistic of one coefficient.
    pub fn t_stat(&self, index: usize) -> f64 {
        self.coefficients[index] / self.std_errors[index]
    }
}

/// Fit `y = X b` by least squares.
///
/// `design` holds one row per observation; every row must have the same
/// number of columns. Include a column of ones for an intercept.
pub fn ols_fit(y: &[f64], design: &[Vec<f64>]) -> Result<OlsFit> {
    let n = y.len();
    if design.len() != n {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: design.len(),
        });
    }
    let k = design.first().map(|row| row.len()).unwrap_or(0);
    if k == 0 {
        return Err(ForecastError::InvalidParameter(
            "OLS design matrix has no columns".into(),
        ));
    }
    if n <= k {
        return Err(ForecastError::InsufficientData {
            needed: k + 1,
            got: n,
        });
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &y_obs) in design.iter().zip(y) {
        if row.len() != k {
            return Err(ForecastError::DimensionMismatch {
                expected: k,
                got: row.len(),
            });
        }
        for i in 0..k {
            xty[i] += row[i] * y_obs;
            for j in 0..=i {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        for j in (i + 1)..k {
            xtx[i][j] = xtx[j][i];
        }
    }

    let factor = cholesky(&xtx).ok_or_else(|| {
        ForecastError::ComputationError("OLS design matrix is singular".into())
    })?;
    let coefficients = cholesky_solve(&factor, &xty);

    let rss: f64 = design
        .iter()
        .zip(y)
        .map(|(row, &y_obs)| {
            let fitted: f64 = row.iter().zip(&coefficients).map(|(x, b)| x * b).sum();
            (y_obs - fitted).powi(2)
        })
        .sum();

    let sigma_sq = rss / (n - k) as f64;
    let inverse = cholesky_inverse(&factor);
    let std_errors = (0..k)
        .map(|i| (sigma_sq * inverse[i][i]).max(0.0).sqrt())
        .collect();

    Ok(OlsFit {
        coefficients,
        std_errors,
        rss,
        nobs: n,
    })
}

/// Cholesky factor `L` of a symmetric positive definite matrix (`A = L L'`).
pub fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 1e-12 * a[i][i].abs() || !sum.is_finite() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    Some(l)
}

/// Solve `L L' x = b` given the Cholesky factor `L`.
pub fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    // Forward substitution: L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    x
}

/// Inverse of `L L'` from its Cholesky factor.
pub fn cholesky_inverse(l: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = l.len();
    let mut inverse = vec![vec![0.0; n]; n];
    for col in 0..n {
        let mut unit = vec![0.0; n];
        unit[col] = 1.0;
        let solved = cholesky_solve(l, &unit);
        for row in 0..n {
            inverse[row][col] = solved[row];
        }
    }
    inverse
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ols_recovers_exact_line() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|xi| 3.0 + 2.0 * xi).collect();
        let design: Vec<Vec<f64>> = x.iter().map(|&xi| vec![1.0, xi]).collect();

        let fit = ols_fit(&y, &design).unwrap();
        assert_relative_eq!(fit.coefficients[0], 3.0, epsilon = 1e-8);
        assert_relative_eq!(fit.coefficients[1], 2.0, epsilon = 1e-8);
        assert!(fit.rss < 1e-12);
    }

    #[test]
    fn ols_standard_error_matches_closed_form() {
        // Simple regression: se(b1) = sqrt(s^2 / Sxx)
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.1, 1.9, 3.2, 3.8, 5.1, 6.2];
        let design: Vec<Vec<f64>> = x.iter().map(|&xi| vec![1.0, xi]).collect();
        let fit = ols_fit(&y, &design).unwrap();

        let mean_x = x.iter().sum::<f64>() / 6.0;
        let sxx: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
        let s2 = fit.rss / 4.0;
        assert_relative_eq!(fit.std_errors[1], (s2 / sxx).sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn ols_rejects_too_few_rows() {
        let design = vec![vec![1.0, 0.0], vec![1.0, 1.0]];
        assert!(matches!(
            ols_fit(&[1.0, 2.0], &design),
            Err(ForecastError::InsufficientData { needed: 3, got: 2 })
        ));
    }

    #[test]
    fn ols_singular_design() {
        let design = vec![vec![1.0, 2.0]; 5];
        assert!(matches!(
            ols_fit(&[1.0, 2.0, 3.0, 4.0, 5.0], &design),
            Err(ForecastError::ComputationError(_))
        ));
    }

    #[test]
    fn cholesky_inverse_of_diagonal() {
        let a = vec![vec![4.0, 0.0], vec![0.0, 2.0]];
        let l = cholesky(&a).unwrap();
        let inv = cholesky_inverse(&l);
        assert_relative_eq!(inv[0][0], 0.25, epsilon = 1e-12);
        assert_relative_eq!(inv[1][1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(inv[0][1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn cholesky_rejects_indefinite() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
        assert!(cholesky(&a).is_none());
    }
}
