//! Ordinary least squares.
//!
//! The trend line is a two-column regression `y = b0 + b1 x`, solved through
//! the SVD of the design matrix so a near-constant `x` degrades into `None`
//! rather than a panic.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit a straight line through `(x, y)` pairs.
pub fn fit_line(points: &[(f64, f64)]) -> Option<LineFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len();
    let mut design = DMatrix::zeros(n, 2);
    let mut y = DVector::zeros(n);
    for (i, &(xi, yi)) in points.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = xi;
        y[i] = yi;
    }

    let beta = solve_least_squares(&design, &y)?;
    Some(LineFit {
        intercept: beta[0],
        slope: beta[1],
    })
}
