//! Poverty vs uninsured trend.
//!
//! The two state tables are joined on state code, never by row position, so a
//! state missing from one feed cannot shift every later pairing.

use tracing::{info, warn};

use crate::aggregate::StateTable;
use crate::error::AppError;
use crate::math::{LineFit, fit_line, pearson};

/// One joined state.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub state_code: u32,
    pub abbreviation: String,
    /// Percent in poverty (x axis).
    pub poverty_ratio: f64,
    /// Percent uninsured (y axis).
    pub uninsured_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendResult {
    pub points: Vec<TrendPoint>,
    pub pearson_r: f64,
    pub r_squared: f64,
    pub line: LineFit,
    /// State codes present in only one of the two tables.
    pub unmatched: Vec<u32>,
}

impl TrendResult {
    /// `(x, y)` pairs for plotting.
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.poverty_ratio, p.uninsured_ratio))
            .collect()
    }

    /// `[min, max]` of the poverty axis.
    pub fn x_bounds(&self) -> [f64; 2] {
        bounds(self.points.iter().map(|p| p.poverty_ratio))
    }

    /// `[min, max]` of the uninsured axis.
    pub fn y_bounds(&self) -> [f64; 2] {
        bounds(self.points.iter().map(|p| p.uninsured_ratio))
    }

    /// Evenly spaced samples of the trend line across `x_bounds`.
    pub fn line_samples(&self, n: usize) -> Vec<(f64, f64)> {
        let [x0, x1] = self.x_bounds();
        let n = n.max(2);
        (0..n)
            .map(|i| {
                let u = i as f64 / (n as f64 - 1.0);
                let x = x0 + u * (x1 - x0);
                (x, self.line.predict(x))
            })
            .collect()
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo.is_finite() && hi.is_finite() {
        [lo, hi]
    } else {
        [0.0, 1.0]
    }
}

/// Pair up states by code. Returns the joined points (in insurance-table
/// order) and the codes that only one side had.
pub fn join_on_state(insurance: &StateTable, poverty: &StateTable) -> (Vec<TrendPoint>, Vec<u32>) {
    let mut points = Vec::with_capacity(insurance.len());
    let mut unmatched = Vec::new();

    for ins in &insurance.rows {
        match poverty.get(ins.state_code) {
            Some(pov) => points.push(TrendPoint {
                state_code: ins.state_code,
                abbreviation: ins.abbreviation.clone(),
                poverty_ratio: pov.ratio,
                uninsured_ratio: ins.ratio,
            }),
            None => unmatched.push(ins.state_code),
        }
    }
    for pov in &poverty.rows {
        if insurance.get(pov.state_code).is_none() {
            unmatched.push(pov.state_code);
        }
    }

    if !unmatched.is_empty() {
        warn!(?unmatched, "states present in only one table were left out of the trend");
    }
    (points, unmatched)
}

/// Join the tables, then compute the correlation and the OLS trend line.
pub fn analyze(insurance: &StateTable, poverty: &StateTable) -> Result<TrendResult, AppError> {
    let (points, unmatched) = join_on_state(insurance, poverty);
    if points.len() < 2 {
        return Err(AppError::compute(format!(
            "Need at least two states present in both tables; found {}.",
            points.len()
        )));
    }

    let xs: Vec<f64> = points.iter().map(|p| p.poverty_ratio).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.uninsured_ratio).collect();

    let pearson_r = pearson(&xs, &ys)
        .ok_or_else(|| AppError::compute("Correlation undefined: one of the ratio columns is constant."))?;
    let xy: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    let line = fit_line(&xy)
        .ok_or_else(|| AppError::compute("Failed to fit a trend line (ill-conditioned system)."))?;

    info!(
        states = points.len(),
        r = pearson_r,
        slope = line.slope,
        intercept = line.intercept,
        "fitted poverty/uninsured trend"
    );

    Ok(TrendResult {
        points,
        pearson_r,
        r_squared: pearson_r * pearson_r,
        line,
        unmatched,
    })
}
