//! Sparse numerical gradient check.
//!
//! Probes a handful of random entries of W with a central difference and
//! compares each against the analytic gradient.

use log::debug;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Result, SvmError};
use crate::math::matrix::Matrix;

/// One probed entry of the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradCheckSample {
    pub row: usize,
    pub col: usize,
    pub numerical: f64,
    pub analytic: f64,
    pub relative_error: f64,
}

/// |a − b| / max(1e-8, |a| + |b|)
pub fn relative_error(a: f64, b: f64) -> f64 {
    (a - b).abs() / (a.abs() + b.abs()).max(1e-8)
}

/// Evaluates `f` at W ± h along `num_checks` randomly chosen coordinates and
/// returns one sample per coordinate.
///
/// `f` receives a scratch copy of `w`; the perturbed entry is restored before
/// the next probe. `analytic` must have the shape of `w`.
pub fn grad_check_sparse<F, R>(
    mut f: F,
    w: &Matrix,
    analytic: &Matrix,
    num_checks: usize,
    h: f64,
    rng: &mut R,
) -> Result<Vec<GradCheckSample>>
where
    F: FnMut(&Matrix) -> Result<f64>,
    R: Rng + ?Sized,
{
    if analytic.shape() != w.shape() {
        let (context, expected, found) = if analytic.rows != w.rows {
            ("gradient rows", w.rows, analytic.rows)
        } else {
            ("gradient columns", w.cols, analytic.cols)
        };
        return Err(SvmError::DimensionMismatch { context, expected, found });
    }
    if w.data.is_empty() {
        return Ok(Vec::new());
    }

    let mut scratch = w.clone();
    let mut samples = Vec::with_capacity(num_checks);
    for _ in 0..num_checks {
        let row = rng.gen_range(0..w.rows);
        let col = rng.gen_range(0..w.cols);
        let old = w.get(row, col);

        scratch.set(row, col, old + h);
        let plus = f(&scratch);
        scratch.set(row, col, old - h);
        let minus = f(&scratch);
        scratch.set(row, col, old);

        let numerical = (plus? - minus?) / (2.0 * h);
        let analytic = analytic.get(row, col);
        let sample = GradCheckSample {
            row,
            col,
            numerical,
            analytic,
            relative_error: relative_error(numerical, analytic),
        };
        debug!(
            "grad check ({}, {}): numerical {:.6e} analytic {:.6e} relative error {:.3e}",
            row, col, numerical, analytic, sample.relative_error
        );
        samples.push(sample);
    }
    Ok(samples)
}
