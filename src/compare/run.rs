use std::time::Instant;

use log::{debug, info};

use crate::compare::report::{ComparisonReport, ABS_TOLERANCE};
use crate::error::Result;
use crate::loss::loss_type::SvmVariant;
use crate::loss::svm::LossGradient;
use crate::math::matrix::Matrix;

/// Runs the naive and then the vectorized loss on the same inputs, timing
/// each, and reports how far apart the results are.
pub fn compare(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<ComparisonReport> {
    let (naive, naive_elapsed_us) = timed(SvmVariant::Naive, w, x, y, reg)?;
    let (vectorized, vectorized_elapsed_us) = timed(SvmVariant::Vectorized, w, x, y, reg)?;

    let diff = naive.grad.sub(&vectorized.grad)?;
    let grad_max_abs_difference = naive.grad.max_abs_diff(&vectorized.grad)?;
    let report = ComparisonReport {
        naive_loss: naive.loss,
        vectorized_loss: vectorized.loss,
        loss_difference: (naive.loss - vectorized.loss).abs(),
        grad_difference: diff.frobenius_norm(),
        grad_max_abs_difference,
        grad_scale: naive.grad.data.iter().fold(0.0, |m, v| m.max(v.abs())),
        naive_elapsed_us,
        vectorized_elapsed_us,
    };
    info!(
        "naive loss {:e} vs vectorized loss {:e}, gradient difference {:e}",
        report.naive_loss, report.vectorized_loss, report.grad_difference
    );
    Ok(report)
}

/// Elementwise closeness of two results: every value must satisfy
/// |a − b| <= 1e-12 + rtol · max(|a|, |b|).
pub fn outputs_match(a: &LossGradient, b: &LossGradient, rtol: f64) -> bool {
    let close = |p: f64, q: f64| (p - q).abs() <= ABS_TOLERANCE + rtol * p.abs().max(q.abs());
    a.grad.shape() == b.grad.shape()
        && close(a.loss, b.loss)
        && a.grad.data.iter().zip(&b.grad.data).all(|(&p, &q)| close(p, q))
}

fn timed(variant: SvmVariant, w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<(LossGradient, u64)> {
    let start = Instant::now();
    let out = variant.compute(w, x, y, reg)?;
    let elapsed_us = start.elapsed().as_micros() as u64;
    debug!("{} loss computed in {}us", variant.name(), elapsed_us);
    Ok((out, elapsed_us))
}
