use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::loss::svm::{svm_loss_naive, svm_loss_vectorized, LossGradient};
use crate::math::matrix::Matrix;

/// Selects which realization of the SVM loss to run.
///
/// - `Naive`      — per-example loops; the reference to check against.
/// - `Vectorized` — whole-matrix passes over the (N, C) score buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SvmVariant {
    Naive,
    Vectorized,
}

impl SvmVariant {
    pub fn compute(self, w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<LossGradient> {
        match self {
            SvmVariant::Naive => svm_loss_naive(w, x, y, reg),
            SvmVariant::Vectorized => svm_loss_vectorized(w, x, y, reg),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SvmVariant::Naive => "naive",
            SvmVariant::Vectorized => "vectorized",
        }
    }
}
