use crate::error::{Result, SvmError};
use crate::math::matrix::Matrix;

/// Required score gap between the correct class and every other class.
pub const DELTA: f64 = 1.0;

/// Output of one loss evaluation: the scalar loss and ∂loss/∂W.
#[derive(Debug, Clone, PartialEq)]
pub struct LossGradient {
    pub loss: f64,
    /// Same shape as W: (D, C).
    pub grad: Matrix,
}

/// Structured (multiclass) SVM loss, naive implementation with explicit loops.
///
/// Shapes: `w` is (D, C), `x` is (N, D), `y` has N labels in [0, C).
///
/// L = 1/N · Σᵢ Σ_{j≠yᵢ} max(0, sⱼ − s_{yᵢ} + Δ) + reg · Σ W²
///
/// The penalty is not halved; its gradient is `reg · W`.
pub fn svm_loss_naive(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<LossGradient> {
    validate_inputs(w, x, y, reg)?;
    let (n, d) = x.shape();
    let c = w.cols;

    let mut grad = Matrix::zeros(d, c);
    let mut loss = 0.0;
    let mut scores = vec![0.0; c];

    for i in 0..n {
        let xi = x.row(i);
        let yi = y[i];

        scores.iter_mut().for_each(|s| *s = 0.0);
        for (k, &xik) in xi.iter().enumerate() {
            for (s, &wkj) in scores.iter_mut().zip(w.row(k)) {
                *s += xik * wkj;
            }
        }
        let correct = scores[yi];

        for j in 0..c {
            if j == yi {
                continue;
            }
            let margin = (scores[j] - correct + DELTA).max(0.0);
            if margin > 0.0 {
                loss += margin;
                for (k, &xik) in xi.iter().enumerate() {
                    let row = grad.row_mut(k);
                    row[yi] -= xik;
                    row[j] += xik;
                }
            }
        }
    }

    let inv_n = 1.0 / n as f64;
    loss *= inv_n;
    grad.scale(inv_n);

    apply_regularization(w, reg, &mut loss, &mut grad)?;
    Ok(LossGradient { loss, grad })
}

/// Structured SVM loss computed with whole-matrix operations.
///
/// Same inputs and result as [`svm_loss_naive`]. The score matrix `X · W`
/// is turned into the margin matrix in place and then into the indicator
/// matrix, so only one (N, C) buffer is allocated besides the gradient.
pub fn svm_loss_vectorized(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<LossGradient> {
    validate_inputs(w, x, y, reg)?;
    let n = x.rows;

    // (N, C)
    let mut scores = x.matmul(w)?;

    // margins = max(0, scores - s_y + Δ), true-class column zeroed.
    let mut total = 0.0;
    for (i, &yi) in y.iter().enumerate() {
        let row = scores.row_mut(i);
        let correct = row[yi];
        for s in row.iter_mut() {
            *s = (*s - correct + DELTA).max(0.0);
        }
        row[yi] = 0.0;
        total += row.iter().sum::<f64>();
    }
    let mut loss = total / n as f64;

    // Indicator: 1 where the margin is positive, and the true class collects
    // minus the number of violating classes.
    let mut binary = scores;
    for (i, &yi) in y.iter().enumerate() {
        let row = binary.row_mut(i);
        let mut violations = 0.0;
        for v in row.iter_mut() {
            if *v > 0.0 {
                *v = 1.0;
                violations += 1.0;
            }
        }
        row[yi] = -violations;
    }

    let mut grad = x.transpose().matmul(&binary)?;
    grad.scale(1.0 / n as f64);

    apply_regularization(w, reg, &mut loss, &mut grad)?;
    Ok(LossGradient { loss, grad })
}

/// Checks every shape, label and value precondition once, before any work
/// is done. Non-finite entries are rejected: `max(0, NaN)` would otherwise
/// drop a poisoned margin and report a plausible finite loss.
pub fn validate_inputs(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<()> {
    w.check_buffer()?;
    x.check_buffer()?;
    if x.rows == 0 {
        return Err(SvmError::EmptyBatch);
    }
    if w.cols == 0 {
        return Err(SvmError::DimensionMismatch {
            context: "number of classes (W columns)",
            expected: 1,
            found: 0,
        });
    }
    if x.cols != w.rows {
        return Err(SvmError::DimensionMismatch {
            context: "feature dimension (X columns vs W rows)",
            expected: w.rows,
            found: x.cols,
        });
    }
    if y.len() != x.rows {
        return Err(SvmError::DimensionMismatch {
            context: "label count (y length vs X rows)",
            expected: x.rows,
            found: y.len(),
        });
    }
    if let Some((index, &label)) = y.iter().enumerate().find(|&(_, &l)| l >= w.cols) {
        return Err(SvmError::LabelOutOfRange { index, label, num_classes: w.cols });
    }
    if !reg.is_finite() || reg < 0.0 {
        return Err(SvmError::InvalidRegularization(reg));
    }
    if let Some((row, col)) = w.first_non_finite() {
        return Err(SvmError::NonFinite { matrix: "W", row, col });
    }
    if let Some((row, col)) = x.first_non_finite() {
        return Err(SvmError::NonFinite { matrix: "X", row, col });
    }
    Ok(())
}

/// loss += reg · Σ W², grad += reg · W
fn apply_regularization(w: &Matrix, reg: f64, loss: &mut f64, grad: &mut Matrix) -> Result<()> {
    *loss += reg * w.sum_squares();
    grad.scaled_add_assign(reg, w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn m(rows: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_data(rows).unwrap()
    }

    #[test]
    fn identity_weights_sit_exactly_on_the_margin() {
        let w = m(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let x = m(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let y = [0, 1];

        for out in [
            svm_loss_naive(&w, &x, &y, 0.0).unwrap(),
            svm_loss_vectorized(&w, &x, &y, 0.0).unwrap(),
        ] {
            assert_eq!(out.loss, 0.0);
            assert_eq!(out.grad, Matrix::zeros(2, 2));
        }
    }

    #[test]
    fn single_violation_hand_computed() {
        // scores = [0.5, 1.0, -1.0], correct class 0.
        // margins: j=1 -> 1.5, j=2 -> max(0, -0.5) = 0.
        let w = m(vec![vec![0.5, 1.0, -1.0]]);
        let x = m(vec![vec![1.0]]);
        let y = [0];

        let naive = svm_loss_naive(&w, &x, &y, 0.0).unwrap();
        assert_relative_eq!(naive.loss, 1.5);
        assert_eq!(naive.grad, m(vec![vec![-1.0, 1.0, 0.0]]));

        let vectorized = svm_loss_vectorized(&w, &x, &y, 0.0).unwrap();
        assert_relative_eq!(vectorized.loss, 1.5);
        assert_eq!(vectorized.grad, naive.grad);
    }

    #[test]
    fn true_class_never_contributes_its_own_margin() {
        // One class only: the sole score is the true one, so the loss is 0
        // even though s - s + Δ = 1 > 0.
        let w = m(vec![vec![3.0], vec![-2.0]]);
        let x = m(vec![vec![1.0, 1.0], vec![0.5, 4.0]]);
        let y = [0, 0];
        assert_eq!(svm_loss_naive(&w, &x, &y, 0.0).unwrap().loss, 0.0);
        assert_eq!(svm_loss_vectorized(&w, &x, &y, 0.0).unwrap().loss, 0.0);
    }

    #[test]
    fn regularization_is_unhalved() {
        let w = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let x = m(vec![vec![0.0, 0.0]]);
        let y = [0];
        // scores are all zero: one violation of exactly Δ.
        let out = svm_loss_naive(&w, &x, &y, 0.5).unwrap();
        assert_relative_eq!(out.loss, 1.0 + 0.5 * 30.0);
        assert_eq!(out.grad, w.map(|v| 0.5 * v));
    }

    #[test]
    fn empty_batch_is_rejected() {
        let w = Matrix::zeros(3, 2);
        let x = Matrix::zeros(0, 3);
        assert!(matches!(svm_loss_naive(&w, &x, &[], 0.0), Err(SvmError::EmptyBatch)));
        assert!(matches!(svm_loss_vectorized(&w, &x, &[], 0.0), Err(SvmError::EmptyBatch)));
    }

    #[test]
    fn feature_dimension_mismatch_is_rejected() {
        let w = Matrix::zeros(3, 2);
        let x = Matrix::zeros(2, 4);
        let err = svm_loss_vectorized(&w, &x, &[0, 1], 0.0).unwrap_err();
        assert!(matches!(err, SvmError::DimensionMismatch { expected: 3, found: 4, .. }));
    }

    #[test]
    fn label_count_mismatch_is_rejected() {
        let w = Matrix::zeros(3, 2);
        let x = Matrix::zeros(2, 3);
        let err = svm_loss_naive(&w, &x, &[0], 0.0).unwrap_err();
        assert!(matches!(err, SvmError::DimensionMismatch { expected: 2, found: 1, .. }));
    }

    #[test]
    fn out_of_range_label_is_rejected() {
        let w = Matrix::zeros(3, 2);
        let x = Matrix::zeros(2, 3);
        let err = svm_loss_naive(&w, &x, &[1, 2], 0.0).unwrap_err();
        assert!(matches!(err, SvmError::LabelOutOfRange { index: 1, label: 2, num_classes: 2 }));
    }

    #[test]
    fn negative_or_nan_regularization_is_rejected() {
        let w = Matrix::zeros(1, 2);
        let x = Matrix::zeros(1, 1);
        assert!(matches!(
            svm_loss_naive(&w, &x, &[0], -1.0),
            Err(SvmError::InvalidRegularization(_))
        ));
        assert!(matches!(
            svm_loss_vectorized(&w, &x, &[0], f64::NAN),
            Err(SvmError::InvalidRegularization(_))
        ));
    }

    #[test]
    fn short_weight_buffer_is_rejected() {
        let w = Matrix { rows: 2, cols: 2, data: vec![1.0, 0.0] };
        let x = m(vec![vec![1.0, 0.0]]);
        for res in [svm_loss_naive(&w, &x, &[0], 0.0), svm_loss_vectorized(&w, &x, &[0], 0.0)] {
            assert!(matches!(res, Err(SvmError::DimensionMismatch { expected: 4, found: 2, .. })));
        }
    }

    #[test]
    fn short_feature_buffer_is_rejected() {
        let w = m(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let x = Matrix { rows: 2, cols: 2, data: vec![1.0, 0.0, 0.0] };
        for res in [svm_loss_naive(&w, &x, &[0, 1], 0.0), svm_loss_vectorized(&w, &x, &[0, 1], 0.0)] {
            assert!(matches!(res, Err(SvmError::DimensionMismatch { expected: 4, found: 3, .. })));
        }
    }

    #[test]
    fn nan_feature_is_rejected() {
        let w = m(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let x = m(vec![vec![f64::NAN, 0.0], vec![0.0, 0.0]]);
        for res in [svm_loss_naive(&w, &x, &[0, 1], 0.0), svm_loss_vectorized(&w, &x, &[0, 1], 0.0)] {
            assert!(matches!(res, Err(SvmError::NonFinite { matrix: "X", row: 0, col: 0 })));
        }
    }

    #[test]
    fn infinite_weight_is_rejected() {
        let w = m(vec![vec![1.0, 0.0], vec![f64::INFINITY, 0.0], vec![0.0, 3.0]]);
        let x = m(vec![vec![1.0, 0.0, 1.0]]);
        for res in [svm_loss_naive(&w, &x, &[0], 0.0), svm_loss_vectorized(&w, &x, &[0], 0.0)] {
            assert!(matches!(res, Err(SvmError::NonFinite { matrix: "W", row: 1, col: 0 })));
        }
    }

    #[test]
    fn zero_classes_is_rejected() {
        let w = Matrix::zeros(2, 0);
        let x = Matrix::zeros(1, 2);
        assert!(matches!(
            svm_loss_naive(&w, &x, &[0], 0.0),
            Err(SvmError::DimensionMismatch { found: 0, .. })
        ));
    }
}
