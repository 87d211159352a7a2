use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

use crate::error::{Result, SvmError};

/// Dense row-major matrix backed by one contiguous buffer.
///
/// Entry (i, j) lives at `data[i * cols + j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from a vector of rows. Every row must have the same
    /// length as the first one.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map(|r| r.len()).unwrap_or(0);
        let mut flat = Vec::with_capacity(rows * cols);
        for (i, row) in data.into_iter().enumerate() {
            if row.len() != cols {
                return Err(SvmError::RaggedRows { row: i, expected: cols, found: row.len() });
            }
            flat.extend(row);
        }
        Ok(Matrix { rows, cols, data: flat })
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        if data.len() != rows * cols {
            return Err(SvmError::DimensionMismatch {
                context: "matrix buffer length",
                expected: rows * cols,
                found: data.len(),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Samples from N(0, scale²).
    pub fn random_normal<R: Rng + ?Sized>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Matrix {
        let data = (0..rows * cols)
            .map(|_| sample_standard_normal(&mut *rng) * scale)
            .collect();
        Matrix { rows, cols, data }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.cols + j] = value;
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let cols = self.cols;
        &mut self.data[i * cols..(i + 1) * cols]
    }

    /// Fails if `data` does not hold exactly `rows * cols` entries, which
    /// can happen when the public fields are set by hand.
    pub fn check_buffer(&self) -> Result<()> {
        if self.data.len() != self.rows * self.cols {
            return Err(SvmError::DimensionMismatch {
                context: "matrix buffer length",
                expected: self.rows * self.cols,
                found: self.data.len(),
            });
        }
        Ok(())
    }

    /// Position of the first NaN or infinite entry, if any.
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        let cols = self.cols.max(1);
        self.data
            .iter()
            .position(|v| !v.is_finite())
            .map(|idx| (idx / cols, idx % cols))
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    /// Matrix product `self · rhs`.
    ///
    /// Uses i-k-j order so the inner loop walks a row of `rhs` and a row of
    /// the output, both contiguous.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(SvmError::DimensionMismatch {
                context: "matmul inner dimension",
                expected: self.cols,
                found: rhs.rows,
            });
        }
        let mut res = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            let out = &mut res.data[i * rhs.cols..(i + 1) * rhs.cols];
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                let b = &rhs.data[k * rhs.cols..(k + 1) * rhs.cols];
                for (o, &bv) in out.iter_mut().zip(b) {
                    *o += a * bv;
                }
            }
        }
        Ok(res)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "elementwise sub", |a, b| a - b)
    }

    /// `self += alpha * rhs`, in place.
    pub fn scaled_add_assign(&mut self, alpha: f64, rhs: &Matrix) -> Result<()> {
        self.check_same_shape(rhs, "scaled add")?;
        for (a, &b) in self.data.iter_mut().zip(&rhs.data) {
            *a += alpha * b;
        }
        Ok(())
    }

    pub fn scale(&mut self, factor: f64) {
        self.data.iter_mut().for_each(|x| *x *= factor);
    }

    /// Sum of squared entries, i.e. `sum(W ⊙ W)`.
    pub fn sum_squares(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum()
    }

    pub fn frobenius_norm(&self) -> f64 {
        self.sum_squares().sqrt()
    }

    pub fn max_abs_diff(&self, rhs: &Matrix) -> Result<f64> {
        self.check_same_shape(rhs, "max abs diff")?;
        Ok(self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max))
    }

    /// Appends a constant-1 column, so a bias row in W folds into `X · W`.
    pub fn append_ones_column(&self) -> Matrix {
        let cols = self.cols + 1;
        let mut data = Vec::with_capacity(self.rows * cols);
        for i in 0..self.rows {
            data.extend_from_slice(self.row(i));
            data.push(1.0);
        }
        Matrix { rows: self.rows, cols, data }
    }

    fn zip_with<F>(&self, rhs: &Matrix, context: &'static str, op: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.check_same_shape(rhs, context)?;
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&rhs.data).map(|(&a, &b)| op(a, b)).collect(),
        })
    }

    fn check_same_shape(&self, rhs: &Matrix, context: &'static str) -> Result<()> {
        if self.rows != rhs.rows {
            return Err(SvmError::DimensionMismatch { context, expected: self.rows, found: rhs.rows });
        }
        if self.cols != rhs.cols {
            return Err(SvmError::DimensionMismatch { context, expected: self.cols, found: rhs.cols });
        }
        Ok(())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Shift to (0, 1] to avoid log(0).
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
