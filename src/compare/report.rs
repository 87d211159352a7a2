use std::fmt;

use serde::{Serialize, Deserialize};

/// Absolute slack added to every relative comparison so values that cancel
/// to (almost) zero still compare equal.
pub const ABS_TOLERANCE: f64 = 1e-12;

/// Result of running both loss realizations on the same inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub naive_loss: f64,
    pub vectorized_loss: f64,
    /// |naive_loss − vectorized_loss|
    pub loss_difference: f64,
    /// Frobenius norm of dW_naive − dW_vectorized.
    pub grad_difference: f64,
    /// Largest elementwise |dW_naive − dW_vectorized|.
    pub grad_max_abs_difference: f64,
    /// Largest |dW_naive| entry, the scale the gradient difference is judged against.
    pub grad_scale: f64,
    pub naive_elapsed_us: u64,
    pub vectorized_elapsed_us: u64,
}

impl ComparisonReport {
    /// True when both the loss and the gradient agree within `rtol`
    /// relative to their magnitudes.
    pub fn is_equivalent(&self, rtol: f64) -> bool {
        let loss_scale = self.naive_loss.abs().max(self.vectorized_loss.abs());
        self.loss_difference <= ABS_TOLERANCE + rtol * loss_scale
            && self.grad_max_abs_difference <= ABS_TOLERANCE + rtol * self.grad_scale
    }

    /// How many times faster the vectorized form ran. `None` if it finished
    /// below timer resolution.
    pub fn speedup(&self) -> Option<f64> {
        (self.vectorized_elapsed_us > 0)
            .then(|| self.naive_elapsed_us as f64 / self.vectorized_elapsed_us as f64)
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Naive loss:      {:e} computed in {:.6}s", self.naive_loss, self.naive_elapsed_us as f64 / 1e6)?;
        writeln!(f, "Vectorized loss: {:e} computed in {:.6}s", self.vectorized_loss, self.vectorized_elapsed_us as f64 / 1e6)?;
        writeln!(f, "Loss difference: {:e}", self.loss_difference)?;
        write!(f, "Gradient difference (Frobenius): {:e}", self.grad_difference)?;
        if let Some(s) = self.speedup() {
            write!(f, "\nSpeedup: {:.1}x", s)?;
        }
        Ok(())
    }
}
