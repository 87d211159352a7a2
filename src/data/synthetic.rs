use rand::Rng;

use crate::config::ExperimentConfig;
use crate::error::Result;
use crate::math::matrix::Matrix;

/// A randomly drawn minibatch: features X of shape (N, D) and N labels.
#[derive(Debug, Clone)]
pub struct SyntheticBatch {
    pub x: Matrix,
    pub y: Vec<usize>,
}

impl SyntheticBatch {
    /// Draws X from N(0, 1) and labels uniformly from [0, C).
    /// With `bias_trick` a constant-1 column is appended to X.
    pub fn generate<R: Rng + ?Sized>(config: &ExperimentConfig, rng: &mut R) -> Result<SyntheticBatch> {
        config.validate()?;
        let mut x = Matrix::random_normal(config.num_examples, config.feature_dim, 1.0, rng);
        if config.bias_trick {
            x = x.append_ones_column();
        }
        let y = (0..config.num_examples)
            .map(|_| rng.gen_range(0..config.num_classes))
            .collect();
        Ok(SyntheticBatch { x, y })
    }
}

/// Small random weights of shape (`weight_rows`, C), scaled by `weight_scale`.
pub fn init_weights<R: Rng + ?Sized>(config: &ExperimentConfig, rng: &mut R) -> Matrix {
    Matrix::random_normal(config.weight_rows(), config.num_classes, config.weight_scale, rng)
}
