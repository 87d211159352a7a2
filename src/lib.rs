pub mod error;
pub mod math;
pub mod loss;
pub mod gradcheck;
pub mod compare;
pub mod config;
pub mod data;

// Convenience re-exports
pub use error::{Result, SvmError};
pub use math::matrix::Matrix;
pub use loss::svm::{svm_loss_naive, svm_loss_vectorized, LossGradient};
pub use loss::loss_type::SvmVariant;
pub use gradcheck::{grad_check_sparse, relative_error, GradCheckSample};
pub use compare::{compare, ComparisonReport};
pub use config::ExperimentConfig;
pub use data::{init_weights, SyntheticBatch};
