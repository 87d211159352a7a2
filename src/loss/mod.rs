pub mod svm;
pub mod loss_type;

pub use svm::{svm_loss_naive, svm_loss_vectorized, LossGradient, DELTA};
pub use loss_type::SvmVariant;
