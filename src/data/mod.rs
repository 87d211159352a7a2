pub mod synthetic;

pub use synthetic::{init_weights, SyntheticBatch};
