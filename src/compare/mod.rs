pub mod report;
pub mod run;

pub use report::ComparisonReport;
pub use run::{compare, outputs_match};
