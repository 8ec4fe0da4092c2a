mod changes;
mod summary;
pub mod views;

pub use views::{AssessmentSummary, DeltaReport};
