//! Scoring and change tracking for answered HECVAT assessments.
//!
//! Answers are folded into per-category tallies, scored against the
//! category weight table, and compared across snapshots.

pub mod delta;
pub mod domain;
pub mod report;
pub mod scoring;
pub mod tally;
pub mod weights;

pub use delta::{diff, CategoryDelta, DeltaResult, NewlyAssessed, Transition};
pub use domain::{
    category_of, AnswerKind, AnswerRecord, Answers, AssessmentSnapshot, EvidenceQuality, FixType,
    SnapshotError,
};
pub use report::{AssessmentSummary, DeltaReport};
pub use scoring::{compute_scores, confidence_adjusted_score, round_to, ScoreResult};
pub use tally::{aggregate, CategoryTallies, CategoryTally};
pub use weights::{CategoryWeight, WeightTable, WeightsError};
