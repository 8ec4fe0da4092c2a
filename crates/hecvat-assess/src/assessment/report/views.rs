use super::super::delta::CategoryDelta;
use super::super::domain::FixType;
use super::super::scoring::ScoreResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotMetadata {
    pub repository: String,
    pub assessment_date: String,
    pub hecvat_version: String,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComparison {
    pub before: ScoreResult,
    pub after: ScoreResult,
    pub raw_pct_delta: f64,
    pub weighted_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub name: String,
    pub weight: u8,
    pub yes: usize,
    pub no: usize,
    pub na: usize,
    pub pct: f64,
    pub weighted_contribution: f64,
    pub top_gaps: Vec<String>,
    pub hidden_gaps: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixTypeRow {
    pub fix_type: FixType,
    pub count: usize,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityRow {
    pub rank: usize,
    pub category: String,
    pub name: String,
    pub gaps: usize,
    pub assessed: usize,
    pub impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentSummary {
    pub metadata: SnapshotMetadata,
    pub scores: ScoreResult,
    pub org_attestation_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_adjusted: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ScoreComparison>,
    pub categories: Vec<CategoryRow>,
    pub fix_types: Vec<FixTypeRow>,
    pub patchable_total: usize,
    pub priorities: Vec<PriorityRow>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeltaSide {
    pub assessment_date: String,
    pub branch: String,
}

/// An improved or regressed question with the later snapshot's note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRow {
    pub id: String,
    pub category: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewlyAssessedRow {
    pub id: String,
    pub answer: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaReport {
    pub before: DeltaSide,
    pub after: DeltaSide,
    pub improved: Vec<ChangeRow>,
    pub regressed: Vec<ChangeRow>,
    pub newly_assessed: Vec<NewlyAssessedRow>,
    pub unchanged_yes: usize,
    pub unchanged_no: usize,
    pub category_deltas: Vec<CategoryDelta>,
}
