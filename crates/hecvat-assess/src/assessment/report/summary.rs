use super::super::domain::{AssessmentSnapshot, FixType};
use super::super::scoring::{compute_scores, confidence_adjusted_score, percentage, round_to};
use super::super::tally::{aggregate, CategoryTallies};
use super::super::weights::WeightTable;
use super::views::{
    AssessmentSummary, CategoryRow, FixTypeRow, PriorityRow, ScoreComparison, SnapshotMetadata,
};
use crate::catalog::HECVAT_VERSION;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

const UNKNOWN: &str = "unknown";
const GAP_PREVIEW: usize = 3;
const MAX_PRIORITIES: usize = 10;

impl AssessmentSummary {
    /// Summarizes `snapshot`; `compare` is an earlier run to measure against.
    pub fn build(
        snapshot: &AssessmentSnapshot,
        weights: &WeightTable,
        compare: Option<&AssessmentSnapshot>,
    ) -> Self {
        Self::build_at(snapshot, weights, compare, Utc::now())
    }

    pub fn build_at(
        snapshot: &AssessmentSnapshot,
        weights: &WeightTable,
        compare: Option<&AssessmentSnapshot>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let tallies = aggregate(&snapshot.answers);
        let scores = compute_scores(&tallies, weights);

        let comparison = compare.map(|earlier| {
            let before = compute_scores(&aggregate(&earlier.answers), weights);
            ScoreComparison {
                before,
                after: scores,
                raw_pct_delta: round_to(scores.raw_pct - before.raw_pct, 1),
                weighted_delta: round_to(scores.weighted_score - before.weighted_score, 1),
            }
        });

        let (fix_types, patchable_total) = fix_type_rows(&tallies);
        debug!(
            answers = snapshot.answers.len(),
            categories = tallies.len(),
            raw_pct = scores.raw_pct,
            weighted_score = scores.weighted_score,
            "assessment summary built"
        );

        Self {
            metadata: metadata(snapshot),
            scores,
            org_attestation_count: tallies.values().map(|tally| tally.blank).sum(),
            confidence_adjusted: confidence_adjusted_score(&snapshot.answers),
            comparison,
            categories: category_rows(&tallies, weights),
            fix_types,
            patchable_total,
            priorities: priority_rows(&tallies, weights),
            generated_at,
        }
    }
}

fn metadata(snapshot: &AssessmentSnapshot) -> SnapshotMetadata {
    let or_unknown = |value: &Option<String>| value.clone().unwrap_or_else(|| UNKNOWN.to_string());
    SnapshotMetadata {
        repository: or_unknown(&snapshot.repository),
        assessment_date: or_unknown(&snapshot.assessment_date),
        hecvat_version: snapshot
            .hecvat_version
            .clone()
            .unwrap_or_else(|| HECVAT_VERSION.to_string()),
        branch: or_unknown(&snapshot.branch),
    }
}

/// Weighted categories with at least one Yes/No, heaviest first.
fn category_rows(tallies: &CategoryTallies, weights: &WeightTable) -> Vec<CategoryRow> {
    let mut rows: Vec<CategoryRow> = tallies
        .iter()
        .filter_map(|(category, tally)| {
            let weight = weights.weight(category);
            let assessed = tally.assessed();
            if weight == 0 || assessed == 0 {
                return None;
            }
            let pct = round_to(percentage(tally.yes as f64, assessed as f64), 1);
            Some(CategoryRow {
                category: category.clone(),
                name: weights.name(category).to_string(),
                weight,
                yes: tally.yes,
                no: tally.no,
                na: tally.na,
                pct,
                weighted_contribution: round_to(pct / 100.0 * f64::from(weight), 2),
                top_gaps: tally.gaps.iter().take(GAP_PREVIEW).cloned().collect(),
                hidden_gaps: tally.gaps.len().saturating_sub(GAP_PREVIEW),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.weight
            .cmp(&a.weight)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

fn fix_type_rows(tallies: &CategoryTallies) -> (Vec<FixTypeRow>, usize) {
    let mut totals: BTreeMap<FixType, usize> = BTreeMap::new();
    for tally in tallies.values() {
        for (fix_type, count) in &tally.fix_types {
            *totals.entry(*fix_type).or_insert(0) += count;
        }
    }

    let rows: Vec<FixTypeRow> = FixType::ordered()
        .into_iter()
        .filter_map(|fix_type| {
            totals.get(&fix_type).map(|count| FixTypeRow {
                fix_type,
                count: *count,
                description: fix_type.description(),
            })
        })
        .collect();

    let patchable = rows
        .iter()
        .filter(|row| row.fix_type.is_patchable())
        .map(|row| row.count)
        .sum();

    (rows, patchable)
}

/// Ranks categories by `weight * gaps / assessed`.
fn priority_rows(tallies: &CategoryTallies, weights: &WeightTable) -> Vec<PriorityRow> {
    let mut candidates: Vec<PriorityRow> = tallies
        .iter()
        .filter_map(|(category, tally)| {
            let weight = weights.weight(category);
            let assessed = tally.assessed();
            if weight == 0 || tally.no == 0 || assessed == 0 {
                return None;
            }
            Some(PriorityRow {
                rank: 0,
                category: category.clone(),
                name: weights.name(category).to_string(),
                gaps: tally.no,
                assessed,
                impact: round_to(f64::from(weight) * (tally.no as f64 / assessed as f64), 2),
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.impact
            .total_cmp(&a.impact)
            .then_with(|| b.category.cmp(&a.category))
    });
    candidates.truncate(MAX_PRIORITIES);
    for (index, row) in candidates.iter_mut().enumerate() {
        row.rank = index + 1;
    }
    candidates
}
