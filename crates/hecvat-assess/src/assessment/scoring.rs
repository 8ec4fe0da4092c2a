use super::domain::{AnswerKind, Answers};
use super::tally::CategoryTallies;
use super::weights::WeightTable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub raw_yes: usize,
    pub raw_assessed: usize,
    pub raw_pct: f64,
    pub weighted_score: f64,
    pub weighted_num: f64,
    pub weighted_den: f64,
}

/// Raw and category-weighted compliance. Categories without a Yes/No answer
/// are skipped; categories missing from `weights` count toward the raw score
/// only.
pub fn compute_scores(tallies: &CategoryTallies, weights: &WeightTable) -> ScoreResult {
    let mut raw_yes = 0;
    let mut raw_assessed = 0;
    let mut weighted_num = 0.0;
    let mut weighted_den = 0.0;

    for (category, tally) in tallies {
        let assessed = tally.assessed();
        if assessed == 0 {
            continue;
        }
        raw_yes += tally.yes;
        raw_assessed += assessed;

        let weight = f64::from(weights.weight(category));
        if weight > 0.0 {
            weighted_num += tally.yes as f64 / assessed as f64 * weight;
            weighted_den += weight;
        }
    }

    ScoreResult {
        raw_yes,
        raw_assessed,
        raw_pct: round_to(percentage(raw_yes as f64, raw_assessed as f64), 1),
        weighted_score: round_to(percentage(weighted_num, weighted_den), 1),
        weighted_num: round_to(weighted_num, 2),
        weighted_den: round_to(weighted_den, 2),
    }
}

/// Compliance discounted by evidence strength.
///
/// Returns `None` when nothing was answered Yes/No, or when no Yes/No answer
/// carries an `evidence_quality`. Qualities on N/A or attestation answers are
/// ignored. A Yes without a quality keeps full credit.
pub fn confidence_adjusted_score(answers: &Answers) -> Option<f64> {
    let mut has_quality = false;
    let mut assessed = 0usize;
    let mut credit = 0.0;
    for (_, record) in answers.iter() {
        let kind = record.kind();
        if !kind.is_assessed() {
            continue;
        }
        assessed += 1;
        has_quality |= record.evidence_quality.is_some();
        if kind == AnswerKind::Yes {
            credit += record
                .evidence_quality
                .as_ref()
                .map(|quality| quality.confidence())
                .unwrap_or(1.0);
        }
    }

    if !has_quality || assessed == 0 {
        return None;
    }

    Some(round_to(credit / assessed as f64 * 100.0, 1))
}

/// `100 * numerator / denominator`, or 0 for an empty denominator.
pub(crate) fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// Rounds the exact binary value of `value` to `decimals` places, sending exact
/// ties to the even digit (`56.25 -> 56.2`, `0.45 -> 0.5`).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    // Error of the multiplication, exact thanks to the fused multiply-add.
    let residual = value.mul_add(factor, -scaled);

    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 {
        if residual > 0.0 {
            scaled.ceil()
        } else if residual < 0.0 {
            scaled.floor()
        } else {
            scaled.round_ties_even()
        }
    } else {
        scaled.round()
    };

    rounded / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::{AnswerRecord, EvidenceQuality};
    use crate::assessment::tally::{aggregate, CategoryTally};

    fn tally(yes: usize, no: usize) -> CategoryTally {
        CategoryTally {
            yes,
            no,
            ..CategoryTally::default()
        }
    }

    #[test]
    fn weighted_and_raw_scores_match_reference_example() {
        let tallies: CategoryTallies = [
            ("AAAI".to_string(), tally(2, 1)),
            ("APPL".to_string(), tally(1, 0)),
        ]
        .into_iter()
        .collect();
        let weights = WeightTable::from_weights([("AAAI", 10), ("APPL", 9)]).unwrap();

        let scores = compute_scores(&tallies, &weights);
        assert_eq!(scores.raw_yes, 3);
        assert_eq!(scores.raw_assessed, 4);
        assert_eq!(scores.raw_pct, 75.0);
        assert_eq!(scores.weighted_score, 82.5);
        assert_eq!(scores.weighted_num, 15.67);
        assert_eq!(scores.weighted_den, 19.0);
    }

    #[test]
    fn empty_tallies_score_zero_without_panicking() {
        let weights = WeightTable::from_weights([("AAAI", 10)]).unwrap();
        let scores = compute_scores(&CategoryTallies::new(), &weights);
        assert_eq!(scores, ScoreResult::default());
    }

    #[test]
    fn unweighted_categories_count_toward_raw_only() {
        let tallies: CategoryTallies = [
            ("AAAI".to_string(), tally(1, 1)),
            ("GNRL".to_string(), tally(3, 0)),
            ("ZZZZ".to_string(), tally(0, 2)),
        ]
        .into_iter()
        .collect();
        let weights = WeightTable::from_weights([("AAAI", 10), ("GNRL", 0)]).unwrap();

        let scores = compute_scores(&tallies, &weights);
        assert_eq!(scores.raw_yes, 4);
        assert_eq!(scores.raw_assessed, 7);
        assert_eq!(scores.raw_pct, 57.1);
        assert_eq!(scores.weighted_score, 50.0);
        assert_eq!(scores.weighted_den, 10.0);
    }

    #[test]
    fn categories_without_yes_or_no_are_skipped() {
        let mut na_only = tally(0, 0);
        na_only.na = 4;
        let tallies: CategoryTallies = [("AAAI".to_string(), na_only)].into_iter().collect();
        let weights = WeightTable::from_weights([("AAAI", 10)]).unwrap();

        let scores = compute_scores(&tallies, &weights);
        assert_eq!(scores.weighted_den, 0.0);
        assert_eq!(scores.weighted_score, 0.0);
    }

    #[test]
    fn scoring_is_repeatable() {
        let answers: Answers = [
            ("AAAI-01", AnswerRecord::new("Yes")),
            ("AAAI-02", AnswerRecord::new("No")),
            ("VULN-01", AnswerRecord::new("Yes")),
        ]
        .into_iter()
        .collect();
        let weights = WeightTable::from_weights([("AAAI", 10), ("VULN", 8)]).unwrap();

        let first = compute_scores(&aggregate(&answers), &weights);
        let second = compute_scores(&aggregate(&answers), &weights);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn confidence_discounts_by_evidence_strength() {
        let answers: Answers = [
            (
                "AAAI-01",
                AnswerRecord::new("Yes").with_evidence_quality(EvidenceQuality::Strong),
            ),
            (
                "AAAI-02",
                AnswerRecord::new("Yes").with_evidence_quality(EvidenceQuality::Moderate),
            ),
            (
                "AAAI-03",
                AnswerRecord::new("Yes").with_evidence_quality(EvidenceQuality::Weak),
            ),
            (
                "AAAI-04",
                AnswerRecord::new("No").with_evidence_quality(EvidenceQuality::Strong),
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(confidence_adjusted_score(&answers), Some(56.2));
    }

    #[test]
    fn confidence_requires_some_evidence_quality() {
        let answers: Answers = [("AAAI-01", AnswerRecord::new("Yes"))].into_iter().collect();
        assert_eq!(confidence_adjusted_score(&answers), None);
        assert_eq!(confidence_adjusted_score(&Answers::new()), None);
    }

    #[test]
    fn confidence_ignores_quality_on_unassessed_answers() {
        let answers: Answers = [
            ("AAAI-01", AnswerRecord::new("Yes")),
            (
                "GNRL-01",
                AnswerRecord::new("N/A").with_evidence_quality(EvidenceQuality::Inferred),
            ),
        ]
        .into_iter()
        .collect();
        assert_eq!(confidence_adjusted_score(&answers), None);

        let unassessed: Answers = [(
            "GNRL-01",
            AnswerRecord::new("Vendor").with_evidence_quality(EvidenceQuality::Strong),
        )]
        .into_iter()
        .collect();
        assert_eq!(confidence_adjusted_score(&unassessed), None);
    }

    #[test]
    fn quality_on_a_no_answer_enables_the_score() {
        let answers: Answers = [
            ("AAAI-01", AnswerRecord::new("Yes")),
            (
                "AAAI-02",
                AnswerRecord::new("No").with_evidence_quality(EvidenceQuality::Weak),
            ),
        ]
        .into_iter()
        .collect();
        assert_eq!(confidence_adjusted_score(&answers), Some(50.0));
    }

    #[test]
    fn unknown_quality_and_missing_quality_credit() {
        let answers: Answers = [
            (
                "APPL-01",
                AnswerRecord::new("Yes")
                    .with_evidence_quality(EvidenceQuality::Other("Hearsay".to_string())),
            ),
            ("APPL-02", AnswerRecord::new("Yes")),
            (
                "APPL-03",
                AnswerRecord::new("Yes").with_evidence_quality(EvidenceQuality::Inferred),
            ),
            ("APPL-04", AnswerRecord::new("No")),
        ]
        .into_iter()
        .collect();

        // (0.5 + 1.0 + 0.25 + 0) / 4
        assert_eq!(confidence_adjusted_score(&answers), Some(43.8));
    }

    #[test]
    fn rounding_uses_exact_value_and_even_ties() {
        assert_eq!(round_to(56.25, 1), 56.2);
        assert_eq!(round_to(56.35, 1), 56.4);
        assert_eq!(round_to(0.45, 1), 0.5);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(100.0 / 3.0, 1), 33.3);
        assert_eq!(round_to(200.0 / 3.0, 1), 66.7);
        assert_eq!(round_to(-33.35, 1), -33.4);
        assert_eq!(round_to(0.0, 1), 0.0);
    }

    #[test]
    fn percentage_of_empty_denominator_is_zero() {
        assert_eq!(percentage(5.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 4.0), 25.0);
    }
}
