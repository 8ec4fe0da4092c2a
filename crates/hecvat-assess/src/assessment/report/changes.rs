use super::super::delta::diff;
use super::super::domain::{category_of, AssessmentSnapshot};
use super::views::{ChangeRow, DeltaReport, DeltaSide, NewlyAssessedRow};
use tracing::debug;

const DETAIL_CHARS: usize = 80;

impl DeltaReport {
    pub fn build(before: &AssessmentSnapshot, after: &AssessmentSnapshot) -> Self {
        let delta = diff(&before.answers, &after.answers);
        debug!(
            improved = delta.improved.len(),
            regressed = delta.regressed.len(),
            newly_assessed = delta.newly_assessed.len(),
            "assessment delta computed"
        );

        let change_row = |id: String| {
            let detail = after
                .answers
                .get(&id)
                .and_then(|record| record.additional_info.as_deref())
                .map(|info| info.chars().take(DETAIL_CHARS).collect())
                .unwrap_or_default();
            ChangeRow {
                category: category_of(&id).to_string(),
                id,
                detail,
            }
        };

        Self {
            before: side(before),
            after: side(after),
            improved: delta.improved.into_iter().map(change_row).collect(),
            regressed: delta.regressed.into_iter().map(change_row).collect(),
            newly_assessed: delta
                .newly_assessed
                .into_iter()
                .map(|entry| NewlyAssessedRow {
                    category: category_of(&entry.id).to_string(),
                    id: entry.id,
                    answer: entry.answer,
                })
                .collect(),
            unchanged_yes: delta.unchanged_yes,
            unchanged_no: delta.unchanged_no,
            category_deltas: delta.category_deltas,
        }
    }
}

fn side(snapshot: &AssessmentSnapshot) -> DeltaSide {
    let or_placeholder = |value: &Option<String>| value.clone().unwrap_or_else(|| "?".to_string());
    DeltaSide {
        assessment_date: or_placeholder(&snapshot.assessment_date),
        branch: or_placeholder(&snapshot.branch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::{AnswerRecord, Answers};

    #[test]
    fn rows_carry_category_and_truncated_detail() {
        let long_note = "x".repeat(120);
        let before = AssessmentSnapshot {
            assessment_date: Some("2025-01-10".to_string()),
            branch: Some("main".to_string()),
            answers: [
                ("AAAI-01", AnswerRecord::new("No")),
                ("APPL-02", AnswerRecord::new("Yes")),
            ]
            .into_iter()
            .collect::<Answers>(),
            ..AssessmentSnapshot::default()
        };
        let after = AssessmentSnapshot::from_answers(
            [
                (
                    "AAAI-01",
                    AnswerRecord::new("Yes").with_additional_info(long_note.as_str()),
                ),
                ("APPL-02", AnswerRecord::new("No")),
                ("DATA-03", AnswerRecord::new("No")),
            ]
            .into_iter()
            .collect(),
        );

        let report = DeltaReport::build(&before, &after);

        assert_eq!(report.before.assessment_date, "2025-01-10");
        assert_eq!(report.after.branch, "?");

        assert_eq!(report.improved.len(), 1);
        assert_eq!(report.improved[0].category, "AAAI");
        assert_eq!(report.improved[0].detail.chars().count(), 80);

        assert_eq!(report.regressed[0].id, "APPL-02");
        assert_eq!(report.regressed[0].detail, "");

        assert_eq!(
            report.newly_assessed,
            vec![NewlyAssessedRow {
                id: "DATA-03".to_string(),
                answer: "No".to_string(),
                category: "DATA".to_string(),
            }]
        );
        assert_eq!(report.category_deltas.len(), 2);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let note = "é".repeat(90);
        let before = AssessmentSnapshot::from_answers(
            [("AAAI-01", AnswerRecord::new("No"))].into_iter().collect(),
        );
        let after = AssessmentSnapshot::from_answers(
            [(
                "AAAI-01",
                AnswerRecord::new("Yes").with_additional_info(note),
            )]
            .into_iter()
            .collect(),
        );

        let report = DeltaReport::build(&before, &after);
        assert_eq!(report.improved[0].detail, "é".repeat(80));
    }
}
