use hecvat_assess::assessment::{
    aggregate, compute_scores, confidence_adjusted_score, AssessmentSnapshot, AssessmentSummary,
    DeltaReport, FixType, WeightTable,
};
use std::path::PathBuf;

fn bundled_weights() -> WeightTable {
    let path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../references/scoring-weights.yaml");
    WeightTable::from_path(path).expect("bundled weights load")
}

const BASELINE: &str = r#"{
  "repository": "example/portal",
  "assessment_date": "2025-01-15",
  "hecvat_version": "4.1.4",
  "branch": "main",
  "answers": {
    "GNRL-01": {"answer": "Example University Vendor"},
    "AAAI-01": {"answer": "Yes", "evidence": "src/auth/sso.rs", "evidence_quality": "Strong"},
    "AAAI-02": {"answer": "No", "fix_type": "code", "evidence_quality": "Moderate"},
    "APPL-01": {"answer": "Yes", "evidence_quality": "Weak"},
    "APPL-02": {"answer": "N/A"},
    "VULN-01": {"answer": "No", "fix_type": "config"},
    "VULN-02": {"answer": ""}
  }
}"#;

const FOLLOW_UP: &str = r#"{
  "repository": "example/portal",
  "assessment_date": "2025-03-01",
  "branch": "hardening",
  "answers": {
    "GNRL-01": {"answer": "Example University Vendor"},
    "AAAI-01": {"answer": "Yes", "evidence_quality": "Strong"},
    "AAAI-02": {"answer": "Yes", "additional_info": "MFA enforced for admin accounts", "evidence_quality": "Strong"},
    "APPL-01": {"answer": "No", "fix_type": "code"},
    "APPL-02": {"answer": "N/A"},
    "VULN-01": {"answer": "No", "fix_type": "config"},
    "VULN-02": {"answer": "Yes"}
  }
}"#;

fn snapshot(json: &str) -> AssessmentSnapshot {
    AssessmentSnapshot::from_reader(json.as_bytes()).expect("valid assessment")
}

#[test]
fn baseline_scores_against_bundled_weights() {
    let baseline = snapshot(BASELINE);
    let weights = bundled_weights();

    let scores = compute_scores(&aggregate(&baseline.answers), &weights);
    assert_eq!(scores.raw_yes, 2);
    assert_eq!(scores.raw_assessed, 4);
    assert_eq!(scores.raw_pct, 50.0);
    // AAAI 0.5 * 10 + APPL 1.0 * 9 + VULN 0.0 * 8 over 27
    assert_eq!(scores.weighted_num, 14.0);
    assert_eq!(scores.weighted_den, 27.0);
    assert_eq!(scores.weighted_score, 51.9);

    // (1.0 + 0.5) / 4
    assert_eq!(confidence_adjusted_score(&baseline.answers), Some(37.5));
}

#[test]
fn summary_compares_follow_up_with_baseline() {
    let baseline = snapshot(BASELINE);
    let follow_up = snapshot(FOLLOW_UP);

    let summary = AssessmentSummary::build(&follow_up, &bundled_weights(), Some(&baseline));

    assert_eq!(summary.metadata.branch, "hardening");
    assert_eq!(summary.metadata.hecvat_version, "4.1.4");
    assert_eq!(summary.org_attestation_count, 1);

    let comparison = summary.comparison.as_ref().expect("comparison present");
    assert_eq!(comparison.before.raw_pct, 50.0);
    assert_eq!(comparison.after.raw_pct, 60.0);
    assert_eq!(comparison.raw_pct_delta, 10.0);

    let codes: Vec<&str> = summary.categories.iter().map(|row| row.category.as_str()).collect();
    assert_eq!(codes, vec!["AAAI", "APPL", "VULN"]);

    let fix_types: Vec<FixType> = summary.fix_types.iter().map(|row| row.fix_type).collect();
    assert_eq!(fix_types, vec![FixType::Code, FixType::Config]);
    assert_eq!(summary.patchable_total, 2);

    let priorities: Vec<&str> = summary.priorities.iter().map(|row| row.category.as_str()).collect();
    assert_eq!(priorities, vec!["APPL", "VULN"]);
    assert_eq!(summary.priorities[0].impact, 9.0);
    assert_eq!(summary.priorities[1].impact, 4.0);

    let encoded = serde_json::to_value(&summary).expect("summary serializes");
    assert_eq!(encoded["fix_types"][0]["fix_type"], "code");
}

#[test]
fn delta_report_tracks_each_kind_of_change() {
    let report = DeltaReport::build(&snapshot(BASELINE), &snapshot(FOLLOW_UP));

    assert_eq!(report.before.assessment_date, "2025-01-15");
    assert_eq!(report.after.branch, "hardening");

    assert_eq!(report.improved.len(), 1);
    assert_eq!(report.improved[0].id, "AAAI-02");
    assert_eq!(report.improved[0].detail, "MFA enforced for admin accounts");
    assert_eq!(report.regressed[0].id, "APPL-01");
    assert_eq!(report.newly_assessed.len(), 1);
    assert_eq!(report.newly_assessed[0].id, "VULN-02");
    assert_eq!(report.unchanged_yes, 1);
    assert_eq!(report.unchanged_no, 1);

    let deltas: Vec<(&str, f64)> = report
        .category_deltas
        .iter()
        .map(|row| (row.category.as_str(), row.delta))
        .collect();
    assert_eq!(
        deltas,
        vec![("AAAI", 50.0), ("APPL", -100.0), ("VULN", 50.0)]
    );
}
