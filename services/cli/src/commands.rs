use crate::cli::{CatalogArgs, ClassifyArgs, DeltaArgs, SummaryArgs};
use hecvat_assess::assessment::{AssessmentSnapshot, AssessmentSummary, DeltaReport, WeightTable};
use hecvat_assess::catalog::{CatalogImporter, QuestionId};
use hecvat_assess::config::AppConfig;
use hecvat_assess::error::AppError;
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let catalog = CatalogImporter::from_path(&args.questions_csv)?;
    catalog.write_json(&args.output_json)?;

    info!(
        source = %args.questions_csv.display(),
        questions = catalog.total_questions,
        "question catalog written"
    );
    println!(
        "Parsed {} questions ({} repo-assessable, {} org attestation) across {} categories",
        catalog.total_questions,
        catalog.repo_assessable_count,
        catalog.org_attestation_count,
        catalog.categories.len()
    );
    println!("Catalog written to: {}", args.output_json.display());
    Ok(())
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    for raw in &args.ids {
        let id = QuestionId::parse(raw)?;
        let classification = id.classification();
        let scope = if classification.repo_assessable {
            "repo-assessable"
        } else {
            "org attestation"
        };
        println!("{id}\t{}\t{scope}", classification.category);
    }
    Ok(())
}

pub(crate) fn run_summary(config: &AppConfig, args: SummaryArgs) -> Result<(), AppError> {
    let weights_path = args
        .weights
        .unwrap_or_else(|| config.scoring.weights_path.clone());
    let weights = WeightTable::from_path(&weights_path)?;
    let snapshot = AssessmentSnapshot::from_path(&args.assessment_json)?;
    let earlier = args
        .compare
        .as_deref()
        .map(AssessmentSnapshot::from_path)
        .transpose()?;

    let summary = AssessmentSummary::build(&snapshot, &weights, earlier.as_ref());

    if let Some(output) = args.output.as_deref() {
        write_json(&summary, output)?;
        println!("Summary written to: {}", output.display());
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    } else {
        println!("{}", render_summary(&summary));
    }

    println!(
        "\nScore: {}/{} ({:.1}%) raw, {:.1}/100 weighted",
        summary.scores.raw_yes,
        summary.scores.raw_assessed,
        summary.scores.raw_pct,
        summary.scores.weighted_score
    );
    Ok(())
}

pub(crate) fn run_delta(args: DeltaArgs) -> Result<(), AppError> {
    let before = AssessmentSnapshot::from_path(&args.before_json)?;
    let after = AssessmentSnapshot::from_path(&args.after_json)?;
    let report = DeltaReport::build(&before, &after);

    if let Some(output) = args.output.as_deref() {
        write_json(&report, output)?;
        println!("Delta report: {}", output.display());
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_delta(&report));
    }
    Ok(())
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

pub(crate) fn render_summary(summary: &AssessmentSummary) -> String {
    let meta = &summary.metadata;
    let scores = &summary.scores;
    let mut lines = vec![
        "HECVAT assessment summary".to_string(),
        format!("Repository: {}", meta.repository),
        format!(
            "Date: {} | HECVAT v{} | Branch: {}",
            meta.assessment_date, meta.hecvat_version, meta.branch
        ),
        String::new(),
        format!(
            "Raw compliance: {}/{} ({:.1}%)",
            scores.raw_yes, scores.raw_assessed, scores.raw_pct
        ),
        format!("Weighted score: {:.1} / 100", scores.weighted_score),
        format!(
            "Org attestation (not code-assessable): {} questions",
            summary.org_attestation_count
        ),
    ];

    if let Some(confidence) = summary.confidence_adjusted {
        lines.push(format!("Confidence-adjusted score: {confidence:.1} / 100"));
    }

    if let Some(comparison) = &summary.comparison {
        lines.push(String::new());
        lines.push("Comparison with earlier assessment:".to_string());
        lines.push(format!(
            "- Raw: {}/{} ({:.1}%) -> {}/{} ({:.1}%) | {:+.1}%",
            comparison.before.raw_yes,
            comparison.before.raw_assessed,
            comparison.before.raw_pct,
            comparison.after.raw_yes,
            comparison.after.raw_assessed,
            comparison.after.raw_pct,
            comparison.raw_pct_delta
        ));
        lines.push(format!(
            "- Weighted: {:.1} -> {:.1} | {:+.1}",
            comparison.before.weighted_score,
            comparison.after.weighted_score,
            comparison.weighted_delta
        ));
    }

    lines.push(String::new());
    lines.push("Category breakdown:".to_string());
    for row in &summary.categories {
        let mut gaps = row.top_gaps.join(", ");
        if row.hidden_gaps > 0 {
            gaps.push_str(&format!(" (+{} more)", row.hidden_gaps));
        }
        lines.push(format!(
            "- {} {} (wt {}): {} yes / {} no / {} n/a | {:.1}% | wtd {:.2}{}",
            row.category,
            row.name,
            row.weight,
            row.yes,
            row.no,
            row.na,
            row.pct,
            row.weighted_contribution,
            if gaps.is_empty() {
                String::new()
            } else {
                format!(" | gaps: {gaps}")
            }
        ));
    }

    if !summary.fix_types.is_empty() {
        lines.push(String::new());
        lines.push("Gaps by fix type:".to_string());
        for row in &summary.fix_types {
            lines.push(format!(
                "- {}: {} ({})",
                row.fix_type.label(),
                row.count,
                row.description
            ));
        }
        lines.push(format!("- total patchable: {}", summary.patchable_total));
    }

    lines.push(String::new());
    lines.push("Top remediation priorities (weight * gaps / assessed):".to_string());
    for row in &summary.priorities {
        lines.push(format!(
            "{}. {} ({}): {} gaps / {} assessed, impact {:.2}",
            row.rank, row.category, row.name, row.gaps, row.assessed, row.impact
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}",
        summary.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.join("\n")
}

pub(crate) fn render_delta(report: &DeltaReport) -> String {
    let mut lines = vec![
        "HECVAT assessment delta".to_string(),
        format!(
            "Before: {} on {}",
            report.before.assessment_date, report.before.branch
        ),
        format!(
            "After: {} on {}",
            report.after.assessment_date, report.after.branch
        ),
        String::new(),
        format!("- Improvements (No -> Yes): {}", report.improved.len()),
        format!("- Regressions (Yes -> No): {}", report.regressed.len()),
        format!("- Newly assessed: {}", report.newly_assessed.len()),
        format!("- Unchanged Yes: {}", report.unchanged_yes),
        format!("- Unchanged No: {}", report.unchanged_no),
    ];

    for (title, rows) in [
        ("Improvements", &report.improved),
        ("Regressions", &report.regressed),
    ] {
        if rows.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("{title}:"));
        for row in rows {
            let detail = if row.detail.is_empty() {
                String::new()
            } else {
                format!(": {}", row.detail)
            };
            lines.push(format!("  - {} [{}]{detail}", row.id, row.category));
        }
    }

    if !report.newly_assessed.is_empty() {
        lines.push(String::new());
        lines.push("Newly assessed:".to_string());
        for row in &report.newly_assessed {
            lines.push(format!("  - {} [{}]: {}", row.id, row.category, row.answer));
        }
    }

    if !report.category_deltas.is_empty() {
        lines.push(String::new());
        lines.push("Category score deltas:".to_string());
        for row in &report.category_deltas {
            lines.push(format!(
                "  - {}: {}/{} ({:.1}%) -> {}/{} ({:.1}%) | {:+.1}%",
                row.category,
                row.before_yes,
                row.before_total,
                row.before_pct,
                row.after_yes,
                row.after_total,
                row.after_pct,
                row.delta
            ));
        }
    }

    lines.join("\n")
}
