use super::domain::{category_of, Answers};
use super::scoring::{percentage, round_to};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// How a single question moved between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    UnchangedYes,
    UnchangedNo,
    Improved,
    Regressed,
    NewlyAssessed,
    Ignored,
}

impl Transition {
    /// `before` and `after` are trimmed answers; an absent answer is `""`.
    ///
    /// Only `""` and `"N/A"` count as "not yet assessed" on the before side;
    /// a bare `"NA"` moving to Yes/No is ignored.
    pub fn between(before: &str, after: &str) -> Self {
        match (before, after) {
            (b, a) if b == a => match a {
                "Yes" => Self::UnchangedYes,
                "No" => Self::UnchangedNo,
                _ => Self::Ignored,
            },
            ("No", "Yes") => Self::Improved,
            ("Yes", "No") => Self::Regressed,
            ("" | "N/A", "Yes" | "No") => Self::NewlyAssessed,
            _ => Self::Ignored,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewlyAssessed {
    pub id: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDelta {
    pub category: String,
    pub before_yes: usize,
    pub before_total: usize,
    pub after_yes: usize,
    pub after_total: usize,
    pub before_pct: f64,
    pub after_pct: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeltaResult {
    pub improved: Vec<String>,
    pub regressed: Vec<String>,
    pub newly_assessed: Vec<NewlyAssessed>,
    pub unchanged_yes: usize,
    pub unchanged_no: usize,
    /// Only categories whose percentage moved, sorted by category.
    pub category_deltas: Vec<CategoryDelta>,
}

#[derive(Debug, Default)]
struct CategoryCounts {
    before_yes: usize,
    before_total: usize,
    after_yes: usize,
    after_total: usize,
}

impl CategoryCounts {
    fn record(yes: &mut usize, total: &mut usize, answer: &str) {
        if matches!(answer, "Yes" | "No") {
            *total += 1;
            if answer == "Yes" {
                *yes += 1;
            }
        }
    }
}

/// Compares two answer sets over the sorted union of their ids.
pub fn diff(before: &Answers, after: &Answers) -> DeltaResult {
    let all_ids: BTreeSet<&str> = before.ids().chain(after.ids()).collect();

    let mut result = DeltaResult::default();
    let mut counts: BTreeMap<&str, CategoryCounts> = BTreeMap::new();

    for id in all_ids {
        let b = before.answer_text(id);
        let a = after.answer_text(id);

        match Transition::between(b, a) {
            Transition::UnchangedYes => result.unchanged_yes += 1,
            Transition::UnchangedNo => result.unchanged_no += 1,
            Transition::Improved => result.improved.push(id.to_string()),
            Transition::Regressed => result.regressed.push(id.to_string()),
            Transition::NewlyAssessed => result.newly_assessed.push(NewlyAssessed {
                id: id.to_string(),
                answer: a.to_string(),
            }),
            Transition::Ignored => {}
        }

        let entry = counts.entry(category_of(id)).or_default();
        CategoryCounts::record(&mut entry.before_yes, &mut entry.before_total, b);
        CategoryCounts::record(&mut entry.after_yes, &mut entry.after_total, a);
    }

    result.category_deltas = counts
        .into_iter()
        .filter(|(_, c)| c.before_total > 0 || c.after_total > 0)
        .filter_map(|(category, c)| {
            let before_pct = round_to(percentage(c.before_yes as f64, c.before_total as f64), 1);
            let after_pct = round_to(percentage(c.after_yes as f64, c.after_total as f64), 1);
            let delta = round_to(after_pct - before_pct, 1);
            (delta != 0.0).then(|| CategoryDelta {
                category: category.to_string(),
                before_yes: c.before_yes,
                before_total: c.before_total,
                after_yes: c.after_yes,
                after_total: c.after_total,
                before_pct,
                after_pct,
                delta,
            })
        })
        .collect();

    result
}
