use super::domain::{category_of, AnswerKind, Answers, FixType};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    pub yes: usize,
    pub no: usize,
    pub na: usize,
    pub blank: usize,
    /// Ids answered "No", in input order.
    pub gaps: Vec<String>,
    pub fix_types: BTreeMap<FixType, usize>,
}

impl CategoryTally {
    pub fn assessed(&self) -> usize {
        self.yes + self.no
    }

    pub fn total(&self) -> usize {
        self.yes + self.no + self.na + self.blank
    }
}

pub type CategoryTallies = BTreeMap<String, CategoryTally>;

/// Folds answers into per-category tallies. Only categories that occur in
/// `answers` get an entry.
pub fn aggregate(answers: &Answers) -> CategoryTallies {
    let mut tallies = CategoryTallies::new();

    for (id, record) in answers.iter() {
        let tally = tallies.entry(category_of(id).to_string()).or_default();
        match record.kind() {
            AnswerKind::Yes => tally.yes += 1,
            AnswerKind::No => {
                tally.no += 1;
                tally.gaps.push(id.to_string());
                let fix_type = record.fix_type.unwrap_or(FixType::Unknown);
                *tally.fix_types.entry(fix_type).or_insert(0) += 1;
            }
            AnswerKind::NotApplicable => tally.na += 1,
            AnswerKind::Unanswered => tally.blank += 1,
        }
    }

    tallies
}
