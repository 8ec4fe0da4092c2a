use super::question_id::{QuestionId, QuestionIdError, SEPARATOR};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Organizational attestation only; overrides every other rule.
const NEVER_ASSESSABLE_PREFIXES: &[&str] = &[
    "GNRL", // General info (company name, contacts)
    "COMP", // Company info (staff, operations)
    "REQU", // Product type routing
    "PCOM", // Privacy company info
    "PRGN", // Privacy regional
    "INTL", // International
    "HFIH", // Health/Financial/Insurance
    "PCHG", // Privacy change management
    "PTHP", // Privacy third party
];

/// Individual questions answerable from the repository even though their
/// category generally is not.
const ALWAYS_ASSESSABLE_IDS: &[&str] = &[
    "DOCU-05", // Architecture diagrams
    "DCTR-01", "DCTR-02", "DCTR-03", // IaC / cloud config
    "OPEM-01", "OPEM-02", // Monitoring config
    "DRPV-01", "DRPV-02", // Backup config
    "CONS-01", "CONS-02", // Dependency config
    "THRD-01", "THRD-02", "THRD-03", // Dependency manifests
    "PCID-01", "PCID-02", // Payment code patterns
    "HIPA-01", "HIPA-02", "HIPA-03", // PHI handling
    "FIDP-01", "FIDP-02", "FIDP-03", // FERPA
    "PDAT-01", "PDAT-02", "PDAT-03", "PDAT-04", // Privacy data
    "PPPR-01", "PPPR-02", "PPPR-03", // Privacy practices
];

const ASSESSABLE_PREFIXES: &[&str] = &[
    "AAAI", // Authentication, authorization, account management
    "APPL", // Application security
    "CHNG", // Change management
    "DATA", // Encryption, data handling
    "VULN", // Vulnerability management
    "ITAC", // IT accessibility
    "AIML", // AI/ML model security
    "AILM", // AI language models
    "AISC", // AI security controls
    "AIGN", // AI governance
    "AIQU", // AI quality
    "DPAI", // Data privacy, AI
];

struct RuleSets {
    never_prefixes: HashSet<&'static str>,
    always_ids: HashSet<&'static str>,
    assessable_prefixes: HashSet<&'static str>,
}

static RULES: OnceLock<RuleSets> = OnceLock::new();

fn rules() -> &'static RuleSets {
    RULES.get_or_init(|| RuleSets {
        never_prefixes: NEVER_ASSESSABLE_PREFIXES.iter().copied().collect(),
        always_ids: ALWAYS_ASSESSABLE_IDS.iter().copied().collect(),
        assessable_prefixes: ASSESSABLE_PREFIXES.iter().copied().collect(),
    })
}

/// Category and repo-assessability of a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: String,
    pub repo_assessable: bool,
}

/// Classifies a raw question id. Only the prefix is validated here; callers
/// wanting the full `PREFIX-NN` shape go through [`QuestionId::parse`].
pub fn classify(question_id: &str) -> Result<Classification, QuestionIdError> {
    let (prefix, _) = question_id
        .split_once(SEPARATOR)
        .ok_or_else(|| QuestionIdError::MissingSeparator(question_id.to_string()))?;

    if prefix.is_empty() {
        return Err(QuestionIdError::EmptyPrefix(question_id.to_string()));
    }

    Ok(Classification {
        category: prefix.to_string(),
        repo_assessable: is_repo_assessable(question_id, prefix),
    })
}

fn is_repo_assessable(question_id: &str, prefix: &str) -> bool {
    rules().resolve(question_id, prefix)
}

impl RuleSets {
    fn resolve(&self, question_id: &str, prefix: &str) -> bool {
        if self.never_prefixes.contains(prefix) {
            false
        } else if self.always_ids.contains(question_id) {
            true
        } else {
            self.assessable_prefixes.contains(prefix)
        }
    }
}

impl QuestionId {
    pub fn classification(&self) -> Classification {
        Classification {
            category: self.category().to_string(),
            repo_assessable: is_repo_assessable(self.as_str(), self.category()),
        }
    }
}

#[cfg(test)]
pub(crate) fn rule_sets_for_tests() -> (
    &'static [&'static str],
    &'static [&'static str],
    &'static [&'static str],
) {
    (
        NEVER_ASSESSABLE_PREFIXES,
        ALWAYS_ASSESSABLE_IDS,
        ASSESSABLE_PREFIXES,
    )
}
