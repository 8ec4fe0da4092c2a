use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const SEPARATOR: char = '-';

/// Reasons a raw string cannot be used as a HECVAT question identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionIdError {
    #[error("question id '{0}' has no '-' separator")]
    MissingSeparator(String),
    #[error("question id '{0}' has an empty category prefix")]
    EmptyPrefix(String),
    #[error("question id '{id}' is malformed: {reason}")]
    Malformed { id: String, reason: &'static str },
}

/// Validated `PREFIX-NN` identifier, e.g. `AAAI-01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionId {
    raw: String,
    prefix_len: usize,
}

impl QuestionId {
    pub fn parse(raw: &str) -> Result<Self, QuestionIdError> {
        let trimmed = raw.trim();
        let (prefix, number) = trimmed
            .split_once(SEPARATOR)
            .ok_or_else(|| QuestionIdError::MissingSeparator(trimmed.to_string()))?;

        if prefix.is_empty() {
            return Err(QuestionIdError::EmptyPrefix(trimmed.to_string()));
        }

        let malformed = |reason| QuestionIdError::Malformed {
            id: trimmed.to_string(),
            reason,
        };

        if !(2..=4).contains(&prefix.len()) {
            return Err(malformed("prefix must be 2 to 4 letters"));
        }
        if !prefix.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(malformed("prefix must be uppercase ASCII letters"));
        }
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed("suffix must be a decimal number"));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            prefix_len: prefix.len(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn category(&self) -> &str {
        &self.raw[..self.prefix_len]
    }

    pub fn number(&self) -> &str {
        &self.raw[self.prefix_len + SEPARATOR.len_utf8()..]
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for QuestionId {
    type Err = QuestionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for QuestionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_ids() {
        let id = QuestionId::parse(" AAAI-01 ").expect("valid id");
        assert_eq!(id.as_str(), "AAAI-01");
        assert_eq!(id.category(), "AAAI");
        assert_eq!(id.number(), "01");

        let short = QuestionId::parse("AI-7").expect("two letter prefix");
        assert_eq!(short.category(), "AI");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert_eq!(
            QuestionId::parse("AAAI01"),
            Err(QuestionIdError::MissingSeparator("AAAI01".to_string()))
        );
        assert_eq!(
            QuestionId::parse("-01"),
            Err(QuestionIdError::EmptyPrefix("-01".to_string()))
        );
        assert!(matches!(
            QuestionId::parse("INVALID-ID"),
            Err(QuestionIdError::Malformed { .. })
        ));
        assert!(matches!(
            QuestionId::parse("aaai-01"),
            Err(QuestionIdError::Malformed { .. })
        ));
        assert!(matches!(
            QuestionId::parse("AAAI-01-02"),
            Err(QuestionIdError::Malformed { .. })
        ));
        assert!(matches!(
            QuestionId::parse("AAAI-"),
            Err(QuestionIdError::Malformed { .. })
        ));
    }

    #[test]
    fn deserializes_through_validation() {
        let id: QuestionId = serde_json::from_str("\"VULN-12\"").expect("valid json id");
        assert_eq!(id.category(), "VULN");

        let err = serde_json::from_str::<QuestionId>("\"nope\"").expect_err("invalid id");
        assert!(err.to_string().contains("separator"));
    }
}
