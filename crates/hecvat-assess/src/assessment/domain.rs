use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// How an answer counts toward scoring. Comparison is exact after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerKind {
    Yes,
    No,
    NotApplicable,
    /// Blank or free text, i.e. organizational attestation.
    Unanswered,
}

impl AnswerKind {
    pub fn of(raw: &str) -> Self {
        match raw.trim() {
            "Yes" => Self::Yes,
            "No" => Self::No,
            "N/A" | "NA" => Self::NotApplicable,
            _ => Self::Unanswered,
        }
    }

    pub const fn is_assessed(self) -> bool {
        matches!(self, Self::Yes | Self::No)
    }
}

/// Remediation category attached to a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixType {
    Code,
    Config,
    NewFile,
    Documentation,
    Policy,
    Organizational,
    Unknown,
}

impl FixType {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Code,
            Self::Config,
            Self::NewFile,
            Self::Documentation,
            Self::Policy,
            Self::Organizational,
            Self::Unknown,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Config => "config",
            Self::NewFile => "new_file",
            Self::Documentation => "documentation",
            Self::Policy => "policy",
            Self::Organizational => "organizational",
            Self::Unknown => "unknown",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Code => "Patchable code change (auto-generated in .patch file)",
            Self::Config => "Configuration file change (auto-generated in .patch file)",
            Self::NewFile => "New file to create (auto-generated in .patch file)",
            Self::Documentation => "Documentation to add/update in the repo",
            Self::Policy => "Organizational policy or process needed",
            Self::Organizational => "Requires business/legal attestation",
            Self::Unknown => "Not yet classified",
        }
    }

    /// Gaps that a generated patch can close.
    pub const fn is_patchable(self) -> bool {
        matches!(self, Self::Code | Self::Config | Self::NewFile)
    }

    fn from_label(value: &str) -> Self {
        Self::ordered()
            .into_iter()
            .find(|kind| kind.label() == value)
            .unwrap_or(Self::Unknown)
    }
}

/// Strength of the evidence behind an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceQuality {
    Strong,
    Moderate,
    Weak,
    Inferred,
    Other(String),
}

impl EvidenceQuality {
    pub fn parse(value: &str) -> Self {
        match value {
            "Strong" => Self::Strong,
            "Moderate" => Self::Moderate,
            "Weak" => Self::Weak,
            "Inferred" => Self::Inferred,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
            Self::Inferred => "Inferred",
            Self::Other(value) => value,
        }
    }

    /// Credit a "Yes" answer earns in the confidence-adjusted score.
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Strong => 1.0,
            Self::Moderate => 0.75,
            Self::Weak => 0.5,
            Self::Inferred => 0.25,
            Self::Other(_) => 0.5,
        }
    }
}

impl Serialize for EvidenceQuality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(
        default,
        deserialize_with = "fix_type_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub fix_type: Option<FixType>,
    #[serde(
        default,
        deserialize_with = "evidence_quality_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub evidence_quality: Option<EvidenceQuality>,
}

impl AnswerRecord {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            ..Self::default()
        }
    }

    pub fn with_fix_type(mut self, fix_type: FixType) -> Self {
        self.fix_type = Some(fix_type);
        self
    }

    pub fn with_evidence_quality(mut self, quality: EvidenceQuality) -> Self {
        self.evidence_quality = Some(quality);
        self
    }

    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = Some(info.into());
        self
    }

    pub fn trimmed(&self) -> &str {
        self.answer.trim()
    }

    pub fn kind(&self) -> AnswerKind {
        AnswerKind::of(&self.answer)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Tagging fields written by hand may hold any JSON value. Null, blank
/// strings, `false` and zero count as absent; other non-strings are kept
/// as their JSON text.
fn tag_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => None,
        Some(serde_json::Value::String(text)) => {
            Some(text).filter(|text| !text.trim().is_empty())
        }
        Some(serde_json::Value::Number(number)) if number.as_f64() == Some(0.0) => None,
        Some(other) => Some(other.to_string()),
    })
}

fn fix_type_or_none<'de, D>(deserializer: D) -> Result<Option<FixType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(tag_text(deserializer)?.map(|value| FixType::from_label(value.trim())))
}

fn evidence_quality_or_none<'de, D>(deserializer: D) -> Result<Option<EvidenceQuality>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(tag_text(deserializer)?.map(|value| EvidenceQuality::parse(&value)))
}

/// Question id → answer, in document order. A repeated key keeps its first
/// position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answers {
    entries: Vec<(String, AnswerRecord)>,
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, record: AnswerRecord) {
        let id = id.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = record,
            None => self.entries.push((id, record)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&AnswerRecord> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, record)| record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerRecord)> {
        self.entries
            .iter()
            .map(|(id, record)| (id.as_str(), record))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Trimmed answer text, or `""` for an id that is absent.
    pub fn answer_text(&self, id: &str) -> &str {
        self.get(id).map(AnswerRecord::trimmed).unwrap_or("")
    }
}

impl<K: Into<String>> FromIterator<(K, AnswerRecord)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, AnswerRecord)>>(iter: I) -> Self {
        let mut answers = Self::new();
        for (id, record) in iter {
            answers.insert(id, record);
        }
        answers
    }
}

impl Serialize for Answers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Answers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AnswersVisitor;

        impl<'de> Visitor<'de> for AnswersVisitor {
            type Value = Answers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of question id to answer record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Answers, A::Error> {
                let mut entries: Vec<(String, AnswerRecord)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                let mut positions: HashMap<String, usize> = HashMap::new();

                while let Some((id, record)) = access.next_entry::<String, AnswerRecord>()? {
                    match positions.get(&id) {
                        Some(&index) => entries[index].1 = record,
                        None => {
                            positions.insert(id.clone(), entries.len());
                            entries.push((id, record));
                        }
                    }
                }

                Ok(Answers { entries })
            }
        }

        deserializer.deserialize_map(AnswersVisitor)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read assessment: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid assessment JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One assessment run against a repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hecvat_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default)]
    pub answers: Answers,
}

impl AssessmentSnapshot {
    pub fn from_answers(answers: Answers) -> Self {
        Self {
            answers,
            ..Self::default()
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Category used for tallies: everything before the last separator.
pub fn category_of(question_id: &str) -> &str {
    question_id
        .rsplit_once('-')
        .map(|(category, _)| category)
        .unwrap_or(question_id)
}
