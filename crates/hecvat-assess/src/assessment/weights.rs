use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub const MAX_WEIGHT: u8 = 10;

#[derive(Debug, thiserror::Error)]
pub enum WeightsError {
    #[error("failed to read weight table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid weight table YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("category {category} has weight {weight}, expected 0..={MAX_WEIGHT}")]
    OutOfRange { category: String, weight: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWeight {
    pub name: String,
    pub weight: u8,
}

/// Importance of each category. Weight 0 marks organizational attestation
/// categories, which never enter the weighted score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTable {
    #[serde(default)]
    category_weights: BTreeMap<String, CategoryWeight>,
}

impl WeightTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, WeightsError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        debug!(path = %path.display(), categories = table.len(), "weight table loaded");
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, WeightsError> {
        let table: Self = serde_yaml::from_reader(reader)?;
        table.validate()
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, WeightsError> {
        let table: Self = serde_yaml::from_str(source)?;
        table.validate()
    }

    /// Builds a table from `(category, weight)` pairs, naming each category by its code.
    pub fn from_weights<I, K>(weights: I) -> Result<Self, WeightsError>
    where
        I: IntoIterator<Item = (K, u8)>,
        K: Into<String>,
    {
        let category_weights = weights
            .into_iter()
            .map(|(category, weight)| {
                let category = category.into();
                let entry = CategoryWeight {
                    name: category.clone(),
                    weight,
                };
                (category, entry)
            })
            .collect();

        Self { category_weights }.validate()
    }

    fn validate(self) -> Result<Self, WeightsError> {
        if let Some((category, entry)) = self
            .category_weights
            .iter()
            .find(|(_, entry)| entry.weight > MAX_WEIGHT)
        {
            return Err(WeightsError::OutOfRange {
                category: category.clone(),
                weight: entry.weight,
            });
        }
        Ok(self)
    }

    /// Missing categories weigh nothing.
    pub fn weight(&self, category: &str) -> u8 {
        self.category_weights
            .get(category)
            .map(|entry| entry.weight)
            .unwrap_or(0)
    }

    pub fn name<'a>(&'a self, category: &'a str) -> &'a str {
        self.category_weights
            .get(category)
            .map(|entry| entry.name.as_str())
            .unwrap_or(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryWeight)> {
        self.category_weights
            .iter()
            .map(|(category, entry)| (category.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.category_weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.category_weights.is_empty()
    }
}
