use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind of candidate a training event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "user_user")]
    UserUser,
    #[serde(rename = "user_group")]
    UserGroup,
}

/// Observed (or synthesized) reaction to a suggested match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Accept,
    Ignore,
    Chat,
}

impl Outcome {
    /// Binary training label: positive for accept and chat
    pub fn label(self) -> u8 {
        match self {
            Outcome::Accept | Outcome::Chat => 1,
            Outcome::Ignore => 0,
        }
    }
}

/// Named feature scores for one candidate pair, each in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(BTreeMap<String, f64>);

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.values().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Unweighted mean of every feature, 0 when empty
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.values().sum::<f64>() / self.0.len() as f64
    }
}

impl FromIterator<(String, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One line of the append-only training dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingEvent {
    pub match_type: MatchType,
    pub features: FeatureVector,
    pub outcome: Outcome,
    pub label: u8,
    pub preset: String,
    pub timestamp: i64,
    #[serde(default = "default_source")]
    pub source: String,
}

pub(crate) fn default_source() -> String {
    "rule-based".to_string()
}
