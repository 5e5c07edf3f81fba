use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{BoostKey, FilterBoost, FilterTarget, GroupProfile, TripProfile};
use crate::models::training::MatchType;

/// Age range selected in the UI filters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: f64,
    pub max: f64,
}

/// Active UI filters. Each one present turns into a boost entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default)]
    pub age_range: Option<AgeRange>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub smoking: Option<String>,
    #[serde(default)]
    pub drinking: Option<String>,
}

impl SearchFilters {
    /// Build a boost applying `multiplier` to every selected filter
    pub fn to_boost(&self, multiplier: f64) -> FilterBoost {
        let mut boost = FilterBoost::new();

        if let Some(range) = self.age_range {
            boost = boost.with(
                BoostKey::Age,
                Some(FilterTarget::Range {
                    min: range.min,
                    max: range.max,
                }),
                multiplier,
            );
        }

        let single_values = [
            (BoostKey::Gender, &self.gender),
            (BoostKey::Personality, &self.personality),
            (BoostKey::Religion, &self.religion),
            (BoostKey::Smoking, &self.smoking),
            (BoostKey::Drinking, &self.drinking),
        ];
        for (key, value) in single_values {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                boost = boost.with(key, Some(FilterTarget::Value(value.to_string())), multiplier);
            }
        }

        if let Some(interests) = self.interests.as_ref().filter(|i| !i.is_empty()) {
            boost = boost.with(
                BoostKey::Interests,
                Some(FilterTarget::Values(interests.clone())),
                multiplier,
            );
        }

        boost
    }
}

/// Request to rank candidates for one traveler
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindSoloMatchesRequest {
    pub user: TripProfile,
    #[validate(length(max = 5000))]
    pub candidates: Vec<TripProfile>,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
    #[serde(default)]
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u16>,
}

/// Request to score a single pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScorePairRequest {
    pub user: TripProfile,
    pub candidate: TripProfile,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
}

/// Request to synthesize one labeled training event
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrainingEventRequest {
    pub user: TripProfile,
    #[serde(default)]
    pub candidate: Option<TripProfile>,
    #[serde(default)]
    pub group: Option<GroupProfile>,
    #[serde(default)]
    pub match_type: Option<MatchType>,
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub preset: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}
