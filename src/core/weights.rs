//! Priority weights and filter-boost redistribution

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{BoostKey, FilterBoost};

/// The nine weighted attributes, highest base priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeightKey {
    Destination,
    DateOverlap,
    Budget,
    Interests,
    Age,
    Personality,
    LocationOrigin,
    Lifestyle,
    Religion,
}

impl WeightKey {
    pub const ALL: [WeightKey; 9] = [
        WeightKey::Destination,
        WeightKey::DateOverlap,
        WeightKey::Budget,
        WeightKey::Interests,
        WeightKey::Age,
        WeightKey::Personality,
        WeightKey::LocationOrigin,
        WeightKey::Lifestyle,
        WeightKey::Religion,
    ];

    pub const CORE: [WeightKey; 3] = [WeightKey::Destination, WeightKey::DateOverlap, WeightKey::Budget];

    /// Core travel attributes are never altered by a boost
    pub fn is_core(self) -> bool {
        Self::CORE.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeightKey::Destination => "destination",
            WeightKey::DateOverlap => "dateOverlap",
            WeightKey::Budget => "budget",
            WeightKey::Interests => "interests",
            WeightKey::Age => "age",
            WeightKey::Personality => "personality",
            WeightKey::LocationOrigin => "locationOrigin",
            WeightKey::Lifestyle => "lifestyle",
            WeightKey::Religion => "religion",
        }
    }
}

impl fmt::Display for WeightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<BoostKey> for WeightKey {
    /// Gender preference rides on the personality weight; smoking and
    /// drinking share the lifestyle weight.
    fn from(key: BoostKey) -> Self {
        match key {
            BoostKey::Age => WeightKey::Age,
            BoostKey::Gender | BoostKey::Personality => WeightKey::Personality,
            BoostKey::Interests => WeightKey::Interests,
            BoostKey::Religion => WeightKey::Religion,
            BoostKey::Smoking | BoostKey::Drinking => WeightKey::Lifestyle,
        }
    }
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub destination: f64,
    pub date_overlap: f64,
    pub budget: f64,
    pub interests: f64,
    pub age: f64,
    pub personality: f64,
    pub location_origin: f64,
    pub lifestyle: f64,
    pub religion: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            destination: 0.25,
            date_overlap: 0.20,
            budget: 0.20,
            interests: 0.10,
            age: 0.10,
            personality: 0.05,
            location_origin: 0.05,
            lifestyle: 0.03,
            religion: 0.02,
        }
    }
}

impl ScoringWeights {
    pub fn get(&self, key: WeightKey) -> f64 {
        match key {
            WeightKey::Destination => self.destination,
            WeightKey::DateOverlap => self.date_overlap,
            WeightKey::Budget => self.budget,
            WeightKey::Interests => self.interests,
            WeightKey::Age => self.age,
            WeightKey::Personality => self.personality,
            WeightKey::LocationOrigin => self.location_origin,
            WeightKey::Lifestyle => self.lifestyle,
            WeightKey::Religion => self.religion,
        }
    }

    fn get_mut(&mut self, key: WeightKey) -> &mut f64 {
        match key {
            WeightKey::Destination => &mut self.destination,
            WeightKey::DateOverlap => &mut self.date_overlap,
            WeightKey::Budget => &mut self.budget,
            WeightKey::Interests => &mut self.interests,
            WeightKey::Age => &mut self.age,
            WeightKey::Personality => &mut self.personality,
            WeightKey::LocationOrigin => &mut self.location_origin,
            WeightKey::Lifestyle => &mut self.lifestyle,
            WeightKey::Religion => &mut self.religion,
        }
    }

    pub fn sum(&self) -> f64 {
        WeightKey::ALL.iter().map(|k| self.get(*k)).sum()
    }

    pub fn core_sum(&self) -> f64 {
        WeightKey::CORE.iter().map(|k| self.get(*k)).sum()
    }

    /// Reject negative or non-finite weights
    ///
    /// Weights that do not sum to 1.0 are allowed (scores then leave
    /// [0, 1]); callers log a warning for that case.
    pub fn validate(&self) -> Result<(), EngineError> {
        for key in WeightKey::ALL {
            let w = self.get(key);
            if !w.is_finite() || w < 0.0 {
                return Err(EngineError::invalid(format!(
                    "weight {} must be a non-negative number, got {}",
                    key, w
                )));
            }
        }
        Ok(())
    }

    pub fn sums_to_one(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-9
    }
}

/// How boosted weight is taken back from the non-core, non-boosted pool
///
/// The documented redistribution rule multiplies every unboosted weight by
/// `1 + delta / (1 - core)`. That is what `Legacy` does. It raises the
/// unboosted weights instead of lowering them, which contradicts the
/// "boosting one preference dilutes the others" behaviour the rule exists
/// for, so the default is `Normalized`. Set `scoring.redistribution =
/// "legacy"` to get the rule exactly as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedistributionMode {
    /// Shrink the unboosted pool by exactly the boost delta, so the total
    /// stays at the base total. Weights floor at zero.
    #[default]
    Normalized,
    /// The documented rule as written: multiply the unboosted pool by
    /// `1 + delta / (1 - core)`. Does not preserve the total.
    Legacy,
}

/// Base weights plus the rule for applying a filter boost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightModel {
    base: ScoringWeights,
    mode: RedistributionMode,
}

impl Default for WeightModel {
    fn default() -> Self {
        Self::new(ScoringWeights::default(), RedistributionMode::default())
    }
}

impl WeightModel {
    pub fn new(base: ScoringWeights, mode: RedistributionMode) -> Self {
        Self { base, mode }
    }

    pub fn base(&self) -> &ScoringWeights {
        &self.base
    }

    pub fn mode(&self) -> RedistributionMode {
        self.mode
    }

    /// Effective weights for one scoring call
    pub fn resolve(&self, boost: Option<&FilterBoost>) -> ScoringWeights {
        match boost {
            Some(boost) if !boost.is_empty() => redistribute(&self.base, boost, self.mode),
            _ => self.base,
        }
    }
}

/// Apply a filter boost to `base`
///
/// Each boost entry multiplies its mapped weight (two entries mapping to the
/// same weight compound). The extra weight handed out,
/// `sum((multiplier - 1) * base)`, is then taken from or spread over the
/// non-core weights that no entry touched, depending on `mode`. Core travel
/// weights are copied through untouched.
pub fn redistribute(
    base: &ScoringWeights,
    boost: &FilterBoost,
    mode: RedistributionMode,
) -> ScoringWeights {
    let mut weights = *base;
    let mut total_boost_delta = 0.0;
    let mut boosted = BTreeSet::new();

    for (key, entry) in boost.iter() {
        let target = WeightKey::from(key);
        debug_assert!(!target.is_core());

        *weights.get_mut(target) *= entry.boost;
        total_boost_delta += (entry.boost - 1.0) * base.get(target);
        boosted.insert(target);
    }

    if total_boost_delta <= 0.0 {
        return weights;
    }

    let unboosted: Vec<WeightKey> = WeightKey::ALL
        .into_iter()
        .filter(|k| !k.is_core() && !boosted.contains(k))
        .collect();

    match mode {
        RedistributionMode::Legacy => {
            let remaining_weight = 1.0 - base.core_sum();
            if remaining_weight > 0.0 {
                let factor = total_boost_delta / remaining_weight;
                for key in unboosted {
                    *weights.get_mut(key) *= 1.0 + factor;
                }
            }
        }
        RedistributionMode::Normalized => {
            let pool: f64 = unboosted.iter().map(|k| base.get(*k)).sum();
            if pool > 0.0 {
                let scale = ((pool - total_boost_delta) / pool).max(0.0);
                for key in unboosted {
                    *weights.get_mut(key) *= scale;
                }
            }
        }
    }

    weights
}
