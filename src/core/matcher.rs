use rayon::prelude::*;

use crate::core::{
    compatibility::calculate_compatibility,
    distance::{calculate_bounding_box, distance_km, is_within_bounding_box},
    filters::EligibilityRules,
    weights::{ScoringWeights, WeightModel},
};
use crate::error::EngineError;
use crate::models::{CompatibilityResult, FilterBoost, ScoredMatch, TripProfile};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ScoredMatch>,
    pub total_candidates: usize,
    pub eligible_candidates: usize,
}

/// Main matching orchestrator - implements the multi-stage filtering pipeline
///
/// # Pipeline Stages
/// 1. Bounding box pre-filter around the traveler's destination
/// 2. Eligibility gate (own city, radius, date overlap)
/// 3. Optional budget window
/// 4. Scoring (in parallel) and ranking
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: WeightModel,
    rules: EligibilityRules,
    budget_window: Option<f64>,
}

impl Matcher {
    pub fn new(weights: WeightModel, rules: EligibilityRules, budget_window: Option<f64>) -> Self {
        Self {
            weights,
            rules,
            budget_window,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(WeightModel::default(), EligibilityRules::default(), None)
    }

    pub fn weight_model(&self) -> &WeightModel {
        &self.weights
    }

    pub fn rules(&self) -> &EligibilityRules {
        &self.rules
    }

    /// Effective weights for an optional boost
    pub fn resolve_weights(&self, boost: Option<&FilterBoost>) -> ScoringWeights {
        self.weights.resolve(boost)
    }

    /// Score a pair without gating
    pub fn score(&self, a: &TripProfile, b: &TripProfile, boost: Option<&FilterBoost>) -> CompatibilityResult {
        calculate_compatibility(a, b, &self.resolve_weights(boost))
    }

    /// Gate, then score
    pub fn evaluate(
        &self,
        a: &TripProfile,
        b: &TripProfile,
        boost: Option<&FilterBoost>,
    ) -> Result<CompatibilityResult, EngineError> {
        self.rules.check(a, b)?;
        Ok(self.score(a, b, boost))
    }

    /// Rank candidates for a traveler
    ///
    /// # Arguments
    /// * `user` - The searching traveler
    /// * `candidates` - Other active travelers
    /// * `boost` - Active filter boost, if any
    /// * `limit` - Maximum number of matches to return
    pub fn find_matches(
        &self,
        user: &TripProfile,
        candidates: &[TripProfile],
        boost: Option<&FilterBoost>,
        limit: usize,
    ) -> MatchResult {
        let total_candidates = candidates.len();
        let weights = self.resolve_weights(boost);

        let user_dest = user.destination_coordinates();
        let bounding_box = user_dest
            .map(|dest| calculate_bounding_box(dest.lat, dest.lon, self.rules.max_radius_km));

        let eligible: Vec<&TripProfile> = candidates
            .par_iter()
            // Stage 1: bounding box pre-filter and self exclusion
            .filter(|candidate| {
                if !user.user_id.is_empty() && candidate.user_id == user.user_id {
                    return false;
                }
                match (&bounding_box, candidate.destination_coordinates()) {
                    (Some(bbox), Some(dest)) => is_within_bounding_box(dest.lat, dest.lon, bbox),
                    _ => false,
                }
            })
            // Stage 2: eligibility gate
            .filter(|candidate| match self.rules.check(user, candidate) {
                Ok(()) => true,
                Err(reason) => {
                    tracing::trace!("Skipping {}: {}", candidate.user_id, reason);
                    false
                }
            })
            .collect();

        let eligible_candidates = eligible.len();

        let mut scored_matches: Vec<ScoredMatch> = eligible
            .into_par_iter()
            // Stage 3: budget window
            .filter(|candidate| match self.budget_window {
                Some(window) => (candidate.budget - user.budget).abs() <= window,
                None => true,
            })
            // Stage 4: score
            .map(|candidate| {
                let result = calculate_compatibility(user, candidate, &weights);
                let distance_km = match (user_dest, candidate.destination_coordinates()) {
                    (Some(a), Some(b)) => distance_km(&a, &b),
                    _ => f64::INFINITY,
                };

                ScoredMatch {
                    user_id: candidate.user_id.clone(),
                    destination_name: candidate.destination.as_ref().and_then(|d| d.name.clone()),
                    distance_km,
                    score: result.score,
                    breakdown: result.breakdown,
                    budget_difference: result.budget_difference_label,
                    attributes: candidate.attributes.clone(),
                }
            })
            .collect();

        // Sort by score (descending), then by distance (ascending), then id
        scored_matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    a.distance_km
                        .partial_cmp(&b.distance_km)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        scored_matches.truncate(limit);

        MatchResult {
            matches: scored_matches,
            total_candidates,
            eligible_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
