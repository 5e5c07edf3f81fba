use crate::core::scoring::{
    age_score, budget_score, date_overlap_score, destination_score, home_location_score,
    interest_score, lifestyle_score, personality_score, religion_score,
};
use crate::core::weights::ScoringWeights;
use crate::models::{CompatibilityResult, ScoreBreakdown, TripProfile};

/// Score every attribute of a pair
pub fn score_attributes(a: &TripProfile, b: &TripProfile) -> ScoreBreakdown {
    let (attrs_a, attrs_b) = (&a.attributes, &b.attributes);

    ScoreBreakdown {
        destination_score: destination_score(a.destination_coordinates(), b.destination_coordinates()),
        date_overlap_score: date_overlap_score(a.trip_start, a.trip_end, b.trip_start, b.trip_end),
        budget_score: budget_score(a.budget, b.budget),
        interest_score: interest_score(&attrs_a.interests, &attrs_b.interests),
        age_score: age_score(attrs_a.age, attrs_b.age),
        personality_score: personality_score(attrs_a.personality, attrs_b.personality),
        religion_score: religion_score(attrs_a.religion.as_deref(), attrs_b.religion.as_deref()),
        location_origin_score: home_location_score(a.home_location, b.home_location),
        lifestyle_score: lifestyle_score(attrs_a.smoking, attrs_a.drinking, attrs_b.smoking, attrs_b.drinking),
    }
}

/// Weighted sum of a breakdown
#[inline]
pub fn weighted_score(breakdown: &ScoreBreakdown, weights: &ScoringWeights) -> f64 {
    breakdown.destination_score * weights.destination
        + breakdown.date_overlap_score * weights.date_overlap
        + breakdown.budget_score * weights.budget
        + breakdown.interest_score * weights.interests
        + breakdown.age_score * weights.age
        + breakdown.personality_score * weights.personality
        + breakdown.location_origin_score * weights.location_origin
        + breakdown.lifestyle_score * weights.lifestyle
        + breakdown.religion_score * weights.religion
}

/// Calculate the compatibility of `b` for traveler `a`
///
/// Scoring formula:
/// score = (
///     destination * 0.25 +
///     date_overlap * 0.20 +
///     budget * 0.20 +
///     interests * 0.10 +
///     age * 0.10 +
///     personality * 0.05 +
///     location_origin * 0.05 +
///     lifestyle * 0.03 +
///     religion * 0.02
/// )
/// with the default weights. Eligibility is not re-checked here: an
/// ineligible pair simply gets a low score.
pub fn calculate_compatibility(a: &TripProfile, b: &TripProfile, weights: &ScoringWeights) -> CompatibilityResult {
    let breakdown = score_attributes(a, b);

    CompatibilityResult {
        score: weighted_score(&breakdown, weights),
        breakdown,
        budget_difference_label: format_budget_difference(b.budget - a.budget),
    }
}

/// Format a budget difference for display: "Same budget", "+9.5k", "-12k", "+800"
pub fn format_budget_difference(difference: f64) -> String {
    if difference == 0.0 {
        return "Same budget".to_string();
    }

    let sign = if difference > 0.0 { "+" } else { "-" };
    let abs_diff = difference.abs();

    if abs_diff >= 1000.0 {
        let thousands = abs_diff / 1000.0;
        if thousands.fract() == 0.0 {
            format!("{}{:.0}k", sign, thousands)
        } else {
            format!("{}{:.1}k", sign, thousands)
        }
    } else {
        format!("{}{:.0}", sign, abs_diff)
    }
}
