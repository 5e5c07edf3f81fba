//! Feature extraction for training events
//!
//! Reuses the attribute scorers from `core::scoring`, so a feature means the
//! same thing here as in the live breakdown. Only normalized features are
//! produced: no weights, no sums.

use crate::core::scoring::{
    age_score, budget_score, date_overlap_score, destination_score, home_location_score,
    interest_score, jaccard_similarity, lifestyle_score, overlap_days, personality_score,
    religion_score, MISSING_INTERESTS_SCORE, NEUTRAL_SCORE,
};
use crate::models::{FeatureVector, GroupProfile, MatchType, TripProfile};

pub const DISTANCE: &str = "distanceScore";
pub const DATE_OVERLAP: &str = "dateOverlapScore";
pub const BUDGET: &str = "budgetScore";
pub const INTEREST: &str = "interestScore";
pub const AGE: &str = "ageScore";
pub const PERSONALITY: &str = "personalityScore";
pub const LIFESTYLE: &str = "lifestyleScore";
pub const BACKGROUND: &str = "backgroundScore";
pub const GROUP_SIZE: &str = "groupSizeScore";
pub const GROUP_DIVERSITY: &str = "groupDiversityScore";

/// Budget gap at which a group's budget score reaches zero
const GROUP_BUDGET_SPAN: f64 = 40_000.0;

/// The other side of a training pair
#[derive(Debug, Clone, Copy)]
pub enum MatchTarget<'a> {
    Traveler(&'a TripProfile),
    Group(&'a GroupProfile),
}

impl MatchTarget<'_> {
    pub fn match_type(&self) -> MatchType {
        match self {
            MatchTarget::Traveler(_) => MatchType::UserUser,
            MatchTarget::Group(_) => MatchType::UserGroup,
        }
    }
}

/// Extract the feature vector for any target
pub fn extract(user: &TripProfile, target: MatchTarget<'_>) -> FeatureVector {
    match target {
        MatchTarget::Traveler(other) => extract_features(user, other),
        MatchTarget::Group(group) => extract_group_features(user, group),
    }
}

/// Features for a traveler-to-traveler pair
///
/// Assumes the eligibility gate already ran. When a destination or trip
/// dates are missing the corresponding feature is a neutral placeholder.
pub fn extract_features(a: &TripProfile, b: &TripProfile) -> FeatureVector {
    let (attrs_a, attrs_b) = (&a.attributes, &b.attributes);
    let mut features = FeatureVector::new();

    features.insert(
        DISTANCE,
        distance_feature(a.destination_coordinates(), b.destination_coordinates()),
    );
    features.insert(
        DATE_OVERLAP,
        date_feature(a, b.trip_start, b.trip_end),
    );
    features.insert(BUDGET, budget_score(a.budget, b.budget));
    features.insert(INTEREST, interest_score(&attrs_a.interests, &attrs_b.interests));
    features.insert(AGE, age_score(attrs_a.age, attrs_b.age));
    features.insert(PERSONALITY, personality_score(attrs_a.personality, attrs_b.personality));
    features.insert(
        LIFESTYLE,
        lifestyle_score(attrs_a.smoking, attrs_a.drinking, attrs_b.smoking, attrs_b.drinking),
    );

    let religion = religion_score(attrs_a.religion.as_deref(), attrs_b.religion.as_deref());
    let origin = home_location_score(a.home_location, b.home_location);
    features.insert(BACKGROUND, (religion + origin) / 2.0);

    normalized(features)
}

/// Features for a traveler-to-group pair
pub fn extract_group_features(user: &TripProfile, group: &GroupProfile) -> FeatureVector {
    let mut features = FeatureVector::new();

    features.insert(
        DISTANCE,
        distance_feature(
            user.destination_coordinates(),
            group.destination.as_ref().map(|d| d.coordinates()),
        ),
    );
    features.insert(DATE_OVERLAP, date_feature(user, group.trip_start, group.trip_end));
    features.insert(
        BUDGET,
        group
            .average_budget
            .map_or(NEUTRAL_SCORE, |avg| group_budget_score(user.budget, avg)),
    );
    features.insert(
        INTEREST,
        jaccard_similarity(&user.attributes.interests, &group.top_interests)
            .unwrap_or(MISSING_INTERESTS_SCORE),
    );
    features.insert(AGE, age_score(user.attributes.age, group.average_age));
    features.insert(PERSONALITY, NEUTRAL_SCORE);
    features.insert(GROUP_SIZE, group_size_score(group.size));
    features.insert(
        GROUP_DIVERSITY,
        group_diversity_score(
            group.dominant_languages.as_deref(),
            group.dominant_nationalities.as_deref(),
        ),
    );

    normalized(features)
}

/// Linear budget fit against a group's average
pub fn group_budget_score(budget: f64, group_average: f64) -> f64 {
    (1.0 - (budget - group_average).abs() / GROUP_BUDGET_SPAN).clamp(0.0, 1.0)
}

/// Small and medium groups score best
pub fn group_size_score(size: Option<u32>) -> f64 {
    match size {
        None | Some(0) => NEUTRAL_SCORE,
        Some(s) if s <= 6 => 1.0,
        Some(s) if s <= 12 => 0.8,
        Some(s) if s <= 20 => 0.6,
        Some(s) if s <= 40 => 0.4,
        Some(_) => 0.2,
    }
}

/// Mean of language and nationality diversity
pub fn group_diversity_score(languages: Option<&[String]>, nationalities: Option<&[String]>) -> f64 {
    let diversity = |values: Option<&[String]>| match values.map(<[String]>::len) {
        None => NEUTRAL_SCORE,
        Some(n) if n >= 3 => 1.0,
        Some(2) => 0.7,
        Some(_) => 0.5,
    };
    (diversity(languages) + diversity(nationalities)) / 2.0
}

/// Number of features that carry signal (differ from neutral)
pub fn count_active_features(features: &FeatureVector) -> usize {
    features.values().filter(|v| *v != NEUTRAL_SCORE).count()
}

fn distance_feature(
    a: Option<crate::models::Coordinates>,
    b: Option<crate::models::Coordinates>,
) -> f64 {
    if a.is_none() || b.is_none() {
        return NEUTRAL_SCORE;
    }
    destination_score(a, b)
}

fn date_feature(
    user: &TripProfile,
    start: Option<chrono::DateTime<chrono::Utc>>,
    end: Option<chrono::DateTime<chrono::Utc>>,
) -> f64 {
    if overlap_days(user.trip_start, user.trip_end, start, end).is_none() {
        return NEUTRAL_SCORE;
    }
    date_overlap_score(user.trip_start, user.trip_end, start, end)
}

/// Clamp every value to [0, 1]; NaN becomes neutral
fn normalized(features: FeatureVector) -> FeatureVector {
    features
        .iter()
        .map(|(name, value)| {
            let value = if value.is_nan() {
                NEUTRAL_SCORE
            } else {
                value.clamp(0.0, 1.0)
            };
            (name.to_string(), value)
        })
        .collect()
}
