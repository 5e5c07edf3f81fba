//! Attribute scorers
//!
//! Every scorer maps a pair of attribute values to a compatibility score in
//! [0, 1]. Missing input on either side yields a documented neutral value,
//! never an error and never 0, so "unknown" stays distinguishable from
//! "incompatible". These are shared by the live aggregator and the
//! training feature extractor.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::core::distance::distance_km;
use crate::models::{Coordinates, Drinking, Personality, Smoking};

/// Default score when an attribute is unknown on either side
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Missing destination is penalised more than other missing attributes
pub const MISSING_DESTINATION_SCORE: f64 = 0.3;

/// Missing or empty interest sets
pub const MISSING_INTERESTS_SCORE: f64 = 0.3;

/// Trips must share at least this many days to score above zero
pub const MIN_OVERLAP_DAYS: f64 = 1.0;

const INTEREST_OVERLAP_BONUS: f64 = 0.2;
const MS_PER_DAY: f64 = 86_400_000.0;
const NEUTRAL_RELIGIONS: [&str; 3] = ["agnostic", "none", "prefer_not_to_say"];

/// Destination proximity score (closer is better, nothing beyond 200 km)
pub fn destination_score(a: Option<Coordinates>, b: Option<Coordinates>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return MISSING_DESTINATION_SCORE;
    };

    let distance = distance_km(&a, &b);
    match distance {
        d if d == 0.0 => 1.0,
        d if d <= 25.0 => 1.0,
        d if d <= 50.0 => 0.95,
        d if d <= 100.0 => 0.85,
        d if d <= 150.0 => 0.75,
        d if d <= 200.0 => 0.6,
        _ => 0.0,
    }
}

/// Days shared by two trips, clamped at zero
///
/// Returns `None` if any bound is missing.
pub fn overlap_days(
    start1: Option<DateTime<Utc>>,
    end1: Option<DateTime<Utc>>,
    start2: Option<DateTime<Utc>>,
    end2: Option<DateTime<Utc>>,
) -> Option<f64> {
    let (s1, e1, s2, e2) = (start1?, end1?, start2?, end2?);
    let overlap_ms = (e1.min(e2) - s1.max(s2)).num_milliseconds();
    Some(overlap_ms.max(0) as f64 / MS_PER_DAY)
}

/// Date overlap score relative to the first traveler's trip length
///
/// Anything under one full shared day scores 0, as do missing or
/// unparseable dates and zero-length first trips.
pub fn date_overlap_score(
    start1: Option<DateTime<Utc>>,
    end1: Option<DateTime<Utc>>,
    start2: Option<DateTime<Utc>>,
    end2: Option<DateTime<Utc>>,
) -> f64 {
    let Some(overlap) = overlap_days(start1, end1, start2, end2) else {
        return 0.0;
    };
    if overlap < MIN_OVERLAP_DAYS {
        return 0.0;
    }

    let (Some(s1), Some(e1)) = (start1, end1) else {
        return 0.0;
    };
    let trip_days = (e1 - s1).num_milliseconds() as f64 / MS_PER_DAY;
    if trip_days <= 0.0 {
        return 0.0;
    }

    match overlap / trip_days {
        r if r >= 0.8 => 1.0,
        r if r >= 0.5 => 0.9,
        r if r >= 0.3 => 0.8,
        r if r >= 0.2 => 0.6,
        r if r >= 0.1 => 0.3,
        _ => 0.1,
    }
}

/// Budget similarity by relative difference
pub fn budget_score(budget1: f64, budget2: f64) -> f64 {
    let max_budget = budget1.max(budget2);
    if max_budget <= 0.0 {
        return 1.0;
    }

    match (budget1 - budget2).abs() / max_budget {
        r if r <= 0.1 => 1.0,
        r if r <= 0.25 => 0.8,
        r if r <= 0.5 => 0.6,
        r if r <= 1.0 => 0.4,
        r if r <= 2.0 => 0.2,
        _ => 0.1,
    }
}

/// Plain Jaccard similarity of two tag sets
///
/// `None` when either side is empty.
pub fn jaccard_similarity(a: &[String], b: &[String]) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    Some(intersection as f64 / union as f64)
}

/// Shared interests: Jaccard plus a bonus for any overlap, capped at 1
pub fn interest_score(a: &[String], b: &[String]) -> f64 {
    let Some(jaccard) = jaccard_similarity(a, b) else {
        return MISSING_INTERESTS_SCORE;
    };

    if jaccard > 0.0 {
        (jaccard + INTEREST_OVERLAP_BONUS).min(1.0)
    } else {
        0.0
    }
}

/// Age gap score
pub fn age_score(age1: Option<f64>, age2: Option<f64>) -> f64 {
    let (Some(a), Some(b)) = (age1, age2) else {
        return NEUTRAL_SCORE;
    };

    match (a - b).abs() {
        d if d <= 2.0 => 1.0,
        d if d <= 5.0 => 0.9,
        d if d <= 10.0 => 0.7,
        d if d <= 15.0 => 0.5,
        d if d <= 25.0 => 0.3,
        d if d <= 40.0 => 0.1,
        _ => 0.05,
    }
}

/// Personality compatibility matrix
pub fn personality_score(p1: Option<Personality>, p2: Option<Personality>) -> f64 {
    use Personality::*;

    let (Some(p1), Some(p2)) = (p1, p2) else {
        return NEUTRAL_SCORE;
    };

    match (p1, p2) {
        (Introvert, Introvert) => 1.0,
        (Introvert, Ambivert) => 0.7,
        (Introvert, Extrovert) => 0.4,
        (Ambivert, Introvert) => 0.7,
        (Ambivert, Ambivert) => 1.0,
        (Ambivert, Extrovert) => 0.7,
        (Extrovert, Introvert) => 0.4,
        (Extrovert, Ambivert) => 0.7,
        (Extrovert, Extrovert) => 1.0,
    }
}

/// Religion: exact match 1, either side neutral 0.5, otherwise 0
pub fn religion_score(r1: Option<&str>, r2: Option<&str>) -> f64 {
    let clean = |r: Option<&str>| {
        r.map(|s| s.trim().to_lowercase().replace(' ', "_"))
            .filter(|s| !s.is_empty())
    };
    let (Some(r1), Some(r2)) = (clean(r1), clean(r2)) else {
        return NEUTRAL_SCORE;
    };

    if r1 == r2 {
        1.0
    } else if NEUTRAL_RELIGIONS.contains(&r1.as_str()) || NEUTRAL_RELIGIONS.contains(&r2.as_str()) {
        0.5
    } else {
        0.0
    }
}

/// Similarity of where the travelers live
pub fn home_location_score(a: Option<Coordinates>, b: Option<Coordinates>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return NEUTRAL_SCORE;
    };

    match distance_km(&a, &b) {
        d if d <= 25.0 => 1.0,
        d if d <= 100.0 => 0.8,
        d if d <= 200.0 => 0.6,
        d if d <= 500.0 => 0.4,
        d if d <= 1000.0 => 0.2,
        _ => 0.1,
    }
}

/// Mean of smoking and drinking agreement
///
/// A habit unknown on either side counts as half agreement.
pub fn lifestyle_score(
    smoking1: Option<Smoking>,
    drinking1: Option<Drinking>,
    smoking2: Option<Smoking>,
    drinking2: Option<Drinking>,
) -> f64 {
    (habit_agreement(smoking1, smoking2) + habit_agreement(drinking1, drinking2)) / 2.0
}

fn habit_agreement<T: PartialEq>(a: Option<T>, b: Option<T>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a == b => 1.0,
        (Some(_), Some(_)) => 0.0,
        _ => NEUTRAL_SCORE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2025, 8, d, 0, 0, 0).unwrap())
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_destination_tiers() {
        let goa = Coordinates::new(15.2993, 74.1240);
        assert_eq!(destination_score(Some(goa), Some(goa)), 1.0);

        // Panaji -> Margao, ~30 km
        let panaji = Coordinates::new(15.4909, 73.8278);
        let margao = Coordinates::new(15.2832, 73.9862);
        assert_eq!(destination_score(Some(panaji), Some(margao)), 0.95);

        // Goa -> Mumbai is far beyond the radius
        let mumbai = Coordinates::new(19.0760, 72.8777);
        assert_eq!(destination_score(Some(goa), Some(mumbai)), 0.0);

        assert_eq!(destination_score(None, Some(goa)), MISSING_DESTINATION_SCORE);
    }

    #[test]
    fn test_date_overlap_tiers() {
        // Identical trips
        assert_eq!(date_overlap_score(day(1), day(11), day(1), day(11)), 1.0);
        // 5 of 10 days
        assert_eq!(date_overlap_score(day(1), day(11), day(6), day(20)), 0.9);
        // 2 of 10 days
        assert_eq!(date_overlap_score(day(1), day(11), day(9), day(20)), 0.6);
        // 1 of 20 days
        assert_eq!(date_overlap_score(day(1), day(21), day(20), day(25)), 0.1);
    }

    #[test]
    fn test_date_overlap_requires_one_full_day() {
        let almost = Some(Utc.with_ymd_and_hms(2025, 8, 10, 1, 0, 0).unwrap());
        assert_eq!(date_overlap_score(day(1), day(11), almost, day(20)), 0.0);
        assert!(date_overlap_score(day(1), day(11), day(10), day(20)) > 0.0);
    }

    #[test]
    fn test_date_overlap_missing_dates() {
        assert_eq!(date_overlap_score(None, day(11), day(1), day(11)), 0.0);
        assert_eq!(overlap_days(day(1), None, day(1), day(2)), None);
    }

    #[test]
    fn test_budget_tiers() {
        assert_eq!(budget_score(0.0, 0.0), 1.0);
        assert_eq!(budget_score(20000.0, 19000.0), 1.0);
        assert_eq!(budget_score(20000.0, 16000.0), 0.8);
        assert_eq!(budget_score(20000.0, 10000.0), 0.6);
        assert_eq!(budget_score(20000.0, 0.0), 0.4);
    }

    #[test]
    fn test_interest_score() {
        let a = tags(&["food", "hiking", "music"]);
        let b = tags(&["food", "hiking", "music"]);
        assert_eq!(interest_score(&a, &b), 1.0);

        // 1 shared of 5 total -> 0.2 + 0.2 bonus
        let c = tags(&["food", "art", "surfing"]);
        assert!((interest_score(&a, &c) - 0.4).abs() < 1e-9);

        assert_eq!(interest_score(&a, &tags(&["chess"])), 0.0);
        assert_eq!(interest_score(&a, &[]), MISSING_INTERESTS_SCORE);
    }

    #[test]
    fn test_age_tiers() {
        assert_eq!(age_score(Some(25.0), Some(27.0)), 1.0);
        assert_eq!(age_score(Some(25.0), Some(35.0)), 0.7);
        assert_eq!(age_score(Some(20.0), Some(70.0)), 0.05);
        assert_eq!(age_score(None, Some(27.0)), NEUTRAL_SCORE);
    }

    #[test]
    fn test_personality_matrix_is_symmetric() {
        use Personality::*;
        for a in [Introvert, Ambivert, Extrovert] {
            for b in [Introvert, Ambivert, Extrovert] {
                assert_eq!(personality_score(Some(a), Some(b)), personality_score(Some(b), Some(a)));
            }
        }
        assert_eq!(personality_score(Some(Introvert), Some(Extrovert)), 0.4);
    }

    #[test]
    fn test_religion_score() {
        assert_eq!(religion_score(Some("Hindu"), Some("hindu")), 1.0);
        assert_eq!(religion_score(Some("Hindu"), Some("Prefer not to say")), 0.5);
        assert_eq!(religion_score(Some("Hindu"), Some("Christian")), 0.0);
        assert_eq!(religion_score(Some(""), Some("Christian")), NEUTRAL_SCORE);
    }

    #[test]
    fn test_home_location_score() {
        let delhi = Coordinates::new(28.6139, 77.2090);
        let noida = Coordinates::new(28.5355, 77.3910);
        let chennai = Coordinates::new(13.0827, 80.2707);
        assert_eq!(home_location_score(Some(delhi), Some(noida)), 1.0);
        assert_eq!(home_location_score(Some(delhi), Some(chennai)), 0.1);
        assert_eq!(home_location_score(Some(delhi), None), NEUTRAL_SCORE);
    }

    #[test]
    fn test_lifestyle_score() {
        assert_eq!(
            lifestyle_score(Some(Smoking::Never), Some(Drinking::Socially), Some(Smoking::Never), Some(Drinking::Socially)),
            1.0
        );
        assert_eq!(
            lifestyle_score(Some(Smoking::Never), Some(Drinking::Never), Some(Smoking::Never), Some(Drinking::Regularly)),
            0.5
        );
        assert_eq!(lifestyle_score(None, None, None, None), NEUTRAL_SCORE);
    }
}
