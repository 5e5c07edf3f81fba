// Integration tests for Kovari Algo

use chrono::{TimeZone, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use kovari_algo::core::{
    calculate_compatibility, check_eligibility, is_eligible, Matcher, RedistributionMode,
    ScoringWeights, WeightKey, WeightModel,
};
use kovari_algo::models::{
    BoostKey, Coordinates, Destination, Drinking, FeatureVector, FilterBoost, GroupProfile,
    Outcome, Personality, Smoking, StaticAttributes, TripProfile,
};
use kovari_algo::training::{
    extract_features, label_outcome, read_events, DatasetWriter, EventGenerator, GeneratorConfig,
    MatchSelection,
};
use kovari_algo::IneligibleReason;

const MANALI: (f64, f64) = (32.2432, 77.1892);
const DELHI: (f64, f64) = (28.6139, 77.2090);
const CHANDIGARH: (f64, f64) = (30.7333, 76.7794);

fn create_test_profile(id: &str, destination: (f64, f64), home: (f64, f64), budget: f64) -> TripProfile {
    TripProfile {
        user_id: id.to_string(),
        destination: Some(Destination::new("Manali", destination.0, destination.1)),
        home_location: Some(Coordinates::new(home.0, home.1)),
        budget,
        trip_start: Some(Utc.with_ymd_and_hms(2025, 12, 20, 0, 0, 0).unwrap()),
        trip_end: Some(Utc.with_ymd_and_hms(2025, 12, 27, 0, 0, 0).unwrap()),
        attributes: StaticAttributes {
            age: Some(27.0),
            personality: Some(Personality::Ambivert),
            interests: vec!["trekking".to_string(), "photography".to_string(), "cafes".to_string()],
            religion: Some("Hindu".to_string()),
            smoking: Some(Smoking::Never),
            drinking: Some(Drinking::Socially),
        },
    }
}

fn random_boost(rng: &mut ChaCha8Rng) -> FilterBoost {
    let mut boost = FilterBoost::new();
    for key in BoostKey::ALL {
        if rng.gen_bool(0.5) {
            boost = boost.with(key, None, rng.gen_range(1.0..3.0));
        }
    }
    boost
}

#[test]
fn test_scenario_a_own_city_rejected() {
    let a = create_test_profile("a", DELHI, DELHI, 20000.0);
    let b = create_test_profile("b", DELHI, MANALI, 20000.0);

    assert!(!is_eligible(&a, &b));
    assert!(matches!(
        check_eligibility(&a, &b),
        Err(IneligibleReason::OwnCityDestination { .. })
    ));
}

#[test]
fn test_scenario_b_near_identical_profiles() {
    let a = create_test_profile("a", MANALI, DELHI, 20000.0);
    let b = create_test_profile("b", MANALI, DELHI, 21000.0);

    assert!(is_eligible(&a, &b));

    let result = calculate_compatibility(&a, &b, &ScoringWeights::default());
    assert_eq!(result.breakdown.budget_score, 1.0);
    assert_eq!(result.breakdown.interest_score, 1.0);
    assert!(result.score > 0.9);
    assert_eq!(result.budget_difference_label, "+1k");
}

#[test]
fn test_scenario_c_disjoint_trips() {
    let a = create_test_profile("a", MANALI, DELHI, 20000.0);
    let mut b = create_test_profile("b", MANALI, CHANDIGARH, 20000.0);
    b.trip_start = Some(Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap());
    b.trip_end = Some(Utc.with_ymd_and_hms(2026, 1, 9, 0, 0, 0).unwrap());

    let result = calculate_compatibility(&a, &b, &ScoringWeights::default());
    assert_eq!(result.breakdown.date_overlap_score, 0.0);
    assert!(!is_eligible(&a, &b));
}

#[test]
fn test_scenario_d_interest_boost() {
    let model = WeightModel::default();
    let base = *model.base();
    let boost = FilterBoost::new().with(BoostKey::Interests, None, 1.5);
    let boosted = model.resolve(Some(&boost));

    assert!(boosted.interests > base.interests);
    for key in WeightKey::ALL {
        if key.is_core() {
            assert_eq!(boosted.get(key).to_bits(), base.get(key).to_bits());
        } else if key != WeightKey::Interests {
            assert!(boosted.get(key) <= base.get(key), "{} grew", key);
            if base.get(key) > 0.0 {
                assert!(boosted.get(key) < base.get(key), "{} unchanged", key);
            }
        }
    }
}

#[test]
fn test_scenario_e_labeler_distribution() {
    let mut features = FeatureVector::new();
    for name in ["distanceScore", "dateOverlapScore", "budgetScore", "interestScore"] {
        features.insert(name, 0.75);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let trials = 10_000;
    let accepts = (0..trials)
        .filter(|_| label_outcome(&features, &mut rng).outcome == Outcome::Accept)
        .count();

    let rate = accepts as f64 / trials as f64;
    assert!((rate - 0.80).abs() <= 0.02, "accept rate {}", rate);
}

#[test]
fn test_core_weights_invariant_under_any_boost() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for mode in [RedistributionMode::Normalized, RedistributionMode::Legacy] {
        let model = WeightModel::new(ScoringWeights::default(), mode);
        for _ in 0..500 {
            let boost = random_boost(&mut rng);
            let resolved = model.resolve(Some(&boost));

            for key in WeightKey::CORE {
                assert_eq!(resolved.get(key).to_bits(), model.base().get(key).to_bits());
            }
            assert!(WeightKey::ALL.iter().all(|k| resolved.get(*k) >= 0.0));
        }
    }
}

#[test]
fn test_scoring_is_deterministic() {
    let a = create_test_profile("a", MANALI, DELHI, 18000.0);
    let b = create_test_profile("b", (32.25, 77.18), CHANDIGARH, 25000.0);
    let boost = FilterBoost::new()
        .with(BoostKey::Religion, None, 1.5)
        .with(BoostKey::Smoking, None, 1.5);
    let matcher = Matcher::default();

    let first = matcher.score(&a, &b, Some(&boost));
    let second = matcher.score(&a, &b, Some(&boost));

    assert_eq!(first.score.to_bits(), second.score.to_bits());
    assert_eq!(first, second);
}

#[test]
fn test_sparse_profiles_never_fail() {
    let empty: TripProfile = serde_json::from_str(r#"{"budget": 0}"#).unwrap();
    let full = create_test_profile("full", MANALI, DELHI, 15000.0);

    for (a, b) in [(&empty, &full), (&full, &empty), (&empty, &empty)] {
        let result = calculate_compatibility(a, b, &ScoringWeights::default());
        assert!(result.score.is_finite());
        assert!((0.0..=1.0).contains(&result.score));
    }
    assert_eq!(check_eligibility(&empty, &full), Err(IneligibleReason::MissingDestination));
}

#[test]
fn test_integration_end_to_end_matching() {
    let matcher = Matcher::default();
    let user = create_test_profile("me", MANALI, DELHI, 20000.0);

    let mut candidates: Vec<TripProfile> = (0..10)
        .map(|i| {
            create_test_profile(
                &format!("c{}", i),
                (MANALI.0 + i as f64 * 0.01, MANALI.1),
                CHANDIGARH,
                20000.0 + i as f64 * 2500.0,
            )
        })
        .collect();
    // Goa is far outside the radius
    candidates.push(create_test_profile("goa", (15.2993, 74.1240), DELHI, 20000.0));
    // Trip to own city
    candidates.push(create_test_profile("local", CHANDIGARH, CHANDIGARH, 20000.0));

    let result = matcher.find_matches(&user, &candidates, None, 5);

    assert_eq!(result.total_candidates, 12);
    assert_eq!(result.eligible_candidates, 10);
    assert_eq!(result.matches.len(), 5);
    assert_eq!(result.matches[0].user_id, "c0");
    assert!(result
        .matches
        .windows(2)
        .all(|w| w[0].score >= w[1].score));
    assert!(result.matches.iter().all(|m| m.distance_km <= 200.0));
}

#[test]
fn test_boost_reorders_candidates() {
    let matcher = Matcher::default();
    let user = create_test_profile("me", MANALI, DELHI, 20000.0);

    // Same interests, different religion
    let mut shared_interests = create_test_profile("interests", MANALI, CHANDIGARH, 20000.0);
    shared_interests.attributes.religion = Some("Christian".to_string());
    // Same religion, no shared interests
    let mut shared_religion = create_test_profile("religion", MANALI, CHANDIGARH, 20000.0);
    shared_religion.attributes.interests = vec!["nightlife".to_string()];

    let candidates = vec![shared_interests, shared_religion];

    let plain = matcher.find_matches(&user, &candidates, None, 10);
    assert_eq!(plain.matches[0].user_id, "interests");

    let religion_boost = FilterBoost::new().with(BoostKey::Religion, None, 6.0);
    let boosted = matcher.find_matches(&user, &candidates, Some(&religion_boost), 10);
    let interests_score = |r: &kovari_algo::core::MatchResult| {
        r.matches.iter().find(|m| m.user_id == "interests").map(|m| m.score).unwrap()
    };
    assert!(interests_score(&boosted) < interests_score(&plain));
}

#[test]
fn test_feature_extraction_bounded() {
    let a = create_test_profile("a", MANALI, DELHI, 20000.0);
    let mut b = create_test_profile("b", MANALI, CHANDIGARH, 90000.0);
    b.attributes = StaticAttributes::default();

    let features = extract_features(&a, &b);
    assert_eq!(features.len(), 8);
    assert!(features.values().all(|v| (0.0..=1.0).contains(&v)));
}

#[test]
fn test_generated_dataset_round_trips_through_file() {
    let travelers: Vec<TripProfile> = (0..6)
        .map(|i| create_test_profile(&format!("t{}", i), MANALI, DELHI, 15000.0 + i as f64 * 3000.0))
        .collect();
    let groups = vec![GroupProfile {
        group_id: "himalaya-crew".to_string(),
        destination: Some(Destination::new("Manali", MANALI.0, MANALI.1)),
        average_budget: Some(22000.0),
        size: Some(5),
        ..Default::default()
    }];

    let generator = EventGenerator::new(GeneratorConfig {
        count: 20,
        selection: MatchSelection::Both,
        preset: "balanced".to_string(),
        base_timestamp_ms: 1_735_000_000_000,
    });
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let generated = generator.generate(&travelers, &groups, &mut rng);

    assert_eq!(generated.summary.solo, 14);
    assert_eq!(generated.summary.group, 6);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let mut writer = DatasetWriter::open(&path).unwrap();
    writer.append_all(&generated.events).unwrap();
    assert_eq!(writer.finish().unwrap(), 20);

    let events = read_events(&path).unwrap();
    assert_eq!(events.len(), generated.events.len());
    for (read, written) in events.iter().zip(&generated.events) {
        assert_eq!(read.timestamp, written.timestamp);
        assert_eq!(read.outcome, written.outcome);
        assert_eq!(read.match_type, written.match_type);
    }
    assert!(events.iter().all(|e| e.label == e.outcome.label()));
}
