use crate::core::{distance::distance_km, scoring::date_overlap_score};
use crate::error::IneligibleReason;
use crate::models::TripProfile;

/// Hard pass/fail limits applied before any scoring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EligibilityRules {
    /// A traveler whose destination is this close to home is not traveling
    pub own_city_radius_km: f64,
    /// Destinations further apart than this never match
    pub max_radius_km: f64,
}

impl Default for EligibilityRules {
    fn default() -> Self {
        Self {
            own_city_radius_km: 25.0,
            max_radius_km: 200.0,
        }
    }
}

impl EligibilityRules {
    /// Run the three gate checks in order, stopping at the first failure
    ///
    /// 1. Either traveler heading to their own city
    /// 2. Destinations missing or beyond the radius
    /// 3. Less than one full day of trip overlap
    pub fn check(&self, a: &TripProfile, b: &TripProfile) -> Result<(), IneligibleReason> {
        for profile in [a, b] {
            if self.travels_to_own_city(profile) {
                return Err(IneligibleReason::OwnCityDestination {
                    user_id: profile.user_id.clone(),
                    radius_km: self.own_city_radius_km,
                });
            }
        }

        let (Some(dest_a), Some(dest_b)) = (a.destination_coordinates(), b.destination_coordinates()) else {
            return Err(IneligibleReason::MissingDestination);
        };
        let distance = distance_km(&dest_a, &dest_b);
        if distance.is_nan() || distance > self.max_radius_km {
            return Err(IneligibleReason::OutsideRadius {
                distance_km: distance,
                max_km: self.max_radius_km,
            });
        }

        if date_overlap_score(a.trip_start, a.trip_end, b.trip_start, b.trip_end) == 0.0 {
            return Err(IneligibleReason::NoDateOverlap);
        }

        Ok(())
    }

    pub fn is_eligible(&self, a: &TripProfile, b: &TripProfile) -> bool {
        self.check(a, b).is_ok()
    }

    #[inline]
    fn travels_to_own_city(&self, profile: &TripProfile) -> bool {
        match (profile.home_location, profile.destination_coordinates()) {
            (Some(home), Some(dest)) => distance_km(&home, &dest) <= self.own_city_radius_km,
            _ => false,
        }
    }
}

/// Eligibility gate with the default limits, reporting why a pair failed
pub fn check_eligibility(a: &TripProfile, b: &TripProfile) -> Result<(), IneligibleReason> {
    EligibilityRules::default().check(a, b)
}

/// Eligibility gate with the default limits
#[inline]
pub fn is_eligible(a: &TripProfile, b: &TripProfile) -> bool {
    check_eligibility(a, b).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, Destination, StaticAttributes};
    use chrono::{TimeZone, Utc};

    fn create_test_profile(id: &str, dest: (f64, f64), home: (f64, f64), start: u32, end: u32) -> TripProfile {
        TripProfile {
            user_id: id.to_string(),
            destination: Some(Destination::new("Dest", dest.0, dest.1)),
            home_location: Some(Coordinates::new(home.0, home.1)),
            budget: 20000.0,
            trip_start: Some(Utc.with_ymd_and_hms(2025, 8, start, 0, 0, 0).unwrap()),
            trip_end: Some(Utc.with_ymd_and_hms(2025, 8, end, 0, 0, 0).unwrap()),
            attributes: StaticAttributes::default(),
        }
    }

    const GOA: (f64, f64) = (15.2993, 74.1240);
    const MUMBAI: (f64, f64) = (19.0760, 72.8777);
    const DELHI: (f64, f64) = (28.6139, 77.2090);

    #[test]
    fn test_eligible_pair() {
        let a = create_test_profile("a", GOA, MUMBAI, 1, 10);
        let b = create_test_profile("b", GOA, DELHI, 5, 15);
        assert!(is_eligible(&a, &b));
    }

    #[test]
    fn test_own_city_rejected_first() {
        // Also has no overlap, but the own-city check runs first
        let a = create_test_profile("a", MUMBAI, MUMBAI, 1, 3);
        let b = create_test_profile("b", MUMBAI, DELHI, 20, 25);
        assert!(matches!(
            check_eligibility(&a, &b),
            Err(IneligibleReason::OwnCityDestination { ref user_id, .. }) if user_id == "a"
        ));
    }

    #[test]
    fn test_far_destinations_rejected() {
        let a = create_test_profile("a", GOA, DELHI, 1, 10);
        let b = create_test_profile("b", MUMBAI, DELHI, 1, 10);
        assert!(matches!(check_eligibility(&a, &b), Err(IneligibleReason::OutsideRadius { .. })));
    }

    #[test]
    fn test_antipodal_destinations_rejected() {
        let a = create_test_profile("a", (0.0225, 0.0425), (45.0, 90.0), 1, 10);
        let b = create_test_profile("b", (-0.0225, -179.9575), (45.0, 90.0), 1, 10);
        assert!(matches!(
            check_eligibility(&a, &b),
            Err(IneligibleReason::OutsideRadius { distance_km, .. }) if distance_km > 20000.0
        ));
        assert!(!is_eligible(&a, &b));
    }

    #[test]
    fn test_missing_destination_rejected() {
        let a = create_test_profile("a", GOA, DELHI, 1, 10);
        let mut b = create_test_profile("b", GOA, DELHI, 1, 10);
        b.destination = None;
        assert_eq!(check_eligibility(&a, &b), Err(IneligibleReason::MissingDestination));
    }

    #[test]
    fn test_no_overlap_rejected() {
        let a = create_test_profile("a", GOA, DELHI, 1, 5);
        let b = create_test_profile("b", GOA, MUMBAI, 6, 10);
        assert_eq!(check_eligibility(&a, &b), Err(IneligibleReason::NoDateOverlap));
    }

    #[test]
    fn test_custom_radius() {
        let rules = EligibilityRules {
            max_radius_km: 1000.0,
            ..Default::default()
        };
        let a = create_test_profile("a", GOA, DELHI, 1, 10);
        let b = create_test_profile("b", MUMBAI, DELHI, 1, 10);
        assert!(rules.is_eligible(&a, &b));
    }
}
