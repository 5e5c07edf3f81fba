use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::EngineError;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Structurally valid: finite and inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Named trip destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(default)]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl Destination {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: Some(name.into()),
            lat,
            lon,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Introvert,
    Ambivert,
    Extrovert,
}

impl FromStr for Personality {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "introvert" => Ok(Self::Introvert),
            "ambivert" => Ok(Self::Ambivert),
            "extrovert" => Ok(Self::Extrovert),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Smoking {
    Never,
    Occasionally,
    Regularly,
}

impl FromStr for Smoking {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "never" | "no" | "non-smoker" | "non_smoker" | "nonsmoker" => Ok(Self::Never),
            "occasionally" | "sometimes" | "socially" => Ok(Self::Occasionally),
            "regularly" | "yes" | "smoker" => Ok(Self::Regularly),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Drinking {
    Never,
    Socially,
    Regularly,
}

impl FromStr for Drinking {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "never" | "no" | "non-drinker" | "non_drinker" | "nondrinker" => Ok(Self::Never),
            "socially" | "occasionally" | "sometimes" => Ok(Self::Socially),
            "regularly" | "yes" | "drinker" => Ok(Self::Regularly),
            _ => Err(()),
        }
    }
}

/// Static profile attributes from the relational store
///
/// Every field is independently optional. Unrecognised enum values
/// ("Prefer not to say", typos) deserialize as absent rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticAttributes {
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<f64>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub personality: Option<Personality>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub smoking: Option<Smoking>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub drinking: Option<Drinking>,
}

/// One traveler's side of a pairwise comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripProfile {
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(default)]
    pub destination: Option<Destination>,
    #[serde(rename = "homeLocation", alias = "location", default)]
    pub home_location: Option<Coordinates>,
    pub budget: f64,
    #[serde(
        rename = "tripStart",
        alias = "startDate",
        default,
        deserialize_with = "lenient_datetime"
    )]
    pub trip_start: Option<DateTime<Utc>>,
    #[serde(
        rename = "tripEnd",
        alias = "endDate",
        default,
        deserialize_with = "lenient_datetime"
    )]
    pub trip_end: Option<DateTime<Utc>>,
    #[serde(alias = "static_attributes", default)]
    pub attributes: StaticAttributes,
}

impl TripProfile {
    /// Boundary check for structurally malformed input
    ///
    /// Absent fields are fine; only values that cannot be numbers in the
    /// first place (NaN coordinates, negative budgets) are rejected.
    pub fn validate(&self) -> Result<(), EngineError> {
        if let Some(dest) = &self.destination {
            if !dest.coordinates().is_valid() {
                return Err(EngineError::invalid(format!(
                    "profile {:?}: destination coordinates ({}, {}) out of range",
                    self.user_id, dest.lat, dest.lon
                )));
            }
        }
        if let Some(home) = &self.home_location {
            if !home.is_valid() {
                return Err(EngineError::invalid(format!(
                    "profile {:?}: home location ({}, {}) out of range",
                    self.user_id, home.lat, home.lon
                )));
            }
        }
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(EngineError::invalid(format!(
                "profile {:?}: budget must be a non-negative number, got {}",
                self.user_id, self.budget
            )));
        }
        Ok(())
    }

    pub fn destination_coordinates(&self) -> Option<Coordinates> {
        self.destination.as_ref().map(Destination::coordinates)
    }
}

/// Aggregated view of a travel group, used as a `user_group` target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupProfile {
    #[serde(rename = "groupId", default)]
    pub group_id: String,
    #[serde(default)]
    pub destination: Option<Destination>,
    #[serde(
        rename = "tripStart",
        alias = "startDate",
        default,
        deserialize_with = "lenient_datetime"
    )]
    pub trip_start: Option<DateTime<Utc>>,
    #[serde(
        rename = "tripEnd",
        alias = "endDate",
        default,
        deserialize_with = "lenient_datetime"
    )]
    pub trip_end: Option<DateTime<Utc>>,
    #[serde(rename = "averageBudget", default)]
    pub average_budget: Option<f64>,
    #[serde(rename = "averageAge", default)]
    pub average_age: Option<f64>,
    #[serde(rename = "topInterests", default)]
    pub top_interests: Vec<String>,
    #[serde(rename = "dominantLanguages", default)]
    pub dominant_languages: Option<Vec<String>>,
    #[serde(rename = "dominantNationalities", default)]
    pub dominant_nationalities: Option<Vec<String>>,
    #[serde(default)]
    pub size: Option<u32>,
}

/// User-preference keys a caller may boost
///
/// The core travel attributes (destination, dates, budget) are deliberately
/// not representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoostKey {
    Age,
    Gender,
    Personality,
    Interests,
    Religion,
    Smoking,
    Drinking,
}

impl BoostKey {
    pub const ALL: [BoostKey; 7] = [
        BoostKey::Age,
        BoostKey::Gender,
        BoostKey::Personality,
        BoostKey::Interests,
        BoostKey::Religion,
        BoostKey::Smoking,
        BoostKey::Drinking,
    ];
}

/// Target value of an active filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterTarget {
    Range { min: f64, max: f64 },
    Value(String),
    Values(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostEntry {
    #[serde(default)]
    pub target: Option<FilterTarget>,
    pub boost: f64,
}

/// Caller-selected up-weighting of user-preference attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterBoost {
    entries: BTreeMap<BoostKey, BoostEntry>,
}

impl FilterBoost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: BoostKey, target: Option<FilterTarget>, boost: f64) -> Self {
        self.insert(key, BoostEntry { target, boost });
        self
    }

    pub fn insert(&mut self, key: BoostKey, entry: BoostEntry) {
        self.entries.insert(key, entry);
    }

    pub fn contains(&self, key: BoostKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoostKey, &BoostEntry)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Multipliers must be finite and positive
    pub fn validate(&self) -> Result<(), EngineError> {
        for (key, entry) in self.iter() {
            if !entry.boost.is_finite() || entry.boost <= 0.0 {
                return Err(EngineError::invalid(format!(
                    "boost multiplier for {:?} must be a positive number, got {}",
                    key, entry.boost
                )));
            }
        }
        Ok(())
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Per-attribute compatibility scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub destination_score: f64,
    pub date_overlap_score: f64,
    pub budget_score: f64,
    pub interest_score: f64,
    pub age_score: f64,
    pub personality_score: f64,
    pub religion_score: f64,
    pub location_origin_score: f64,
    pub lifestyle_score: f64,
}

/// Output of the compatibility aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    #[serde(rename = "budgetDifferenceLabel")]
    pub budget_difference_label: String,
}

/// Ranked candidate returned by the matcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMatch {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "destinationName")]
    pub destination_name: Option<String>,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    #[serde(rename = "budgetDifference")]
    pub budget_difference: String,
    pub attributes: StaticAttributes,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace(' ', "_")
}

/// Oldest age accepted from input; anything outside `0..=MAX_AGE` is absent
const MAX_AGE: f64 = 120.0;

/// Parse a trip date: RFC 3339 timestamps, naive datetimes, or plain
/// calendar dates (midnight UTC). Anything else is `None`.
pub fn parse_trip_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    // Strings are parsed, integers are epoch milliseconds, anything else is absent
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::String(s) => parse_trip_date(&s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0).map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let age = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(age.filter(|a| a.is_finite() && (0.0..=MAX_AGE).contains(a)))
}

fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|s| s.parse().ok()))
}
