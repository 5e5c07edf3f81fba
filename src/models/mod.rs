// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod training;

pub use domain::{
    BoostEntry, BoostKey, BoundingBox, CompatibilityResult, Coordinates, Destination, Drinking,
    FilterBoost, FilterTarget, GroupProfile, Personality, ScoreBreakdown, ScoredMatch, Smoking,
    StaticAttributes, TripProfile,
};
pub use requests::{AgeRange, FindSoloMatchesRequest, ScorePairRequest, SearchFilters, TrainingEventRequest};
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse, ScorePairResponse};
pub use training::{FeatureVector, MatchType, Outcome, TrainingEvent};
