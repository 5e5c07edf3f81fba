//! Kovari Algo - Travel companion compatibility engine
//!
//! Scores how well two travelers (or a traveler and a group) fit together
//! for a trip, ranks candidates, and bootstraps a labeled training dataset.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod training;

// Re-export commonly used types
pub use core::{
    calculate_compatibility, check_eligibility, haversine_distance, is_eligible, Matcher,
    ScoringWeights, WeightModel,
};
pub use error::{EngineError, IneligibleReason};
pub use models::{CompatibilityResult, FilterBoost, GroupProfile, ScoredMatch, TrainingEvent, TripProfile};
pub use training::{extract_features, label_outcome};
