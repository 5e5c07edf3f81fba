// Core algorithm exports
pub mod compatibility;
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod weights;

pub use compatibility::{calculate_compatibility, format_budget_difference, score_attributes};
pub use distance::{calculate_bounding_box, distance_km, haversine_distance, is_within_bounding_box};
pub use filters::{check_eligibility, is_eligible, EligibilityRules};
pub use matcher::{MatchResult, Matcher};
pub use weights::{redistribute, RedistributionMode, ScoringWeights, WeightKey, WeightModel};
