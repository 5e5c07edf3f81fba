use thiserror::Error;

/// Why the eligibility gate rejected a pair
///
/// Rejection is an expected outcome: callers drop the pair and move on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IneligibleReason {
    #[error("traveler {user_id:?} is heading to a destination within {radius_km} km of home")]
    OwnCityDestination { user_id: String, radius_km: f64 },

    #[error("destination missing on at least one side")]
    MissingDestination,

    #[error("destinations are {distance_km:.1} km apart (max {max_km} km)")]
    OutsideRadius { distance_km: f64, max_km: f64 },

    #[error("trips overlap by less than one full day")]
    NoDateOverlap,
}

/// Errors surfaced by the compatibility engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("pair is not eligible: {0}")]
    Ineligible(#[from] IneligibleReason),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Short machine-readable code, used in HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ineligible(_) => "ineligible",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}
