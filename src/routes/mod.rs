// Route exports
pub mod matches;
pub mod training;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};

use crate::config::Settings;
use crate::core::Matcher;
use crate::error::EngineError;
use crate::models::ErrorResponse;

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub boost_multiplier: f64,
    pub default_limit: usize,
    pub max_limit: usize,
    pub preset: String,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Result<Self, EngineError> {
        Ok(Self {
            matcher: settings.build_matcher()?,
            boost_multiplier: settings.scoring.boost_multiplier,
            default_limit: settings.matching.default_limit,
            max_limit: settings.matching.max_limit,
            preset: settings.dataset.preset.clone(),
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            matcher: Matcher::default(),
            boost_multiplier: 1.5,
            default_limit: 10,
            max_limit: 100,
            preset: "balanced".to_string(),
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(training::configure),
    );
}

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

pub(crate) fn bad_request(error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: 400,
    })
}

pub(crate) fn engine_error(err: &EngineError) -> HttpResponse {
    bad_request(err.code(), err.to_string())
}
