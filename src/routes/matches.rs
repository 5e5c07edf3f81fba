use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    FilterBoost, FindMatchesResponse, FindSoloMatchesRequest, HealthResponse, ScorePairRequest,
    ScorePairResponse, SearchFilters,
};
use crate::routes::{bad_request, engine_error, AppState};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/solo", web::post().to(find_solo_matches))
        .route("/matches/score", web::post().to(score_pair));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Active filters as a boost, `None` when nothing is selected
fn boost_for(filters: Option<&SearchFilters>, multiplier: f64) -> Option<FilterBoost> {
    filters
        .map(|f| f.to_boost(multiplier))
        .filter(|boost| !boost.is_empty())
}

/// Find solo matches endpoint
///
/// POST /api/v1/matches/solo
///
/// Request body:
/// ```json
/// {
///   "user": { "userId": "string", "destination": {...}, "budget": 20000, ... },
///   "candidates": [ ... ],
///   "filters": { "interests": ["trekking"] },
///   "limit": 10
/// }
/// ```
async fn find_solo_matches(
    state: web::Data<AppState>,
    req: web::Json<FindSoloMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_solo_matches request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }
    if let Err(err) = req.user.validate() {
        return engine_error(&err);
    }

    // Malformed candidates are dropped rather than failing the whole search
    let (candidates, rejected): (Vec<_>, Vec<_>) = req
        .candidates
        .iter()
        .cloned()
        .partition(|candidate| candidate.validate().is_ok());
    if !rejected.is_empty() {
        tracing::warn!("Dropped {} malformed candidates", rejected.len());
    }

    let limit = req
        .limit
        .map_or(state.default_limit, usize::from)
        .min(state.max_limit);
    let boost = boost_for(req.filters.as_ref(), state.boost_multiplier);

    tracing::info!(
        "Finding matches for user: {}, candidates: {}, limit: {}",
        req.user.user_id,
        candidates.len(),
        limit
    );

    let result = state
        .matcher
        .find_matches(&req.user, &candidates, boost.as_ref(), limit);

    tracing::info!(
        "Returning {} matches for user {} ({} of {} candidates eligible)",
        result.matches.len(),
        req.user.user_id,
        result.eligible_candidates,
        result.total_candidates
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
        eligible_candidates: result.eligible_candidates,
    })
}

/// Score a single pair
///
/// POST /api/v1/matches/score
///
/// The score is always computed; eligibility is reported next to it.
async fn score_pair(
    state: web::Data<AppState>,
    req: web::Json<ScorePairRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }
    for profile in [&req.user, &req.candidate] {
        if let Err(err) = profile.validate() {
            return engine_error(&err);
        }
    }

    let boost = boost_for(req.filters.as_ref(), state.boost_multiplier);
    let reason = state.matcher.rules().check(&req.user, &req.candidate).err();
    let result = state.matcher.score(&req.user, &req.candidate, boost.as_ref());

    tracing::debug!(
        "Scored {} -> {}: {:.3} (eligible: {})",
        req.user.user_id,
        req.candidate.user_id,
        result.score,
        reason.is_none()
    );

    HttpResponse::Ok().json(ScorePairResponse {
        eligible: reason.is_none(),
        reason: reason.map(|r| r.to_string()),
        result,
    })
}
