use actix_web::{web, HttpResponse, Responder};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use validator::Validate;

use crate::models::{MatchType, TrainingEventRequest};
use crate::routes::{bad_request, engine_error, AppState};
use crate::training::{extract, MatchTarget, OutcomeModel, RuleBasedLabeler};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/training/events", web::post().to(training_event));
}

/// Pick the target named by `match_type`, or whichever one was sent
fn resolve_target(req: &TrainingEventRequest) -> Result<MatchTarget<'_>, String> {
    match (req.match_type, &req.candidate, &req.group) {
        (Some(MatchType::UserUser) | None, Some(candidate), _) => Ok(MatchTarget::Traveler(candidate)),
        (Some(MatchType::UserGroup) | None, _, Some(group)) => Ok(MatchTarget::Group(group)),
        (Some(MatchType::UserUser), None, _) => Err("user_user events need a candidate".to_string()),
        (Some(MatchType::UserGroup), _, None) => Err("user_group events need a group".to_string()),
        (None, None, None) => Err("either candidate or group is required".to_string()),
    }
}

/// Synthesize one labeled training event
///
/// POST /api/v1/training/events
///
/// Sampling is reproducible when `seed` is given.
async fn training_event(
    state: web::Data<AppState>,
    req: web::Json<TrainingEventRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }
    if let Err(err) = req.user.validate() {
        return engine_error(&err);
    }
    if let Some(Err(err)) = req.candidate.as_ref().map(|c| c.validate()) {
        return engine_error(&err);
    }

    let target = match resolve_target(&req) {
        Ok(target) => target,
        Err(message) => return bad_request("invalid_input", message),
    };

    let mut rng = match req.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let features = extract(&req.user, target);
    let labeled = RuleBasedLabeler.sample(&features, &mut rng);
    let preset = req.preset.clone().unwrap_or_else(|| state.preset.clone());
    let event = labeled.into_event(
        target.match_type(),
        features,
        preset,
        chrono::Utc::now().timestamp_millis(),
    );

    tracing::debug!(
        "Labeled {:?} event for {}: {:?}",
        event.match_type,
        req.user.user_id,
        event.outcome
    );

    HttpResponse::Ok().json(event)
}
