use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::{MatchError, Matcher};
use crate::models::{ErrorResponse, MatchQuery, MatchResponse};
use crate::services::SnapshotStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub snapshots: Arc<SnapshotStore>,
    pub matcher: Arc<Matcher>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/match", web::post().to(match_providers));
}

/// Match endpoint
///
/// POST /match
///
/// Request body (every field optional):
/// ```json
/// {
///   "lat": 32.08, "lng": 34.78, "radiusKm": 15,
///   "services": ["wound care"], "expertise": ["night-shift"],
///   "day": "mon", "slot": "morning", "minRating": 4.0, "limit": 20
/// }
/// ```
async fn match_providers(
    state: web::Data<AppState>,
    query: web::Json<MatchQuery>,
) -> impl Responder {
    let snapshot = state.snapshots.current();

    match state.matcher.rank(&query, &snapshot.providers) {
        Ok(results) => {
            tracing::info!(
                "Returning {} matches (from {} providers, {} snapshot {})",
                results.len(),
                snapshot.providers.len(),
                snapshot.source,
                snapshot.loaded_at
            );
            HttpResponse::Ok().json(MatchResponse::new(results))
        }
        Err(MatchError::InvalidQuery(errors)) => {
            tracing::info!("Validation failed for match request: {:?}", errors);
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Validation failed".to_string(),
                message: errors.to_string(),
                status_code: 400,
            })
        }
        Err(e) => {
            tracing::error!("Matching failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matching failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
