use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    CompareProfilesResponse, HealthResponse, PairingResponse, ProfileText, ProfilesRequest, UserProfile,
};
use crate::routes::{embedding_error_response, error_response, pairing_error_response, AppState};
use crate::services::EmbeddingError;

/// Configure health and profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/profiles/compare", web::post().to(compare_profiles))
        .route("/profiles/pairs", web::post().to(pair_profiles));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await;

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        embedding_model: state.embeddings.model().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Compare profiles endpoint
///
/// POST /api/v1/profiles/compare
///
/// Request body:
/// ```json
/// {
///   "profiles": [
///     {"id": "string", "email": "string", "bio": "string", "interests": ["string"]}
///   ]
/// }
/// ```
///
/// Returns every pair's embedding distance, most similar first.
async fn compare_profiles(
    state: web::Data<AppState>,
    req: web::Json<ProfilesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let profiles = &req.profiles;
    if let Err(e) = state.matcher.validate(profiles) {
        return pairing_error_response(&e);
    }

    tracing::info!("Comparing {} profiles", profiles.len());

    let embeddings = match embed_profiles(&state, profiles).await {
        Ok(embeddings) => embeddings,
        Err(e) => return embedding_error_response(&e),
    };

    let distances = match state.matcher.compare(profiles, &embeddings) {
        Ok(distances) => distances,
        Err(e) => return pairing_error_response(&e),
    };

    let response = CompareProfilesResponse {
        profiles: profiles
            .iter()
            .map(|p| ProfileText {
                id: p.id.clone(),
                profile: p.profile_text(),
            })
            .collect(),
        distances,
    };

    HttpResponse::Ok().json(response)
}

/// Pair profiles endpoint
///
/// POST /api/v1/profiles/pairs
///
/// Same body as `/profiles/compare`. Returns disjoint pairs chosen to
/// maximise embedding distance, plus the leftover profile when the count
/// is odd.
async fn pair_profiles(
    state: web::Data<AppState>,
    req: web::Json<ProfilesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    pairing_response(&state, &req.profiles).await
}

/// Embed, pair and render profiles
pub(crate) async fn pairing_response(state: &AppState, profiles: &[UserProfile]) -> HttpResponse {
    if let Err(e) = state.matcher.validate(profiles) {
        return pairing_error_response(&e);
    }

    let embeddings = match embed_profiles(state, profiles).await {
        Ok(embeddings) => embeddings,
        Err(e) => return embedding_error_response(&e),
    };

    let pairing = match state.matcher.pair(profiles, &embeddings) {
        Ok(pairing) => pairing,
        Err(e) => return pairing_error_response(&e),
    };

    let response = PairingResponse {
        pairing_id: uuid::Uuid::new_v4().to_string(),
        pairing,
        total_profiles: profiles.len(),
    };

    tracing::info!(
        "Pairing {}: {} pairs from {} profiles",
        response.pairing_id,
        response.pairing.pairs.len(),
        response.total_profiles
    );

    HttpResponse::Ok().json(response)
}

/// Fewer than two profiles need no distances, so the provider isn't called
async fn embed_profiles(
    state: &AppState,
    profiles: &[UserProfile],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if profiles.len() < 2 {
        return Ok(vec![Vec::new(); profiles.len()]);
    }

    let texts: Vec<String> = profiles.iter().map(UserProfile::profile_text).collect();
    state.embeddings.embed(&texts).await
}
