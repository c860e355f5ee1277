use std::collections::HashSet;

use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::core::PairingError;
use crate::models::{AddUserResponse, PairStoredUsersRequest, UserProfile};
use crate::routes::{
    error_response, pairing::pairing_response, pairing_error_response, store_error_response, AppState,
};

/// Configure user store routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users", web::post().to(add_user))
        .route("/users/pairs", web::post().to(pair_stored_users))
        .route("/users/{user_id}", web::get().to(get_user));
}

/// Add user endpoint
///
/// POST /api/v1/users
///
/// Request body:
/// ```json
/// {"id": "string", "email": "string", "bio": "string", "interests": ["string"]}
/// ```
async fn add_user(state: web::Data<AppState>, req: web::Json<UserProfile>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    match state.store.add_user(&req).await {
        Ok(()) => {
            tracing::info!("Added user {}", req.id);
            HttpResponse::Created().json(AddUserResponse {
                message: "User added successfully".to_string(),
                user_id: req.id.clone(),
            })
        }
        Err(e) => store_error_response(&e),
    }
}

/// Get user endpoint
///
/// GET /api/v1/users/{userId}
async fn get_user(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    match state.store.get_user(&user_id).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => store_error_response(&e),
    }
}

/// Pair stored users endpoint
///
/// POST /api/v1/users/pairs
///
/// Request body:
/// ```json
/// {"userIds": ["string"]}
/// ```
async fn pair_stored_users(
    state: web::Data<AppState>,
    req: web::Json<PairStoredUsersRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    if req.user_ids.len() > state.matcher.max_profiles() {
        return pairing_error_response(&PairingError::TooManyProfiles {
            max: state.matcher.max_profiles(),
            actual: req.user_ids.len(),
        });
    }

    // Stores may collapse repeated ids, so duplicates never reach them
    let mut seen = HashSet::with_capacity(req.user_ids.len());
    if let Some(duplicate) = req.user_ids.iter().find(|id| !seen.insert(id.as_str())) {
        return pairing_error_response(&PairingError::DuplicateEntity(duplicate.clone()));
    }

    let users = match state.store.get_users(&req.user_ids).await {
        Ok(users) => users,
        Err(e) => return store_error_response(&e),
    };

    tracing::debug!("Loaded {} stored users for pairing", users.len());

    pairing_response(&state, &users).await
}
