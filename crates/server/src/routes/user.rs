use axum::{extract::State, http::HeaderMap, Json};
use shared::{Envelope, UpdateProfileRequest, User, UserProfile, UserStats};

use super::auth::authenticate;
use crate::{error::AppError, state::AppState};

/// GET /user/profile
pub async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Envelope<UserProfile>>, AppError> {
    let user_id = authenticate(&state, &headers)?;
    Ok(Json(Envelope::ok(profile_for(&state, &user_id)?)))
}

/// PUT /user/profile
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Envelope<User>>, AppError> {
    let user_id = authenticate(&state, &headers)?;

    let mut record = state
        .users
        .get_mut(&user_id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(name) = req.name.map(|n| n.trim().to_string()) {
        if name.is_empty() {
            return Err(AppError::BadRequest("Name cannot be empty".to_string()));
        }
        record.user.name = name;
    }
    if let Some(avatar) = req.avatar {
        record.user.avatar = Some(avatar);
    }

    Ok(Json(Envelope::ok(record.user.clone())))
}

/// Account plus usage counters derived from stored state
pub fn profile_for(state: &AppState, user_id: &str) -> Result<UserProfile, AppError> {
    let user = state
        .users
        .get(user_id)
        .map(|record| record.user.clone())
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let stats = UserStats {
        videos: state.videos.iter().filter(|j| j.owner_id == user_id).count() as u64,
        scenes: state.scenes.iter().filter(|s| s.owner_id == user_id).count() as u64,
        views: 0,
    };

    Ok(UserProfile { user, stats })
}
