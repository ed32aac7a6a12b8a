use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::HeaderMap, Json};
use dashmap::mapref::entry::Entry;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use shared::{AuthPayload, Envelope, SignInRequest, SignUpRequest, User, UserProfile};
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::AppError,
    state::{AppState, UserRecord},
};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: usize,
}

/// POST /auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<Json<Envelope<AuthPayload>>, AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    // Hash password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(e.to_string()))?
        .to_string();

    let user_id = Uuid::new_v4().to_string();
    match state.emails.entry(email.clone()) {
        Entry::Occupied(_) => {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }
        Entry::Vacant(slot) => {
            slot.insert(user_id.clone());
        }
    }

    let name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

    let user = User {
        id: user_id.clone(),
        email,
        name,
        avatar: None,
        subscription: "free".to_string(),
        created_at: Some(chrono::Utc::now().to_rfc3339()),
    };
    state.users.insert(
        user_id.clone(),
        UserRecord {
            user: user.clone(),
            password_hash,
        },
    );

    let token = generate_token(&user_id, &state.config.auth)?;
    tracing::info!("Registered user {}", user.email);

    Ok(Json(Envelope::ok(AuthPayload { token, user })))
}

/// POST /auth/signin
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<Envelope<AuthPayload>>, AppError> {
    let invalid = || AppError::AuthError("Invalid email or password".to_string());

    // Find user
    let email = req.email.trim().to_lowercase();
    let user_id = state
        .emails
        .get(&email)
        .map(|id| id.value().clone())
        .ok_or_else(invalid)?;
    let record = state
        .users
        .get(&user_id)
        .map(|r| r.value().clone())
        .ok_or_else(invalid)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&record.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid())?;

    let token = generate_token(&user_id, &state.config.auth)?;

    Ok(Json(Envelope::ok(AuthPayload {
        token,
        user: record.user,
    })))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Envelope<UserProfile>>, AppError> {
    let user_id = authenticate(&state, &headers)?;
    Ok(Json(Envelope::ok(super::user::profile_for(&state, &user_id)?)))
}

/// Resolve the caller from the `Authorization: Bearer` header
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<String, AppError> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

    let claims = verify_token(token, &state.config.auth.jwt_secret)?;
    if !state.users.contains_key(&claims.sub) {
        return Err(AppError::AuthError("Unknown user".to_string()));
    }
    Ok(claims.sub)
}

fn generate_token(user_id: &str, auth_config: &AuthConfig) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(auth_config.token_expiry_hours as i64))
        .ok_or_else(|| AppError::Internal("Failed to calculate expiration".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth_config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
        &jsonwebtoken::Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::AuthError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let config = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_expiry_hours: 1,
        };
        let token = generate_token("user-1", &config).unwrap();
        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, "user-1");
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let config = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_expiry_hours: 1,
        };
        let token = generate_token("user-1", &config).unwrap();
        assert!(matches!(
            verify_token(&token, "other-secret"),
            Err(AppError::AuthError(_))
        ));
    }
}
