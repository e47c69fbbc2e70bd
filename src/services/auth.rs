//! Auth services - registration, login and the caller's own identity

use crate::core::{AppError, AppState, encode_jwt};
use crate::domain::Identity;
use crate::dtos::{CreateUserDTO, DEFAULT_TIMEZONE, LoginDTO, RegisterDTO, TokenDTO};
use crate::entities::User;
use crate::repositories::Create;
use axum::{
    Extension,
    extract::{Json, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterDTO>,
) -> Result<Json<TokenDTO>, AppError> {
    debug!("Registering new user");
    // 1. Validate email, name and password, reporting the first failing field
    // 2. Reject an email that is already registered with CONFLICT
    // 3. Hash the password and store the user with its timezone (default Stockholm)
    // 4. Issue an access token for the new account
    body.check()?;

    let email = body.email.trim().to_string();
    if state.user.find_by_email(&email).await?.is_some() {
        warn!("Email already registered");
        return Err(AppError::conflict("Email already registered"));
    }

    let password_hash = User::hash_password(&body.password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;

    let timezone = body
        .timezone
        .map(|tz| tz.trim().to_string())
        .filter(|tz| !tz.is_empty())
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());

    let created = state
        .user
        .create(&CreateUserDTO {
            email,
            name: body.name.trim().to_string(),
            password: password_hash,
            timezone: Some(timezone),
        })
        .await?;

    let access_token = encode_jwt(created.user_id, &state.jwt_secret, state.jwt_expires_min)?;

    info!(user_id = created.user_id, "User registered");
    Ok(Json(TokenDTO { access_token }))
}

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>,
) -> Result<Json<TokenDTO>, AppError> {
    debug!("Login attempt");
    // 1. Look the user up by email (case-insensitive)
    // 2. Unknown email and wrong password both answer UNAUTHORIZED
    // 3. Issue an access token
    let user = match state.user.find_by_email(&body.email).await? {
        Some(user) => user,
        None => {
            warn!("Login for unknown email");
            return Err(AppError::unauthorized("Invalid email or password"));
        }
    };

    if !user.verify_password(&body.password) {
        warn!(user_id = user.user_id, "Wrong password");
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let access_token = encode_jwt(user.user_id, &state.jwt_secret, state.jwt_expires_min)?;

    info!(user_id = user.user_id, "User logged in");
    Ok(Json(TokenDTO { access_token }))
}

#[instrument(skip(current_user), fields(user_id = %current_user.user_id))]
pub async fn me(Extension(current_user): Extension<User>) -> Json<Identity> {
    Json(Identity::from(current_user))
}
