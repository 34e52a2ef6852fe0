/// Account endpoints under `/v1/auth`
///
/// `register` and `login` both hand out an access/refresh token pair;
/// `refresh` trades a refresh token for a fresh access token.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{jwt, password},
    models::user::CreateUser,
};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Also checked by `password::validate_password_strength`
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
}

/// Body of a successful register or login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub user_id: Uuid,

    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

fn token_response(state: &AppState, user_id: Uuid) -> ApiResult<TokenResponse> {
    let (access_token, refresh_token) = jwt::issue_token_pair(user_id, state.jwt_secret())?;
    Ok(TokenResponse {
        user_id,
        access_token,
        refresh_token,
    })
}

/// `POST /v1/auth/register` answers 201; a taken email is 409, a weak
/// password or malformed email 422
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    req.validate()?;
    password::validate_password_strength(&req.password)
        .map_err(|message| ApiError::invalid("password", message))?;

    let password_hash = password::hash_password(&req.password)?;

    let user = state
        .board
        .store()
        .insert_user(CreateUser {
            email: req.email.trim().to_string(),
            password_hash,
            name: req.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(token_response(&state, user.id)?)))
}

/// `POST /v1/auth/login`
///
/// Unknown email and wrong password both answer 401 with the same message.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .board
        .store()
        .find_user_by_email(req.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    tracing::debug!(user_id = %user.id, "User logged in");
    Ok(Json(token_response(&state, user.id)?))
}

/// `POST /v1/auth/refresh`; an expired or tampered token is 401
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
