//! Registration, login and logout endpoints.
//!
//! - POST /auth/register - Create a user and its wallet account (public)
//! - POST /auth/login - Exchange credentials for a session token (public)
//! - POST /auth/logout - Revoke the presented token

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::{
    auth::{JwtKeys, RevokedTokens},
    db::DbPool,
    error::AppError,
    extract::AppJson,
    middleware::auth::AuthContext,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, UserResponse},
    services::{identifiers::AliasGenerator, user_service},
};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Register a new user.
///
/// # Endpoint
///
/// `POST /auth/register`
///
/// # Response
///
/// - **Success (201 Created)**: The new profile, with its CVU, alias and zero balance
/// - **Error (400)**: Missing or malformed fields
/// - **Error (409)**: Email or DNI already registered
pub async fn register(
    State(pool): State<DbPool>,
    State(aliases): State<AliasGenerator>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = user_service::register(&pool, &aliases, request).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Log in with email and password.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Response
///
/// - **Success (200 OK)**: `{token, first_name, last_name, email, cvu, alias}`
/// - **Error (400)**: Unknown email or wrong password
pub async fn login(
    State(pool): State<DbPool>,
    State(jwt): State<JwtKeys>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = user_service::login(&pool, &jwt, request).await?;

    Ok(Json(response))
}

/// Revoke the caller's token. Later requests with it get 401.
pub async fn logout(
    State(revoked): State<RevokedTokens>,
    Extension(auth): Extension<AuthContext>,
) -> Json<MessageResponse> {
    revoked.revoke(&auth.token, auth.expires_at);
    tracing::info!(
        user_id = %auth.user_id,
        email = %auth.email,
        revoked_tokens = revoked.len(),
        "token revoked"
    );

    Json(MessageResponse {
        message: "Logout successful",
    })
}
