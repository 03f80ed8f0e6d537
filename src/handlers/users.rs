//! User profile endpoints.
//!
//! - GET /users/{id} - Profile of the caller
//! - PATCH /users/{id} - Partial profile update

use axum::{Extension, Json, extract::State};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    extract::{AppJson, AppPath},
    middleware::auth::AuthContext,
    models::user::{UserResponse, UserUpdateRequest},
    services::user_service,
};

/// Get a user profile.
///
/// # Authorization
///
/// The path id must be the caller's own id, otherwise 403.
pub async fn get_user(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath(user_id): AppPath<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    auth.ensure_owner(user_id)?;

    let user = user_service::get_user(&pool, user_id).await?;

    Ok(Json(user.into()))
}

/// Update profile fields.
///
/// # Request Body
///
/// ```json
/// {
///   "phone_number": "+54 11 4444 0000",
///   "email": "ana.gomez@example.com"
/// }
/// ```
///
/// Omitted, `null` and blank fields are left unchanged.
///
/// # Response
///
/// - **Success (200 OK)**: The updated profile
/// - **Error (400)**: Malformed email or DNI
/// - **Error (409)**: Email or DNI belongs to another user
pub async fn update_user(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath(user_id): AppPath<Uuid>,
    AppJson(request): AppJson<UserUpdateRequest>,
) -> Result<Json<UserResponse>, AppError> {
    auth.ensure_owner(user_id)?;

    let user = user_service::update_user(&pool, user_id, request).await?;

    Ok(Json(user.into()))
}
