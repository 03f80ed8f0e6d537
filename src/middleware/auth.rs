//! Bearer token gateway middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the session token from the Authorization header
//! 2. Verify its signature, expiry, issuer and audience
//! 3. Reject tokens revoked by logout
//! 4. Replace any client-supplied identity headers with verified ones
//! 5. Inject authentication context into the request

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    auth::{JwtKeys, RevokedTokens},
    error::AppError,
};

/// Verified user id header set for downstream handlers.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Verified user email header set for downstream handlers.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Authentication context attached to authenticated requests.
///
/// Handlers extract it with `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user, also the id of their account
    pub user_id: Uuid,

    pub email: String,

    /// Raw bearer token, needed to revoke it on logout
    pub token: String,

    /// Token expiry (unix seconds)
    pub expires_at: i64,
}

impl AuthContext {
    /// Fail with `AccessDenied` unless the path account is the caller's own.
    pub fn ensure_owner(&self, account_id: Uuid) -> Result<(), AppError> {
        if self.user_id == account_id {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.user_id,
                account_id = %account_id,
                "access to foreign account denied"
            );
            Err(AppError::AccessDenied)
        }
    }
}

/// Token gateway middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <jwt>` header from request
/// 2. Verify the token
/// 3. Reject it if it was revoked
/// 4. Strip and re-insert `X-User-Id` / `X-User-Email`
/// 5. Inject `AuthContext` into request, call next handler
///
/// # Returns
///
/// - `Ok(Response)` if authenticated successfully (calls next handler)
/// - `Err(AppError::Unauthorized)` otherwise (returns 401)
pub async fn auth_middleware(
    State(jwt): State<JwtKeys>,
    State(revoked): State<RevokedTokens>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?.to_string();

    let claims = jwt.verify(&token).map_err(|err| {
        tracing::debug!(error = %err, "token rejected");
        AppError::Unauthorized("Invalid or expired token")
    })?;

    if revoked.is_revoked(&token) {
        return Err(AppError::Unauthorized("Token has been revoked"));
    }

    let headers = request.headers_mut();
    headers.remove(USER_ID_HEADER);
    headers.remove(USER_EMAIL_HEADER);
    if let Ok(value) = HeaderValue::from_str(&claims.sub.to_string()) {
        headers.insert(USER_ID_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&claims.email) {
        headers.insert(USER_EMAIL_HEADER, value);
    }

    request.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        email: claims.email,
        token,
        expires_at: claims.exp,
    });

    Ok(next.run(request).await)
}

/// The `<token>` of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized("Missing bearer token"))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized("Missing bearer token"))
}
