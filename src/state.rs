//! Shared application state.

use axum::extract::FromRef;

use crate::{
    auth::{JwtKeys, RevokedTokens},
    db::DbPool,
    services::identifiers::AliasGenerator,
};

/// Everything handlers and middleware share. Handlers extract only the part
/// they need, e.g. `State(pool): State<DbPool>`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: DbPool,
    pub jwt: JwtKeys,
    pub revoked: RevokedTokens,
    pub aliases: AliasGenerator,
}
