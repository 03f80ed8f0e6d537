//! Account HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - GET /accounts/{id} - Balance, CVU and alias
//! - PATCH /accounts/{id} - Change the alias
//! - GET /accounts/{id}/transactions - Five most recent ledger rows

use axum::{Extension, Json, extract::State};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    extract::{AppJson, AppPath},
    middleware::auth::AuthContext,
    models::{
        account::{AccountResponse, AccountUpdateRequest},
        transaction::TransactionResponse,
    },
    services::{account_service, transaction_service},
};

/// Get the caller's account.
///
/// # Endpoint
///
/// `GET /accounts/{id}`
///
/// # Response
///
/// - **Success (200 OK)**: Returns the account
/// - **Error (403)**: Account belongs to someone else
/// - **Error (404)**: Account doesn't exist
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "cvu": "0000003100010000000001",
///   "alias": "sol.luna.mar",
///   "balance_cents": 100000
/// }
/// ```
pub async fn get_account(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath(account_id): AppPath<Uuid>,
) -> Result<Json<AccountResponse>, AppError> {
    auth.ensure_owner(account_id)?;

    let account = account_service::get_account(&pool, account_id).await?;

    Ok(Json(account.into()))
}

/// Change the account alias.
///
/// # Endpoint
///
/// `PATCH /accounts/{id}`
///
/// # Request Body
///
/// ```json
/// { "alias": "mi.nuevo.alias" }
/// ```
///
/// A blank alias or the current one changes nothing and returns the account.
///
/// # Response
///
/// - **Success (200 OK)**: The account after the update
/// - **Error (400)**: Alias too long or contains spaces
/// - **Error (409)**: Alias belongs to another account
pub async fn update_account(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath(account_id): AppPath<Uuid>,
    AppJson(request): AppJson<AccountUpdateRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    auth.ensure_owner(account_id)?;

    let account = account_service::update_alias(&pool, account_id, &request).await?;

    Ok(Json(account.into()))
}

/// Five most recent ledger rows, newest first.
pub async fn recent_transactions(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath(account_id): AppPath<Uuid>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    auth.ensure_owner(account_id)?;

    let transactions = transaction_service::recent_transactions(&pool, account_id).await?;

    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}
