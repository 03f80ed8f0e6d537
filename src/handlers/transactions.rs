//! Activity (ledger) HTTP handlers.
//!
//! This module implements:
//! - GET /accounts/{id}/activity - Filtered ledger rows, newest first
//! - GET /accounts/{id}/activity/{transaction_id} - One ledger row

use axum::{Extension, Json, extract::State};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    extract::{AppPath, AppQuery},
    middleware::auth::AuthContext,
    models::transaction::{ActivityFilter, ActivityQuery, TransactionResponse},
    services::transaction_service,
};

/// List account activity.
///
/// # Endpoint
///
/// `GET /accounts/{id}/activity`
///
/// # Query Parameters
///
/// All optional, all bounds inclusive:
/// - `minAmount` / `maxAmount`: cents, compared against the absolute amount
/// - `startDate` / `endDate`: `YYYY-MM-DD`, compared against the UTC date
/// - `type`: `INCOME`, `TRANSFER_IN` or `TRANSFER_OUT`, any case
///
/// # Response
///
/// - **Success (200 OK)**: Matching rows, newest first
/// - **Error (400)**: Inverted range, unknown type or unparsable parameter
/// - **Error (403)**: Account belongs to someone else
pub async fn list_activity(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath(account_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<ActivityQuery>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    auth.ensure_owner(account_id)?;
    let filter = ActivityFilter::try_from(query)?;

    let transactions = transaction_service::list_activity(&pool, account_id, &filter).await?;

    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

/// Get one ledger row of the account.
///
/// Rows of other accounts are reported as 404, never 403.
pub async fn get_activity(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath((account_id, transaction_id)): AppPath<(Uuid, Uuid)>,
) -> Result<Json<TransactionResponse>, AppError> {
    auth.ensure_owner(account_id)?;

    let transaction =
        transaction_service::get_activity(&pool, account_id, transaction_id).await?;

    Ok(Json(transaction.into()))
}
