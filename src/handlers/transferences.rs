//! Transference HTTP handlers.
//!
//! - POST /accounts/{id}/transferences - Transfer to another account, or income from a card
//! - GET /accounts/{id}/transferences - Recent distinct recipients

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    extract::{AppJson, AppPath},
    middleware::auth::AuthContext,
    models::{
        transaction::TransactionResponse,
        transference::{Recipient, TransferResponse, TransferenceRequest},
    },
    services::{transaction_service, transference_service},
};

/// Move money out of, or into, the caller's account.
///
/// # Endpoint
///
/// `POST /accounts/{id}/transferences`
///
/// # Request Body
///
/// A transfer names the destination account:
///
/// ```json
/// {
///   "to_account_id": "660e8400-e29b-41d4-a716-446655440001",
///   "amount_cents": 25000,
///   "description": "Dinner"
/// }
/// ```
///
/// An income names one of the caller's cards:
///
/// ```json
/// {
///   "card_id": "880e8400-e29b-41d4-a716-446655440003",
///   "amount_cents": 100000
/// }
/// ```
///
/// # Response
///
/// - **Transfer (200 OK)**: The transference record
/// - **Income (201 Created)**: The `INCOME` ledger row
/// - **Error (400)**: Non-positive amount, same account, or unrecognized body
/// - **Error (404)**: Destination account or card not found
/// - **Error (410)**: Insufficient funds
pub async fn create_transference(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath(account_id): AppPath<Uuid>,
    AppJson(request): AppJson<TransferenceRequest>,
) -> Result<Response, AppError> {
    auth.ensure_owner(account_id)?;

    match request {
        TransferenceRequest::Transfer(transfer) => {
            let transference =
                transference_service::execute_transfer(&pool, account_id, transfer).await?;
            Ok((StatusCode::OK, Json(TransferResponse::from(transference))).into_response())
        }
        TransferenceRequest::Income(income) => {
            let transaction = transaction_service::execute_income(&pool, account_id, income).await?;
            Ok((StatusCode::CREATED, Json(TransactionResponse::from(transaction))).into_response())
        }
    }
}

/// Distinct recipients of the five most recent outgoing transfers.
pub async fn list_recipients(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath(account_id): AppPath<Uuid>,
) -> Result<Json<Vec<Recipient>>, AppError> {
    auth.ensure_owner(account_id)?;

    let recipients = transference_service::last_recipients(&pool, account_id).await?;

    Ok(Json(recipients))
}
