//! Card HTTP handlers.
//!
//! - GET /accounts/{id}/cards - List cards
//! - POST /accounts/{id}/cards - Register a card
//! - GET /accounts/{id}/cards/{card_id} - Get one card
//! - DELETE /accounts/{id}/cards/{card_id} - Remove a card

use axum::{Extension, Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    extract::{AppJson, AppPath},
    middleware::auth::AuthContext,
    models::card::{CardResponse, CreateCardRequest},
    services::card_service,
};

pub async fn list_cards(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath(account_id): AppPath<Uuid>,
) -> Result<Json<Vec<CardResponse>>, AppError> {
    auth.ensure_owner(account_id)?;

    let cards = card_service::list_cards(&pool, account_id).await?;

    Ok(Json(cards.into_iter().map(Into::into).collect()))
}

/// Get one card of the account.
///
/// Returns 404 when the card doesn't exist or is registered on another account.
pub async fn get_card(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath((account_id, card_id)): AppPath<(Uuid, Uuid)>,
) -> Result<Json<CardResponse>, AppError> {
    auth.ensure_owner(account_id)?;

    let card = card_service::get_card(&pool, account_id, card_id).await?;

    Ok(Json(card.into()))
}

/// Register a card.
///
/// # Request Body
///
/// ```json
/// {
///   "card_number": "4111111111111111",
///   "holder_name": "ANA GOMEZ",
///   "expiration_date": "09/27"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: The registered card
/// - **Error (400)**: Malformed number, holder or expiration
/// - **Error (409)**: Card number already registered
pub async fn create_card(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath(account_id): AppPath<Uuid>,
    AppJson(request): AppJson<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>), AppError> {
    auth.ensure_owner(account_id)?;

    let card = card_service::create_card(&pool, account_id, request).await?;

    Ok((StatusCode::CREATED, Json(card.into())))
}

pub async fn delete_card(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppPath((account_id, card_id)): AppPath<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    auth.ensure_owner(account_id)?;

    card_service::delete_card(&pool, account_id, card_id).await?;

    Ok(StatusCode::OK)
}
