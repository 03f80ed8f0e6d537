//! Card service - CRUD on the cards registered to an account.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::card::{Card, CreateCardRequest},
    services::account_service::ensure_account_exists,
};

/// List every card of an account, oldest first.
pub async fn list_cards(pool: &DbPool, account_id: Uuid) -> Result<Vec<Card>, AppError> {
    ensure_account_exists(pool, account_id).await?;

    let cards = sqlx::query_as::<_, Card>(
        "SELECT * FROM cards WHERE user_id = $1 ORDER BY created_at, id",
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;

    Ok(cards)
}

/// Get one card, only if it belongs to `account_id`.
///
/// # Errors
///
/// - `NotFound`: No such card on this account
pub async fn get_card(pool: &DbPool, account_id: Uuid, card_id: Uuid) -> Result<Card, AppError> {
    sqlx::query_as::<_, Card>("SELECT * FROM cards WHERE id = $1 AND user_id = $2")
        .bind(card_id)
        .bind(account_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Card not found"))
}

/// Register a card on an account.
///
/// # Errors
///
/// - `Validation`: Malformed number, holder or expiration
/// - `NotFound`: Account doesn't exist
/// - `Conflict`: Card number already registered (on any account)
pub async fn create_card(
    pool: &DbPool,
    account_id: Uuid,
    request: CreateCardRequest,
) -> Result<Card, AppError> {
    request.validate()?;
    ensure_account_exists(pool, account_id).await?;

    let taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cards WHERE card_number = $1)")
            .bind(&request.card_number)
            .fetch_one(pool)
            .await?;

    if taken {
        return Err(AppError::Conflict("Card number already exists".to_string()));
    }

    let card = sqlx::query_as::<_, Card>(
        r#"
        INSERT INTO cards (user_id, card_number, holder_name, expiration_date)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(account_id)
    .bind(&request.card_number)
    .bind(request.holder_name.trim())
    .bind(&request.expiration_date)
    .fetch_one(pool)
    .await?;

    tracing::info!(account_id = %account_id, card_id = %card.id, "card registered");

    Ok(card)
}

/// Remove a card from an account.
///
/// # Errors
///
/// - `NotFound`: No such card on this account
pub async fn delete_card(pool: &DbPool, account_id: Uuid, card_id: Uuid) -> Result<(), AppError> {
    let deleted = sqlx::query("DELETE FROM cards WHERE id = $1 AND user_id = $2")
        .bind(card_id)
        .bind(account_id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound("Card not found"));
    }

    tracing::info!(account_id = %account_id, card_id = %card_id, "card deleted");

    Ok(())
}
