//! Transaction service - ledger reads and card income.
//!
//! This service handles:
//! - Recent and filtered activity listings
//! - Single ledger row lookup restricted to its owner
//! - Income (deposit) from a registered card
//!
//! # Atomicity Guarantees
//!
//! An income credits the balance and writes its ledger row inside one
//! PostgreSQL transaction.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        transaction::{ActivityFilter, Transaction, TransactionType},
        transference::IncomeRequest,
    },
    services::{account_service::ensure_account_exists, card_service},
};

/// Number of rows returned by the recent-transactions listing.
pub const RECENT_LIMIT: i64 = 5;

/// The most recent ledger rows of an account, newest first.
pub async fn recent_transactions(
    pool: &DbPool,
    account_id: Uuid,
) -> Result<Vec<Transaction>, AppError> {
    ensure_account_exists(pool, account_id).await?;

    let transactions = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT * FROM transactions
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(account_id)
    .bind(RECENT_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(transactions)
}

/// Every ledger row of an account passing `filter`, newest first.
///
/// Amount bounds compare against the absolute amount, date bounds against the
/// UTC calendar date of the row.
pub async fn list_activity(
    pool: &DbPool,
    account_id: Uuid,
    filter: &ActivityFilter,
) -> Result<Vec<Transaction>, AppError> {
    ensure_account_exists(pool, account_id).await?;

    let transactions = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT * FROM transactions
        WHERE user_id = $1
          AND ($2::BIGINT IS NULL OR ABS(amount_cents) >= $2)
          AND ($3::BIGINT IS NULL OR ABS(amount_cents) <= $3)
          AND ($4::DATE IS NULL OR (created_at AT TIME ZONE 'UTC')::DATE >= $4)
          AND ($5::DATE IS NULL OR (created_at AT TIME ZONE 'UTC')::DATE <= $5)
          AND ($6::TEXT IS NULL OR transaction_type = $6)
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(account_id)
    .bind(filter.min_amount)
    .bind(filter.max_amount)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .bind(filter.transaction_type.map(TransactionType::as_str))
    .fetch_all(pool)
    .await?;

    Ok(transactions)
}

/// One ledger row, only if it belongs to `account_id`.
///
/// # Errors
///
/// - `NotFound`: Row doesn't exist or belongs to another account
pub async fn get_activity(
    pool: &DbPool,
    account_id: Uuid,
    transaction_id: Uuid,
) -> Result<Transaction, AppError> {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1 AND user_id = $2")
        .bind(transaction_id)
        .bind(account_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Transaction not found"))
}

/// Execute an income (deposit money from one of the account's cards).
///
/// # Process
///
/// 1. Validate amount and description
/// 2. Resolve the card on this account
/// 3. Start database transaction
/// 4. Credit the balance
/// 5. Record the `INCOME` ledger row
/// 6. Commit (or rollback on error)
///
/// # Errors
///
/// - `Validation`: Amount is not in `1..=MAX_AMOUNT_CENTS`, or description too long
/// - `InvalidRequest`: The credited balance would leave the `BIGINT` range
/// - `NotFound`: Card is not registered on this account, or account doesn't exist
/// - `Database`: Database error occurred
pub async fn execute_income(
    pool: &DbPool,
    account_id: Uuid,
    request: IncomeRequest,
) -> Result<Transaction, AppError> {
    request.validate()?;

    let card = card_service::get_card(pool, account_id, request.card_id).await?;

    let description = match request.description.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => format!("Income from card ****{}", card.last_four()),
    };

    let mut tx = pool.begin().await?;

    let updated_count = sqlx::query(
        r#"
        UPDATE users
        SET balance_cents = balance_cents + $1,
            updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(request.amount_cents)
    .bind(account_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated_count == 0 {
        tx.rollback().await?;
        return Err(AppError::NotFound("Account not found"));
    }

    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (user_id, amount_cents, transaction_type, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(account_id)
    .bind(request.amount_cents)
    .bind(TransactionType::Income.as_str())
    .bind(description)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        account_id = %account_id,
        card_id = %request.card_id,
        amount_cents = request.amount_cents,
        "income recorded"
    );

    Ok(transaction)
}
