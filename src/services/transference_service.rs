//! Transference service - peer-to-peer transfers between accounts.
//!
//! # Atomicity Guarantees
//!
//! A transfer performs five writes (two balance updates, the transference
//! record and two ledger rows) inside one PostgreSQL transaction. Both account
//! rows are locked in id order, so two opposite transfers cannot deadlock.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        transaction::TransactionType,
        transference::{Recipient, TransferRequest, Transference},
    },
    services::account_service::ensure_account_exists,
};

/// Number of recent outgoing transfers scanned for recipients.
pub const RECIPIENT_WINDOW: i64 = 5;

/// Execute a transfer (move money between accounts).
///
/// # Process
///
/// 1. Validate amount, description and distinct accounts
/// 2. Start database transaction
/// 3. Lock both accounts in id order
/// 4. Check the source balance
/// 5. Debit source, credit destination
/// 6. Record the transference and its two ledger rows
/// 7. Commit (or rollback on error)
///
/// # Errors
///
/// - `Validation`: Amount is not in `1..=MAX_AMOUNT_CENTS`, description too long,
///   or source equals destination
/// - `NotFound`: Source or destination account doesn't exist
/// - `InsufficientFunds`: Source balance is lower than the amount
/// - `Database`: Database error occurred
pub async fn execute_transfer(
    pool: &DbPool,
    from_account_id: Uuid,
    request: TransferRequest,
) -> Result<Transference, AppError> {
    let to_account_id = request.to_account_id;
    let amount_cents = request.amount_cents;

    request.validate()?;
    if from_account_id == to_account_id {
        return Err(AppError::field(
            "to_account_id",
            "Cannot transfer to the same account",
        ));
    }

    let mut tx = pool.begin().await?;

    let locked: Vec<(Uuid, String, i64)> = sqlx::query_as(
        r#"
        SELECT id, alias, balance_cents
        FROM users
        WHERE id = ANY($1)
        ORDER BY id
        FOR UPDATE
        "#,
    )
    .bind(vec![from_account_id, to_account_id])
    .fetch_all(&mut *tx)
    .await?;

    let Some((_, from_alias, from_balance)) =
        locked.iter().find(|(id, ..)| *id == from_account_id)
    else {
        tx.rollback().await?;
        return Err(AppError::NotFound("Account not found"));
    };
    let Some((_, to_alias, _)) = locked.iter().find(|(id, ..)| *id == to_account_id) else {
        tx.rollback().await?;
        return Err(AppError::NotFound("Destination account not found"));
    };

    if *from_balance < amount_cents {
        tx.rollback().await?;
        return Err(AppError::InsufficientFunds);
    }

    sqlx::query(
        "UPDATE users SET balance_cents = balance_cents - $1, updated_at = NOW() WHERE id = $2",
    )
    .bind(amount_cents)
    .bind(from_account_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE users SET balance_cents = balance_cents + $1, updated_at = NOW() WHERE id = $2",
    )
    .bind(amount_cents)
    .bind(to_account_id)
    .execute(&mut *tx)
    .await?;

    let outgoing = format!("Transfer to {to_alias}");
    let incoming = format!("Transfer from {from_alias}");
    let description = match request.description.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => outgoing.clone(),
    };

    let transference = sqlx::query_as::<_, Transference>(
        r#"
        INSERT INTO transferences (from_user_id, to_user_id, amount_cents, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(from_account_id)
    .bind(to_account_id)
    .bind(amount_cents)
    .bind(description)
    .fetch_one(&mut *tx)
    .await?;

    // Paired ledger rows: debit then credit, summing to zero
    for (user_id, signed_amount, kind, text) in [
        (from_account_id, -amount_cents, TransactionType::TransferOut, outgoing),
        (to_account_id, amount_cents, TransactionType::TransferIn, incoming),
    ] {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                user_id,
                amount_cents,
                transaction_type,
                description,
                transference_id
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(signed_amount)
        .bind(kind.as_str())
        .bind(text)
        .bind(transference.id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        transference_id = %transference.id,
        from_account_id = %from_account_id,
        to_account_id = %to_account_id,
        amount_cents,
        "transfer completed"
    );

    Ok(transference)
}

/// Distinct destinations of the account's most recent outgoing transfers,
/// most recent first.
pub async fn last_recipients(pool: &DbPool, account_id: Uuid) -> Result<Vec<Recipient>, AppError> {
    ensure_account_exists(pool, account_id).await?;

    let rows = sqlx::query_as::<_, Recipient>(
        r#"
        SELECT u.id, u.first_name, u.last_name, u.alias, u.cvu
        FROM transferences t
        JOIN users u ON u.id = t.to_user_id
        WHERE t.from_user_id = $1
        ORDER BY t.created_at DESC, t.id DESC
        LIMIT $2
        "#,
    )
    .bind(account_id)
    .bind(RECIPIENT_WINDOW)
    .fetch_all(pool)
    .await?;

    Ok(dedupe_recipients(rows))
}

/// Keep the first occurrence of each recipient, preserving order.
fn dedupe_recipients(rows: Vec<Recipient>) -> Vec<Recipient> {
    let mut seen = HashSet::new();
    rows.into_iter().filter(|r| seen.insert(r.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{transaction::Transaction, transference::MAX_DESCRIPTION_LEN},
        test_support::{balance_of, count_rows, insert_user},
    };

    fn recipient(id: Uuid, alias: &str) -> Recipient {
        Recipient {
            id,
            first_name: "Ana".into(),
            last_name: "Gomez".into(),
            alias: alias.into(),
            cvu: "0".repeat(22),
        }
    }

    #[test]
    fn dedupe_keeps_first_occurrence_in_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let rows = vec![
            recipient(b, "b"),
            recipient(a, "a"),
            recipient(b, "b"),
            recipient(c, "c"),
            recipient(a, "a"),
        ];
        let ids: Vec<Uuid> = dedupe_recipients(rows).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b, a, c]);
    }

    #[test]
    fn dedupe_of_nothing_is_nothing() {
        assert!(dedupe_recipients(Vec::new()).is_empty());
    }

    fn transfer(to_account_id: Uuid, amount_cents: i64) -> TransferRequest {
        TransferRequest {
            to_account_id,
            amount_cents,
            description: None,
        }
    }

    #[sqlx::test]
    async fn transfer_moves_money_and_writes_paired_ledger_rows(pool: DbPool) {
        let from = insert_user(&pool, "sol.luna.mar", 1_000).await;
        let to = insert_user(&pool, "rio.sal.pan", 0).await;

        let transference = execute_transfer(&pool, from.id, transfer(to.id, 300))
            .await
            .unwrap();

        assert_eq!(transference.amount_cents, 300);
        assert_eq!(transference.description.as_deref(), Some("Transfer to rio.sal.pan"));
        assert_eq!(balance_of(&pool, from.id).await, 700);
        assert_eq!(balance_of(&pool, to.id).await, 300);
        assert_eq!(count_rows(&pool, "transferences").await, 1);

        let rows = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE transference_id = $1 ORDER BY amount_cents",
        )
        .bind(transference.id)
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows.iter().map(|r| r.amount_cents).sum::<i64>(), 0);
        assert_eq!(rows[0].user_id, from.id);
        assert_eq!(rows[0].transaction_type, "TRANSFER_OUT");
        assert_eq!(rows[0].description.as_deref(), Some("Transfer to rio.sal.pan"));
        assert_eq!(rows[1].user_id, to.id);
        assert_eq!(rows[1].transaction_type, "TRANSFER_IN");
        assert_eq!(rows[1].description.as_deref(), Some("Transfer from sol.luna.mar"));
    }

    #[sqlx::test]
    async fn insufficient_funds_changes_nothing(pool: DbPool) {
        let from = insert_user(&pool, "sol.luna.mar", 100).await;
        let to = insert_user(&pool, "rio.sal.pan", 50).await;

        let result = execute_transfer(&pool, from.id, transfer(to.id, 101)).await;

        assert!(matches!(result, Err(AppError::InsufficientFunds)));
        assert_eq!(balance_of(&pool, from.id).await, 100);
        assert_eq!(balance_of(&pool, to.id).await, 50);
        assert_eq!(count_rows(&pool, "transferences").await, 0);
        assert_eq!(count_rows(&pool, "transactions").await, 0);
    }

    #[sqlx::test]
    async fn whole_balance_can_be_sent(pool: DbPool) {
        let from = insert_user(&pool, "sol.luna.mar", 100).await;
        let to = insert_user(&pool, "rio.sal.pan", 0).await;

        execute_transfer(&pool, from.id, transfer(to.id, 100)).await.unwrap();

        assert_eq!(balance_of(&pool, from.id).await, 0);
        assert_eq!(balance_of(&pool, to.id).await, 100);
    }

    #[sqlx::test]
    async fn missing_destination_is_not_found(pool: DbPool) {
        let from = insert_user(&pool, "sol.luna.mar", 1_000).await;

        let result = execute_transfer(&pool, from.id, transfer(Uuid::new_v4(), 100)).await;

        assert!(matches!(
            result,
            Err(AppError::NotFound("Destination account not found"))
        ));
        assert_eq!(balance_of(&pool, from.id).await, 1_000);
    }

    #[sqlx::test]
    async fn overlong_description_is_rejected_before_any_write(pool: DbPool) {
        let from = insert_user(&pool, "sol.luna.mar", 1_000).await;
        let to = insert_user(&pool, "rio.sal.pan", 0).await;
        let request = TransferRequest {
            description: Some("a".repeat(MAX_DESCRIPTION_LEN + 1)),
            ..transfer(to.id, 100)
        };

        let result = execute_transfer(&pool, from.id, request).await;

        assert!(matches!(result, Err(AppError::Validation(f)) if f.contains_key("description")));
        assert_eq!(balance_of(&pool, from.id).await, 1_000);
        assert_eq!(count_rows(&pool, "transferences").await, 0);
    }

    #[sqlx::test]
    async fn recipients_are_distinct_and_most_recent_first(pool: DbPool) {
        let from = insert_user(&pool, "sol.luna.mar", 1_000).await;
        let a = insert_user(&pool, "rio.sal.pan", 0).await;
        let b = insert_user(&pool, "mar.sol.luz", 0).await;

        for to in [a.id, b.id, a.id] {
            execute_transfer(&pool, from.id, transfer(to, 10)).await.unwrap();
        }

        let ids: Vec<Uuid> = last_recipients(&pool, from.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }
}
