//! Account service - balance, CVU and alias of a user's wallet account.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{account::AccountUpdateRequest, user::User},
};

/// Get the account (user row) by ID.
///
/// # Errors
///
/// - `NotFound`: Account doesn't exist
/// - `Database`: Database error occurred
pub async fn get_account(pool: &DbPool, account_id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(account_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Account not found"))
}

/// Fail with `NotFound` unless the account exists.
pub async fn ensure_account_exists(pool: &DbPool, account_id: Uuid) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(account_id)
        .fetch_one(pool)
        .await?;

    if exists {
        Ok(())
    } else {
        Err(AppError::NotFound("Account not found"))
    }
}

/// Change the account alias.
///
/// A blank alias or the current alias leaves the account untouched.
///
/// # Errors
///
/// - `Validation`: Alias too long or contains whitespace
/// - `NotFound`: Account doesn't exist
/// - `Conflict`: Alias belongs to another account
pub async fn update_alias(
    pool: &DbPool,
    account_id: Uuid,
    request: &AccountUpdateRequest,
) -> Result<User, AppError> {
    let requested = request.requested_alias()?;
    let account = get_account(pool, account_id).await?;

    let Some(alias) = requested else {
        return Ok(account);
    };
    if alias == account.alias {
        return Ok(account);
    }

    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE alias = $1)")
        .bind(alias)
        .fetch_one(pool)
        .await?;

    if taken {
        return Err(AppError::Conflict("Alias is already in use".to_string()));
    }

    let account = sqlx::query_as::<_, User>(
        "UPDATE users SET alias = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(alias)
    .bind(account_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Account not found"))?;

    tracing::info!(account_id = %account.id, alias = %account.alias, "alias updated");

    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::insert_user;

    fn alias(value: &str) -> AccountUpdateRequest {
        AccountUpdateRequest {
            alias: Some(value.to_string()),
        }
    }

    #[sqlx::test]
    async fn same_alias_is_a_no_op(pool: DbPool) {
        let account = insert_user(&pool, "sol.luna.mar", 0).await;

        let updated = update_alias(&pool, account.id, &alias("sol.luna.mar")).await.unwrap();

        assert_eq!(updated.alias, "sol.luna.mar");
        assert_eq!(updated.updated_at, account.updated_at);
    }

    #[sqlx::test]
    async fn alias_of_another_account_conflicts(pool: DbPool) {
        let account = insert_user(&pool, "sol.luna.mar", 0).await;
        insert_user(&pool, "rio.sal.pan", 0).await;

        let result = update_alias(&pool, account.id, &alias("rio.sal.pan")).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(get_account(&pool, account.id).await.unwrap().alias, "sol.luna.mar");
    }

    #[sqlx::test]
    async fn free_alias_is_applied(pool: DbPool) {
        let account = insert_user(&pool, "sol.luna.mar", 0).await;

        let updated = update_alias(&pool, account.id, &alias("mi.alias.nuevo")).await.unwrap();

        assert_eq!(updated.alias, "mi.alias.nuevo");
    }

    #[sqlx::test]
    async fn missing_account_is_not_found(pool: DbPool) {
        let result = get_account(&pool, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound("Account not found"))));
    }
}
