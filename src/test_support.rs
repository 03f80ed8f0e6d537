//! Row fixtures for database-backed tests.

use rand::Rng;
use uuid::Uuid;

use crate::{
    db::DbPool,
    models::{card::Card, user::User},
    services::identifiers::random_cvu,
};

/// Insert a user with the given alias and balance, bypassing registration.
pub async fn insert_user(pool: &DbPool, alias: &str, balance_cents: i64) -> User {
    let (dni, cvu) = {
        let mut rng = rand::rng();
        let dni = rng.random_range(10_000_000..100_000_000_u32).to_string();
        (dni, random_cvu(&mut rng))
    };

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (
            first_name,
            last_name,
            dni,
            phone_number,
            email,
            password_hash,
            cvu,
            alias,
            balance_cents
        )
        VALUES ('Ana', 'Gomez', $1, '1155550000', $2, 'not-a-hash', $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(dni)
    .bind(format!("{}@example.com", Uuid::new_v4().simple()))
    .bind(cvu)
    .bind(alias)
    .bind(balance_cents)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Insert a card on `user_id` ending in `last_four`.
pub async fn insert_card(pool: &DbPool, user_id: Uuid, last_four: &str) -> Card {
    let prefix = rand::rng().random_range(100_000_000_000_u64..1_000_000_000_000);

    sqlx::query_as::<_, Card>(
        r#"
        INSERT INTO cards (user_id, card_number, holder_name, expiration_date)
        VALUES ($1, $2, 'ANA GOMEZ', '09/30')
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(format!("{prefix}{last_four}"))
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Current balance of `user_id`.
pub async fn balance_of(pool: &DbPool, user_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT balance_cents FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Number of rows in `table`.
pub async fn count_rows(pool: &DbPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
