//! Transference (P2P transfer and card income) data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    validation::{Validator, non_blank},
};

/// Largest amount a single transfer or income may move (one billion in major units).
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

/// Longest accepted description, the width of the `description` columns.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Represents a transfer event from the `transferences` table.
///
/// Every transference owns exactly two ledger rows (`TRANSFER_OUT` for the
/// source, `TRANSFER_IN` for the destination) whose amounts sum to zero.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Transference {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,

    /// Always positive
    pub amount_cents: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to move money to another account.
///
/// ```json
/// {
///   "to_account_id": "660e8400-e29b-41d4-a716-446655440001",
///   "amount_cents": 25000,
///   "description": "Dinner"
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransferRequest {
    pub to_account_id: Uuid,
    pub amount_cents: i64,
    pub description: Option<String>,
}

/// Request to deposit money into the account from one of its cards.
///
/// ```json
/// {
///   "card_id": "880e8400-e29b-41d4-a716-446655440003",
///   "amount_cents": 100000
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncomeRequest {
    pub card_id: Uuid,
    pub amount_cents: i64,
    pub description: Option<String>,
}

impl TransferRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_movement(self.amount_cents, self.description.as_deref())
    }
}

impl IncomeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_movement(self.amount_cents, self.description.as_deref())
    }
}

fn validate_movement(amount_cents: i64, description: Option<&str>) -> Result<(), AppError> {
    let mut v = Validator::new();
    v.check("amount_cents", amount_cents > 0, "Amount must be positive")
        .check(
            "amount_cents",
            amount_cents <= MAX_AMOUNT_CENTS,
            "Amount exceeds the per-operation limit",
        );
    if let Some(description) = non_blank(description) {
        v.max_len("description", description, MAX_DESCRIPTION_LEN);
    }
    v.finish()
}

/// Body of `POST /accounts/{id}/transferences`, told apart by its fields.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TransferenceRequest {
    Transfer(TransferRequest),
    Income(IncomeRequest),
}

/// Response returned for a completed transfer.
///
/// ```json
/// {
///   "id": "660e8400-e29b-41d4-a716-446655440001",
///   "from_account_id": "550e8400-e29b-41d4-a716-446655440000",
///   "to_account_id": "770e8400-e29b-41d4-a716-446655440002",
///   "amount_cents": 25000,
///   "description": "Transfer to sol.luna.mar",
///   "created_at": "2025-12-21T16:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub id: Uuid,
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Transference> for TransferResponse {
    fn from(transference: Transference) -> Self {
        Self {
            id: transference.id,
            from_account_id: transference.from_user_id,
            to_account_id: transference.to_user_id,
            amount_cents: transference.amount_cents,
            description: transference.description,
            created_at: transference.created_at,
        }
    }
}

/// A past transfer destination, as listed by `GET /accounts/{id}/transferences`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Recipient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub alias: String,
    pub cvu: String,
}
