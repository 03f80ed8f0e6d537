//! Ledger (transaction) data models and activity filters.
//!
//! This module defines:
//! - `Transaction`: one single-sided ledger row belonging to one user
//! - `TransactionType`: the closed set of ledger row kinds
//! - `ActivityQuery` / `ActivityFilter`: the activity listing filters
//! - `TransactionResponse`: Response body returned to clients

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Represents a ledger row from the `transactions` table.
///
/// # Sign Convention
///
/// Credits (`INCOME`, `TRANSFER_IN`) are positive, debits (`TRANSFER_OUT`) negative.
/// Amounts are never zero (enforced by CHECK constraint).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,

    /// Owner of the row
    pub user_id: Uuid,

    /// Signed amount in cents
    pub amount_cents: i64,

    /// `INCOME`, `TRANSFER_IN` or `TRANSFER_OUT`
    pub transaction_type: String,

    pub description: Option<String>,

    /// Links the two rows written by one transfer
    pub transference_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

/// Kind of ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    TransferIn,
    TransferOut,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::TransferIn => "TRANSFER_IN",
            TransactionType::TransferOut => "TRANSFER_OUT",
        }
    }
}

/// Case-insensitive parse, so `income` and `Transfer_In` are accepted.
impl FromStr for TransactionType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "TRANSFER_IN" => Ok(TransactionType::TransferIn),
            "TRANSFER_OUT" => Ok(TransactionType::TransferOut),
            _ => Err(AppError::field(
                "type",
                "Type must be one of INCOME, TRANSFER_IN, TRANSFER_OUT",
            )),
        }
    }
}

/// Query string of `GET /accounts/{id}/activity`.
///
/// ```text
/// ?minAmount=1000&maxAmount=50000&startDate=2025-01-01&endDate=2025-01-31&type=transfer_out
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// Validated activity filters. Every bound is inclusive.
///
/// Amount bounds apply to the absolute amount, date bounds to the UTC
/// calendar date of the row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub transaction_type: Option<TransactionType>,
}

impl TryFrom<ActivityQuery> for ActivityFilter {
    type Error = AppError;

    fn try_from(query: ActivityQuery) -> Result<Self, Self::Error> {
        if let (Some(min), Some(max)) = (query.min_amount, query.max_amount) {
            if min > max {
                return Err(AppError::field(
                    "minAmount",
                    "minAmount must not be greater than maxAmount",
                ));
            }
        }
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                return Err(AppError::field(
                    "startDate",
                    "startDate must not be after endDate",
                ));
            }
        }
        let transaction_type = match query.transaction_type.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Some(value.parse()?),
            _ => None,
        };

        Ok(Self {
            min_amount: query.min_amount,
            max_amount: query.max_amount,
            start_date: query.start_date,
            end_date: query.end_date,
            transaction_type,
        })
    }
}

/// Response returned for ledger rows.
///
/// ```json
/// {
///   "id": "770e8400-e29b-41d4-a716-446655440002",
///   "account_id": "550e8400-e29b-41d4-a716-446655440000",
///   "transaction_type": "TRANSFER_OUT",
///   "amount_cents": -25000,
///   "description": "Transfer to sol.luna.mar",
///   "transference_id": "660e8400-e29b-41d4-a716-446655440001",
///   "created_at": "2025-12-21T16:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub transaction_type: String,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub transference_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            account_id: transaction.user_id,
            transaction_type: transaction.transaction_type,
            amount_cents: transaction.amount_cents,
            description: transaction.description,
            transference_id: transaction.transference_id,
            created_at: transaction.created_at,
        }
    }
}
