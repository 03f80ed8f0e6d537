//! Card data models and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    validation::{Validator, is_digits, is_valid_expiration},
};

/// Represents a card record from the database.
///
/// Each card belongs to exactly one user. Card numbers are unique across users.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Card {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_number: String,
    pub holder_name: String,

    /// `MM/YY` or `MM/YYYY`
    pub expiration_date: String,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Last four digits of the card number.
    pub fn last_four(&self) -> &str {
        let start = self.card_number.len().saturating_sub(4);
        &self.card_number[start..]
    }
}

/// Request body for `POST /accounts/{id}/cards`.
///
/// ```json
/// {
///   "card_number": "4111111111111111",
///   "holder_name": "ANA GOMEZ",
///   "expiration_date": "09/27"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub holder_name: String,
    #[serde(default)]
    pub expiration_date: String,
}

impl CreateCardRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        v.required("card_number", &self.card_number, "Card number is required")
            .check(
                "card_number",
                is_digits(&self.card_number, 13, 19),
                "Card number must have between 13 and 19 digits",
            )
            .required("holder_name", &self.holder_name, "Holder name is required")
            .max_len("holder_name", &self.holder_name, 100)
            .required("expiration_date", &self.expiration_date, "Expiration date is required")
            .check(
                "expiration_date",
                is_valid_expiration(&self.expiration_date),
                "Expiration date must be MM/YY or MM/YYYY",
            );
        v.finish()
    }
}

/// Response body for card endpoints.
#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub id: Uuid,
    pub card_number: String,
    pub holder_name: String,
    pub expiration_date: String,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            card_number: card.card_number,
            holder_name: card.holder_name,
            expiration_date: card.expiration_date,
        }
    }
}
