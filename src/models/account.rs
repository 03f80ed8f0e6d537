//! Account view of a user row: CVU, alias and balance.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::user::User,
    validation::{Validator, non_blank},
};

/// Response body for account endpoints.
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "cvu": "0000003100010000000001",
///   "alias": "sol.luna.mar",
///   "balance_cents": 100000
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub cvu: String,
    pub alias: String,

    /// Current balance in cents
    pub balance_cents: i64,
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            cvu: user.cvu,
            alias: user.alias,
            balance_cents: user.balance_cents,
        }
    }
}

/// Request body for `PATCH /accounts/{id}`. Only the alias can be changed.
#[derive(Debug, Default, Deserialize)]
pub struct AccountUpdateRequest {
    pub alias: Option<String>,
}

impl AccountUpdateRequest {
    /// The alias to apply, or `None` when the request is a no-op.
    pub fn requested_alias(&self) -> Result<Option<&str>, AppError> {
        let Some(alias) = non_blank(self.alias.as_deref()) else {
            return Ok(None);
        };
        let mut v = Validator::new();
        v.max_len("alias", alias, 100).check(
            "alias",
            !alias.chars().any(char::is_whitespace),
            "Alias must not contain spaces",
        );
        v.finish()?;
        Ok(Some(alias))
    }
}
