//! User (account holder) data models and API request/response types.
//!
//! One `users` row is both the person and their wallet account: it carries the
//! profile, the login credentials, the CVU/alias pair and the balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    validation::{Validator, is_digits, is_valid_email, non_blank},
};

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Represents a user record from the database.
///
/// # Balance Storage
///
/// The balance is stored as `i64` cents and guarded by a `CHECK (balance_cents >= 0)`
/// constraint, so no code path can commit a negative balance.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub phone_number: String,
    pub email: String,

    /// argon2 PHC string, never serialized
    pub password_hash: String,

    /// 22-digit virtual account number
    pub cvu: String,

    /// Human-readable unique account nickname
    pub alias: String,

    pub balance_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /auth/register`.
///
/// ```json
/// {
///   "first_name": "Ana",
///   "last_name": "Gomez",
///   "dni": "30111222",
///   "phone_number": "+54 11 5555 0000",
///   "email": "ana@example.com",
///   "password": "s3cret!"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        v.required("first_name", &self.first_name, "First name is required")
            .max_len("first_name", &self.first_name, 100)
            .required("last_name", &self.last_name, "Last name is required")
            .max_len("last_name", &self.last_name, 100)
            .required("dni", &self.dni, "DNI is required")
            .check("dni", is_digits(&self.dni, 7, 10), "DNI must have between 7 and 10 digits")
            .required("phone_number", &self.phone_number, "Phone number is required")
            .max_len("phone_number", &self.phone_number, 30)
            .required("email", &self.email, "Email is required")
            .check("email", is_valid_email(&self.email), "Invalid email address")
            .max_len("email", &self.email, 100)
            .required("password", &self.password, "Password is required")
            .check(
                "password",
                self.password.chars().count() >= MIN_PASSWORD_LEN,
                "Password must be at least 6 characters",
            );
        v.finish()
    }
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        v.required("email", &self.email, "Email is required")
            .check("email", is_valid_email(&self.email), "Invalid email address")
            .required("password", &self.password, "Password is required");
        v.finish()
    }
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cvu: String,
    pub alias: String,
}

/// Partial profile update for `PATCH /users/{id}`.
///
/// Absent or blank fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dni: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl UserUpdateRequest {
    /// Shape checks on the fields that will actually be applied.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        if let Some(first_name) = non_blank(self.first_name.as_deref()) {
            v.max_len("first_name", first_name, 100);
        }
        if let Some(last_name) = non_blank(self.last_name.as_deref()) {
            v.max_len("last_name", last_name, 100);
        }
        if let Some(dni) = non_blank(self.dni.as_deref()) {
            v.check("dni", is_digits(dni, 7, 10), "DNI must have between 7 and 10 digits");
        }
        if let Some(phone) = non_blank(self.phone_number.as_deref()) {
            v.max_len("phone_number", phone, 30);
        }
        if let Some(email) = non_blank(self.email.as_deref()) {
            v.check("email", is_valid_email(email), "Invalid email address")
                .max_len("email", email, 100);
        }
        v.finish()
    }
}

/// Profile returned to API clients. Never includes the password hash.
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "first_name": "Ana",
///   "last_name": "Gomez",
///   "dni": "30111222",
///   "phone_number": "+54 11 5555 0000",
///   "email": "ana@example.com",
///   "cvu": "0000003100010000000001",
///   "alias": "sol.luna.mar",
///   "balance_cents": 0
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub phone_number: String,
    pub email: String,
    pub cvu: String,
    pub alias: String,
    pub balance_cents: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            dni: user.dni,
            phone_number: user.phone_number,
            email: user.email,
            cvu: user.cvu,
            alias: user.alias,
            balance_cents: user.balance_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_registration() -> RegisterRequest {
        RegisterRequest {
            first_name: "Ana".into(),
            last_name: "Gomez".into(),
            dni: "30111222".into(),
            phone_number: "1155550000".into(),
            email: "ana@example.com".into(),
            password: "s3cret!".into(),
        }
    }

    #[test]
    fn accepts_complete_registration() {
        assert!(valid_registration().validate().is_ok());
    }

    #[test]
    fn reports_each_bad_registration_field() {
        let request = RegisterRequest {
            email: "not-an-email".into(),
            password: "123".into(),
            dni: "12ab".into(),
            ..valid_registration()
        };
        let Err(AppError::Validation(fields)) = request.validate() else {
            panic!("expected validation error");
        };
        assert_eq!(fields["email"], "Invalid email address");
        assert_eq!(fields["password"], "Password must be at least 6 characters");
        assert!(fields.contains_key("dni"));
        assert!(!fields.contains_key("first_name"));
    }

    #[test]
    fn blank_update_fields_are_not_validated() {
        let request = UserUpdateRequest {
            email: Some("   ".into()),
            dni: Some(String::new()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn malformed_update_email_is_rejected() {
        let request = UserUpdateRequest {
            email: Some("nope".into()),
            ..Default::default()
        };
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn response_drops_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Ana".into(),
            last_name: "Gomez".into(),
            dni: "30111222".into(),
            phone_number: "1155550000".into(),
            email: "ana@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            cvu: "1".repeat(22),
            alias: "sol.luna.mar".into(),
            balance_cents: 0,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["alias"], "sol.luna.mar");
    }
}
