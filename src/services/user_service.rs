//! User service - registration, login and profile management.

use anyhow::Context;
use uuid::Uuid;

use crate::{
    auth::{
        JwtKeys,
        password::{hash_password, verify_password},
    },
    db::DbPool,
    error::AppError,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, User, UserUpdateRequest},
    services::identifiers::{AliasGenerator, generate_unique_alias, generate_unique_cvu},
    validation::non_blank,
};

/// Register a new user with a fresh CVU, alias and a zero balance.
///
/// # Process
///
/// 1. Validate the request shape
/// 2. Reject an email or DNI that is already registered
/// 3. Hash the password
/// 4. Draw a free CVU and alias
/// 5. Insert the user
///
/// # Errors
///
/// - `Validation`: A field is missing or malformed
/// - `Conflict`: Email or DNI already registered
/// - `Database`: Database error occurred
pub async fn register(
    pool: &DbPool,
    aliases: &AliasGenerator,
    request: RegisterRequest,
) -> Result<User, AppError> {
    request.validate()?;

    let email = request.email.trim();
    let dni = request.dni.trim();

    if email_taken(pool, email, None).await? {
        return Err(AppError::Conflict("Email is already in use".to_string()));
    }
    if dni_taken(pool, dni, None).await? {
        return Err(AppError::Conflict("DNI is already in use".to_string()));
    }

    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task")??;

    let cvu = generate_unique_cvu(pool).await?;
    let alias = generate_unique_alias(pool, aliases).await?;

    let user = sqlx::query_as::<_, User>(
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
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0)
        RETURNING *
        "#,
    )
    .bind(request.first_name.trim())
    .bind(request.last_name.trim())
    .bind(dni)
    .bind(request.phone_number.trim())
    .bind(email)
    .bind(password_hash)
    .bind(cvu)
    .bind(alias)
    .fetch_one(pool)
    .await?;

    tracing::info!(user_id = %user.id, alias = %user.alias, "user registered");

    Ok(user)
}

/// Check credentials and issue a session token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    pool: &DbPool,
    jwt: &JwtKeys,
    request: LoginRequest,
) -> Result<LoginResponse, AppError> {
    request.validate()?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(request.email.trim())
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let password = request.password;
    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .context("password verification task")??;

    if !valid {
        tracing::info!(user_id = %user.id, "login rejected");
        return Err(AppError::InvalidCredentials);
    }

    let token = jwt.sign(user.id, &user.email)?;
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(LoginResponse {
        token,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        cvu: user.cvu,
        alias: user.alias,
    })
}

/// Get a user's profile.
pub async fn get_user(pool: &DbPool, user_id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("User not found"))
}

/// Apply a partial profile update.
///
/// Absent or blank fields keep their stored value. A changed email or DNI must
/// not belong to another user.
///
/// # Errors
///
/// - `NotFound`: User doesn't exist
/// - `Validation`: A provided field is malformed
/// - `Conflict`: New email or DNI already registered to someone else
pub async fn update_user(
    pool: &DbPool,
    user_id: Uuid,
    request: UserUpdateRequest,
) -> Result<User, AppError> {
    request.validate()?;

    let current = get_user(pool, user_id).await?;

    let email = non_blank(request.email.as_deref());
    if let Some(email) = email {
        if email != current.email && email_taken(pool, email, Some(user_id)).await? {
            return Err(AppError::Conflict("Email is already in use".to_string()));
        }
    }

    let dni = non_blank(request.dni.as_deref());
    if let Some(dni) = dni {
        if dni != current.dni && dni_taken(pool, dni, Some(user_id)).await? {
            return Err(AppError::Conflict("DNI is already in use".to_string()));
        }
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            dni = COALESCE($4, dni),
            phone_number = COALESCE($5, phone_number),
            email = COALESCE($6, email),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(non_blank(request.first_name.as_deref()))
    .bind(non_blank(request.last_name.as_deref()))
    .bind(dni)
    .bind(non_blank(request.phone_number.as_deref()))
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("User not found"))?;

    tracing::info!(user_id = %user.id, "user profile updated");

    Ok(user)
}

async fn email_taken(pool: &DbPool, email: &str, except: Option<Uuid>) -> Result<bool, AppError> {
    let taken = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id IS DISTINCT FROM $2)",
    )
    .bind(email)
    .bind(except)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}

async fn dni_taken(pool: &DbPool, dni: &str, except: Option<Uuid>) -> Result<bool, AppError> {
    let taken = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE dni = $1 AND id IS DISTINCT FROM $2)",
    )
    .bind(dni)
    .bind(except)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}
