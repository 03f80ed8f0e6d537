//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Checks the caller owns the addressed account
//! 3. Delegates to a service
//! 4. Returns HTTP response (JSON, status code)

/// Account endpoints
pub mod accounts;
/// Register, login and logout
pub mod auth;
/// Card endpoints
pub mod cards;
/// Liveness and database connectivity
pub mod health;
/// Activity endpoints
pub mod transactions;
/// Transfer and income endpoints
pub mod transferences;
/// Profile endpoints
pub mod users;
