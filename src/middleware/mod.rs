//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Authenticate requests
//! - Rewrite request headers
//! - Short-circuit requests (reject unauthorized)

/// Bearer token gateway
pub mod auth;
