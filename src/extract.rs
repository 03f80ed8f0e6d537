//! Request extractors that report rejections as [`AppError`].
//!
//! axum's own `Json`, `Query` and `Path` reject with plain-text bodies and, for
//! JSON, a 422 status. These wrappers reuse the same parsing and route every
//! rejection through `AppError::InvalidRequest` so clients always get the JSON
//! error envelope and a 400.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// URL path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
