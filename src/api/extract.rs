//! Request extractors whose rejections render as the error envelope.
//!
//! axum's own `Json` and `Query` answer malformed input with a plain-text
//! body (and 422 for type mismatches). These wrappers route every rejection
//! through [`AppError::BadRequest`] instead.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);
