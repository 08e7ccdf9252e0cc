//! Body and query extractors that reject with [`AppError`].
//!
//! axum's own `Json` and `Query` answer malformed input with plain-text
//! 400/422 responses; these wrappers route the same failures through
//! `AppError` so every error body is `{"error": ...}`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
