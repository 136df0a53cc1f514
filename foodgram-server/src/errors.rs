use std::collections::BTreeMap;

use axum::{
    http,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type WebResult<T> = std::result::Result<T, WebError>;

/// Field name to the list of problems found with it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Internal Server Error: {0}")]
    Internal(#[from] anyhow::Error),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Invalid input: {0:?}")]
    Validation(FieldErrors),
    #[error("{0}")]
    DuplicateEntry(&'static str),
    #[error("{0}")]
    NotFoundEntry(&'static str),
    #[error("The shopping cart is empty")]
    EmptyCart,
    #[error("{0}")]
    SelfReference(&'static str),
    #[error("Authentication credentials were not provided")]
    Unauthorized,
    #[error("Only the author can change this recipe")]
    Forbidden,
    #[error("Not found")]
    NotFound,
}

impl WebError {
    /// A validation failure on a single field.
    pub fn field(name: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(name.into(), vec![message.into()]);
        WebError::Validation(errors)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            WebError::Internal(_) | WebError::Database(_) | WebError::Pool(_) => {
                tracing::warn!("{}", message);
                // In production, we want to return a generic error message
                let body = if cfg!(debug_assertions) {
                    message
                } else {
                    "Internal Server Error".into()
                };
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "errors": body })),
                )
                    .into_response()
            }
            WebError::Validation(fields) => {
                (http::StatusCode::BAD_REQUEST, Json(fields)).into_response()
            }
            // Domain failures are always explained
            WebError::DuplicateEntry(_)
            | WebError::NotFoundEntry(_)
            | WebError::EmptyCart
            | WebError::SelfReference(_) => (
                http::StatusCode::BAD_REQUEST,
                Json(json!({ "errors": message })),
            )
                .into_response(),
            WebError::Unauthorized => (
                http::StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": message })),
            )
                .into_response(),
            WebError::Forbidden => (
                http::StatusCode::FORBIDDEN,
                Json(json!({ "detail": message })),
            )
                .into_response(),
            WebError::NotFound => (
                http::StatusCode::NOT_FOUND,
                Json(json!({ "detail": "Not found." })),
            )
                .into_response(),
        }
    }
}
