use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors surfaced at the HTTP boundary. Every variant renders as `{ "error": "..." }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no authenticated session")]
    NoSession,

    #[error("not enough days for a weekly report ({found} of 7)")]
    InsufficientDays { found: usize },

    #[error("upstream service unavailable")]
    CollaboratorUnavailable(#[source] anyhow::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("admin role required")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoSession | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InsufficientDays { .. } => StatusCode::CONFLICT,
            AppError::CollaboratorUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::CollaboratorUnavailable(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::CollaboratorUnavailable(e) = &self {
            error!(error = %format!("{e:#}"), "collaborator call failed");
        }
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// `Json` extractor whose rejections render as `{ "error": "..." }`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
