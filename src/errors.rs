//! Error handling for the web handlers
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

pub enum ApiError {
    SQLError(sqlx::Error),
    HTTPError(axum::http::Error),
    TemplateError(askama::Error),
    CardNotFound,
    /// No practice session behind the cookie; bounce back to the start page.
    SessionExpired,
    Unauthorized,
    BadRequest(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::SQLError(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "Card not found".to_string()).into_response()
            }
            Self::SQLError(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("SQL error: {e}")).into_response()
            }
            Self::HTTPError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("HTTP error: {e}"),
            )
                .into_response(),
            Self::TemplateError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {e}"),
            )
                .into_response(),
            Self::CardNotFound => {
                (StatusCode::NOT_FOUND, "Card not found".to_string()).into_response()
            }
            Self::SessionExpired => Redirect::to("/").into_response(),
            Self::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()).into_response()
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()).into_response(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::SQLError(e)
    }
}

impl From<axum::http::Error> for ApiError {
    fn from(e: axum::http::Error) -> Self {
        Self::HTTPError(e)
    }
}

impl From<askama::Error> for ApiError {
    fn from(e: askama::Error) -> Self {
        Self::TemplateError(e)
    }
}
