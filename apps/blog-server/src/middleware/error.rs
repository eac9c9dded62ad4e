//! Error handling - failures rendered as HTML error pages.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};
use askama::Template;
use std::fmt;

use blog_core::error::RepoError;

use crate::views::ErrorTemplate;

/// Application-level error type that converts to an HTML error page.
///
/// Form validation is not an error here: handlers re-render the form instead.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let detail = match self {
            AppError::NotFound(detail) => {
                tracing::debug!("Not found: {}", detail);
                detail.clone()
            }
            AppError::PayloadTooLarge(detail) => detail.clone(),
            AppError::Internal(detail) => {
                // Internal details stay in the logs.
                tracing::error!("Internal error: {}", detail);
                String::new()
            }
        };

        let page = ErrorTemplate {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            detail,
        };

        match page.render() {
            Ok(html) => HttpResponse::build(status)
                .content_type(ContentType::html())
                .body(html),
            Err(e) => {
                tracing::error!("Error page rendering failed: {}", e);
                HttpResponse::build(status)
                    .content_type(ContentType::plaintext())
                    .body(page.title)
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("No {} matches id {}", entity_type.to_lowercase(), id))
            }
            RepoError::Validation(errors) => {
                // Handlers re-render forms on validation failure; reaching here is a bug.
                tracing::error!("Unhandled validation error: {}", errors);
                AppError::Internal("Unhandled validation error".to_string())
            }
            RepoError::Constraint(msg) => {
                tracing::error!("Database constraint violation: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
