use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::{
    domain::error::{DomainError, RepositoryError},
    presentation::handlers::user_handler::MessageResponse,
};

/// Failure returned by a handler, rendered as a status code and a `{message}` body
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    BadRequest(String),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::Domain(e)
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "Invalid request body".to_string())
            }
            ApiError::Domain(DomainError::InvalidInput(reason)) => {
                (StatusCode::BAD_REQUEST, reason.to_string())
            }
            ApiError::Domain(e @ DomainError::Conflict) => (StatusCode::CONFLICT, e.to_string()),
            ApiError::Domain(e @ DomainError::NotFound) => (StatusCode::NOT_FOUND, e.to_string()),
            ApiError::Domain(DomainError::Repository(RepositoryError::Write(_))) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not save user data".to_string(),
            ),
            ApiError::Domain(DomainError::Repository(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not read data file".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        match &self {
            ApiError::Domain(DomainError::Repository(e)) => error!(error = %e, "store unavailable"),
            ApiError::BadRequest(detail) => debug!(%detail, "undecodable request body"),
            _ => {}
        }
        (status, Json(MessageResponse { message })).into_response()
    }
}
