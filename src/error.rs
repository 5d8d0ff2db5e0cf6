//! Error handler for the Arive portal.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::Error as SQLxError;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error("error parsing form data")]
    ParsingForm(#[from] MultipartError),

    #[error(transparent)]
    Axum(#[from] JsonRejection),

    #[error("SQL request failed: {0}")]
    Sql(#[from] SQLxError),

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("{0}")]
    Conflict(String),

    #[error("missing or invalid credentials")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("internal server error, {details}")]
    Internal {
        details: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ServerError {
    /// Build an [`ServerError::Internal`] from any error type.
    pub fn internal(
        details: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Internal {
            details: details.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
struct ResponseError {
    error: String,
}

impl ResponseError {
    fn into_response(self, status: StatusCode) -> Response {
        match serde_json::to_string(&self) {
            Ok(body) => Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap_or_else(|_| internal_server_error()),
            Err(_) => internal_server_error(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, flatten_validation_errors(errors))
            },

            ServerError::ParsingForm(err) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            },

            ServerError::Axum(err) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            },

            ServerError::Conflict(message) => {
                (StatusCode::BAD_REQUEST, message.clone())
            },

            ServerError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            },

            ServerError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, message.clone())
            },

            ServerError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, self.to_string())
            },

            // Missing rows surface as 404, other SQL failures as opaque 500.
            ServerError::Sql(SQLxError::RowNotFound) => {
                (StatusCode::NOT_FOUND, "resource not found".to_owned())
            },

            ServerError::Sql(err) => {
                tracing::error!(error = %err, "sql request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            },

            ServerError::Internal { details, source } => {
                tracing::error!(err = ?source, %details, "server returned 500 status");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            },
        };

        ResponseError { error: message }.into_response(status)
    }
}

fn flatten_validation_errors(errors: &ValidationErrors) -> String {
    let messages = errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| match &issue.message {
                Some(message) => message.to_string(),
                None => format!("invalid field '{field}'"),
            })
        })
        .collect::<Vec<_>>();

    if messages.is_empty() {
        "validation error occurred".to_owned()
    } else {
        messages.join(" ")
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(r#"{"error":"internal server error"}"#.into())
        .unwrap_or_else(|_| Response::new("internal server error".into()))
}
