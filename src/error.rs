//! Error types for the book library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failures raised by the data store layer
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("data store is not connected")]
    NotConnected,

    #[error("invalid book id: {0}")]
    InvalidId(String),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// Book operations, used to label failures reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListBooks,
    GetBook,
    AddBook,
    EditBook,
    DeleteBook,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::ListBooks => "Fetching books",
            Operation::GetBook => "Fetching book",
            Operation::AddBook => "Adding book",
            Operation::EditBook => "Updating book",
            Operation::DeleteBook => "Deleting book",
        };
        f.write_str(label)
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{operation} failed: {source}")]
    Operation {
        operation: Operation,
        #[source]
        source: StoreError,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn operation(operation: Operation, source: StoreError) -> Self {
        AppError::Operation { operation, source }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::Operation { operation, source } => {
                tracing::error!("{} failed: {}", operation, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{} failed", operation),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for data store operations
pub type StoreResult<T> = Result<T, StoreError>;
