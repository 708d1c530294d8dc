//! Core error types

use serde::Serialize;
use thiserror::Error;

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The service's own wording when it gave one
fn api_message(err: &adminboard_api::ApiError) -> String {
    err.server_message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string())
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] adminboard_storage::StorageError),

    #[error("Session error: {0}")]
    Session(#[from] adminboard_session::SessionError),

    #[error("{}", api_message(.0))]
    Api(#[from] adminboard_api::ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("{}", describe(.0))]
    Validation(Vec<FieldError>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = CoreError::Validation(vec![
            FieldError {
                field: "username",
                message: "Username is required",
            },
            FieldError {
                field: "password",
                message: "Password is required",
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Username is required; Password is required"
        );
    }

    #[test]
    fn test_api_error_prefers_server_message() {
        let err = CoreError::from(adminboard_api::ApiError::Status {
            status: 404,
            message: Some("User with id '9999' not found".to_string()),
        });
        assert_eq!(err.to_string(), "User with id '9999' not found");

        let bare = CoreError::from(adminboard_api::ApiError::Status {
            status: 500,
            message: None,
        });
        assert_eq!(bare.to_string(), "Request failed with HTTP 500");
    }
}
