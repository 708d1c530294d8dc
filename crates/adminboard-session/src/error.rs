//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Identity service error: {0}")]
    Api(#[from] adminboard_api::ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] adminboard_storage::StorageError),

    #[error("No refresh credential stored")]
    MissingRefreshToken,

    #[error("Session already initialized")]
    AlreadyInitialized,

    #[error("Session changed while the request was pending")]
    Superseded,
}
